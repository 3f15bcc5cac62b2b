use std::collections::HashMap;
use lazy_static::lazy_static;
use regex::Regex;

pub struct FountainConstants;

impl FountainConstants {
    /// 强制镜头符号；不能被当作 boneyard 注释删除
    pub const SHOT_SIGIL: &'static str = "!/*SHOT*/";

    // 强制符号
    pub const ACTION_SIGIL: char = '!';
    pub const SCENE_HEADING_SIGIL: char = '.';
    pub const TRANSITION_SIGIL: char = '>';
    pub const CHARACTER_SIGIL: char = '@';
    pub const LYRIC_SIGIL: char = '~';
    pub const DUAL_DIALOGUE_SIGIL: char = '^';
}

lazy_static! {
    // 块级元素正则
    pub static ref BLOCK_REGEX: HashMap<&'static str, Regex> = {
        let mut map = HashMap::new();
        // 场景标题：可被 * _ 包裹，前缀后接空格或句点
        map.insert("scene_heading", Regex::new(r"(?i)^[ \t]*([\*_]*(?:i\.?/e|int\.?/ext|int|ext|est)(?: +|\. ?).*?)[ \t]*$").unwrap());
        // 左转场：FADE IN: / CUT UP: / FADE TO BLACK. / CLOSE WITH ON:
        map.insert("transition_left", Regex::new(r"^[ \t]*(\w+(?: \w+)* (?:UP|IN|OUT|BLACK|WITH)(?: ON)?[\.:])[ \t]*$").unwrap());
        // 右转场：CUT TO:
        map.insert("transition_right", Regex::new(r"^[ \t]*(\w+(?: \w+)* TO:)[ \t]*$").unwrap());
        // 角色名：不含小写字母，可带 (扩展) 与双对话 ^
        map.insert("character", Regex::new(r"^[ \t]*([^\p{Ll}\t@\(\^]*?\p{Lu}[^\p{Ll}\t\(\^]*?)[ \t]*(\(.*\))?[ \t]*(\^)?[ \t]*$").unwrap());
        // 强制角色名
        map.insert("character_force", Regex::new(r"^[ \t]*@(.*?)[ \t]*(\^)?[ \t]*$").unwrap());
        map.insert("parenthetical", Regex::new(r"^[ \t]*(\([^\)]+\))[ \t]*$").unwrap());
        map.insert("page_break", Regex::new(r"^[ \t]*[=-]{3,}[ \t]*\*?[ \t]*$").unwrap());
        map.insert("note", Regex::new(r"\[{2}[^\]]+\]{2}").unwrap());
        map.insert("blank_line", Regex::new(r"^[ \t]*$").unwrap());
        map
    };
}
