use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 剧本元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementType {
    SceneHeading,
    Transition,
    Character,
    Parenthetical,
    Dialogue,
    Action,
    Shot,
    /// 歌词，属于对白的一种
    Lyric,
    General,
}

/// 元素名称解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElementTypeError {
    #[error("未知的元素类型: {0}")]
    Unknown(String),
}

impl ElementType {
    pub const ALL: [ElementType; 9] = [
        ElementType::SceneHeading,
        ElementType::Transition,
        ElementType::Character,
        ElementType::Parenthetical,
        ElementType::Dialogue,
        ElementType::Action,
        ElementType::Shot,
        ElementType::Lyric,
        ElementType::General,
    ];

    /// FDX 中 Paragraph 的 Type 属性值
    ///
    /// 歌词在 FDX 里没有独立类型，按对白输出
    pub fn fdx_name(&self) -> &'static str {
        match self {
            ElementType::SceneHeading => "Scene Heading",
            ElementType::Transition => "Transition",
            ElementType::Character => "Character",
            ElementType::Parenthetical => "Parenthetical",
            ElementType::Dialogue | ElementType::Lyric => "Dialogue",
            ElementType::Action => "Action",
            ElementType::Shot => "Shot",
            ElementType::General => "General",
        }
    }
}

impl Default for ElementType {
    fn default() -> Self {
        ElementType::General
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Lyric => write!(f, "Lyric"),
            other => write!(f, "{}", other.fdx_name()),
        }
    }
}

impl FromStr for ElementType {
    type Err = ElementTypeError;

    /// 忽略大小写，空格、下划线、连字符视为相同
    /// ("scene heading" / "scene_heading" / "SceneHeading")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        let element = match key.as_str() {
            "sceneheading" | "heading" => ElementType::SceneHeading,
            "transition" => ElementType::Transition,
            "character" => ElementType::Character,
            "parenthetical" => ElementType::Parenthetical,
            "dialogue" => ElementType::Dialogue,
            "action" => ElementType::Action,
            "shot" => ElementType::Shot,
            "lyric" => ElementType::Lyric,
            "general" => ElementType::General,
            _ => return Err(ElementTypeError::Unknown(s.to_string())),
        };
        Ok(element)
    }
}

impl TryFrom<String> for ElementType {
    type Error = ElementTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementType> for String {
    fn from(element: ElementType) -> Self {
        element.to_string()
    }
}
