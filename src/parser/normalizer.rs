use log::trace;
use crate::parser::escaper::{blank_whitespace_lines, remove_unprintable};
use crate::utils::{trim_indent, FountainConstants, BLOCK_REGEX};

/// 标准化输入文本
///
/// 统一换行符，删除 boneyard 注释 `/* */` 和 `[[笔记]]`，清理不可打印字符与空白行。
/// 注释和笔记必须在分类之前删除，否则会影响相邻段落的识别。
pub fn normalize(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = remove_boneyard(&text);
    let text = remove_notes(&text);
    let text = remove_unprintable(&text);
    let text = blank_whitespace_lines(&text);
    trace!("标准化完成: {} -> {} 字节", raw.len(), text.len());
    text
}

/// 删除 `/* ... */`，可跨行，非贪婪；没有闭合的保留原文
///
/// 行首的 `!/*SHOT*/` 是强制镜头符号，不算注释
pub fn remove_boneyard(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("/*") {
        let (before, from_open) = rest.split_at(open);
        out.push_str(before);

        if is_shot_sigil(&out, from_open) {
            let sigil_tail = &FountainConstants::SHOT_SIGIL[1..];
            out.push_str(sigil_tail);
            rest = &from_open[sigil_tail.len()..];
            continue;
        }

        // 注释内容至少一个字符
        let content = &from_open[2..];
        let first_len = content.chars().next().map_or(0, char::len_utf8);
        match content[first_len..].find("*/") {
            Some(close) if first_len > 0 => {
                rest = &content[first_len + close + 2..];
            }
            _ => {
                out.push_str(from_open);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

// 当前行此前只有缩进和一个 '!'，且后面正好是 "/*SHOT*/"
fn is_shot_sigil(emitted: &str, from_open: &str) -> bool {
    let line_start = emitted.rfind('\n').map_or(0, |i| i + 1);
    let line_so_far = trim_indent(&emitted[line_start..]);
    line_so_far == "!" && from_open.starts_with(&FountainConstants::SHOT_SIGIL[1..])
}

/// 删除 `[[笔记]]`
pub fn remove_notes(text: &str) -> String {
    BLOCK_REGEX["note"].replace_all(text, "").to_string()
}
