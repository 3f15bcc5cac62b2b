//! 特殊字符处理
//!
//! FDX 不接受的字符转成数字字符引用，另外负责分页线识别、
//! `--` 转不断行连字符、以及终端退格字符的清理。

use lazy_static::lazy_static;
use regex::Regex;
use crate::utils::BLOCK_REGEX;

/// 不断行连字符
pub const NON_BREAKING_HYPHEN: &str = "&#8209;";

lazy_static! {
    // 已经是数字字符引用的 &，不再转义
    static ref CHAR_REFERENCE: Regex = Regex::new(r"^&#(?:[0-9]+|[xX][0-9a-fA-F]+);").unwrap();
}

/// 转义 & < >
///
/// 已有的数字字符引用保持不变，所以重复调用结果相同
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match c {
            '&' if CHAR_REFERENCE.is_match(&text[i..]) => out.push('&'),
            '&' => out.push_str("&#38;"),
            '<' => out.push_str("&#60;"),
            '>' => out.push_str("&#62;"),
            _ => out.push(c),
        }
    }
    out
}

/// 文本中残留的 * 和 _ 是字面字符，输出为字符引用
pub fn escape_markup_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '*' => out.push_str("&#42;"),
            '_' => out.push_str("&#95;"),
            _ => out.push(c),
        }
    }
    out
}

/// 两侧都是非连字符的 `--` 转成两个不断行连字符
///
/// `-`、`---` 以及位于开头或结尾的 `--` 保持原样
pub fn escape_double_hyphens(text: &str) -> String {
    escape_double_hyphens_between("", text, "")
}

/// 同 [`escape_double_hyphens`]，但只输出 `text` 部分；
/// `--` 是否在内部按 `before + text + after` 整体判断
pub fn escape_double_hyphens_between(before: &str, text: &str, after: &str) -> String {
    let chars: Vec<char> = before.chars().chain(text.chars()).chain(after.chars()).collect();
    let start = before.chars().count();
    let own = start..start + text.chars().count();

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '-' {
            if own.contains(&i) {
                out.push(chars[i]);
            }
            i += 1;
            continue;
        }

        let run_start = i;
        while i < chars.len() && chars[i] == '-' {
            i += 1;
        }
        let internal = run_start > 0 && i < chars.len();
        let hyphen = if i - run_start == 2 && internal { NON_BREAKING_HYPHEN } else { "-" };
        for j in run_start..i {
            if own.contains(&j) {
                out.push_str(hyphen);
            }
        }
    }
    out
}

/// 只含空白的行变成空行
pub fn blank_whitespace_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| if BLOCK_REGEX["blank_line"].is_match(line) { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 分页线：3 个以上的 = 或 -，可带修订标记
pub fn is_page_break(line: &str) -> bool {
    BLOCK_REGEX["page_break"].is_match(line)
}

/// 删除不可打印字符
///
/// 退格形成的叠印(`X\x08X` 加粗，`_\x08X` 下划线)只保留 X，
/// 其余控制字符(换行和制表符除外)直接删除。
pub fn remove_unprintable(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out: Vec<char> = Vec::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '\u{8}' {
            let next = chars.get(i + 1).copied();
            if let (Some(&prev), Some(next)) = (out.last(), next) {
                if prev == next || prev == '_' {
                    out.pop();
                }
            }
            continue;
        }
        if c.is_control() && c != '\n' && c != '\t' {
            continue;
        }
        out.push(c);
    }
    out.into_iter().collect()
}

/// Action 中的制表符展开为空格
pub fn expand_tabs(text: &str, width: usize) -> String {
    text.replace('\t', &" ".repeat(width))
}
