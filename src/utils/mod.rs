pub mod fountain_constants;

pub use fountain_constants::{FountainConstants, BLOCK_REGEX};

/// 检查一行文本是否为空行(只含空格或制表符)
pub fn is_blank_line(text: &str) -> bool {
    BLOCK_REGEX["blank_line"].is_match(text)
}

/// 去掉行首的空格和制表符
pub fn trim_indent(text: &str) -> &str {
    text.trim_start_matches([' ', '\t'])
}
