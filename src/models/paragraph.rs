use serde::{Deserialize, Serialize};
use crate::models::element_type::ElementType;
use crate::models::document::DualDialogueGroupId;

/// 文本样式组合
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleSet {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleSet {
    pub const PLAIN: StyleSet = StyleSet { bold: false, italic: false, underline: false };
    pub const BOLD: StyleSet = StyleSet { bold: true, italic: false, underline: false };
    pub const ITALIC: StyleSet = StyleSet { bold: false, italic: true, underline: false };
    pub const UNDERLINE: StyleSet = StyleSet { bold: false, italic: false, underline: true };
    pub const BOLD_ITALIC: StyleSet = StyleSet { bold: true, italic: true, underline: false };

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }

    /// 合并两个样式
    pub fn union(self, other: StyleSet) -> StyleSet {
        StyleSet {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
        }
    }

    /// FDX Style 属性值，如 "Bold+Italic"；无样式返回 None
    pub fn fdx_style(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.bold {
            parts.push("Bold");
        }
        if self.italic {
            parts.push("Italic");
        }
        if self.underline {
            parts.push("Underline");
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("+"))
        }
    }
}

/// 同一样式的一段连续文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub style: StyleSet,
    pub text: String,
}

impl Run {
    pub fn new(style: StyleSet, text: impl Into<String>) -> Self {
        Run { style, text: text.into() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Run::new(StyleSet::PLAIN, text)
    }
}

/// 一个已分类的段落
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub element_type: ElementType,
    /// 去掉强制符号后的源文本(仍含样式标记)
    pub text: String,
    /// 由行内解析器填充
    pub runs: Vec<Run>,
    pub group: Option<DualDialogueGroupId>,
    /// 段落前有分页线
    pub starts_new_page: bool,
}

impl Paragraph {
    pub fn new(element_type: ElementType, text: impl Into<String>) -> Self {
        Paragraph {
            element_type,
            text: text.into(),
            runs: Vec::new(),
            group: None,
            starts_new_page: false,
        }
    }

    /// 去掉样式后的纯文本(各 run 拼接)
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}
