use std::ops::Range;
use serde::{Deserialize, Serialize};
use crate::models::paragraph::Paragraph;

/// 双对话组编号(Document.groups 中的下标)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DualDialogueGroupId(pub usize);

/// 双对话组：两个对白块在段落序列中的下标范围
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualDialogueGroup {
    pub first: Range<usize>,
    pub second: Range<usize>,
}

impl DualDialogueGroup {
    /// 整个组覆盖的范围
    pub fn span(&self) -> Range<usize> {
        self.first.start..self.second.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
    pub groups: Vec<DualDialogueGroup>,
}

impl Document {
    pub fn new(paragraphs: Vec<Paragraph>, groups: Vec<DualDialogueGroup>) -> Self {
        Document { paragraphs, groups }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn group(&self, id: DualDialogueGroupId) -> Option<&DualDialogueGroup> {
        self.groups.get(id.0)
    }
}
