pub mod element_type;
pub mod paragraph;
pub mod document;
pub mod conf;

pub use element_type::{ElementType, ElementTypeError};
pub use paragraph::{Paragraph, Run, StyleSet};
pub use document::{Document, DualDialogueGroup, DualDialogueGroupId};
pub use conf::{Conf, ConfError, ConfResult};
