pub mod writer;

// 从 writer 导出
pub use writer::{write_document, FdxWriter, FDX_FOOTER, FDX_HEADER};
