pub mod normalizer;
pub mod escaper;
pub mod block_classifier;
pub mod text_processor;
pub mod fountain_parser;

pub use fountain_parser::FountainParser;
pub use block_classifier::BlockClassifier;
pub use normalizer::normalize;
pub use text_processor::{parse_runs, process_paragraph_runs};
