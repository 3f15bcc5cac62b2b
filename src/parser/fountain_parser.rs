use log::debug;
use crate::models::{Conf, Document};
use crate::parser::block_classifier::BlockClassifier;
use crate::parser::normalizer::normalize;
use crate::parser::text_processor::process_paragraph_runs;

/// Fountain 解析器
///
/// 依次执行：标准化 -> 块分类 -> 行内样式解析。每一步都返回新的值，
/// 解析器本身不保存任何中间状态，可以重复使用。
#[derive(Debug, Clone, Default)]
pub struct FountainParser {
    conf: Conf,
}

impl FountainParser {
    pub fn new(conf: Conf) -> Self {
        FountainParser { conf }
    }

    pub fn conf(&self) -> &Conf {
        &self.conf
    }

    /// 解析 Fountain 文本
    pub fn parse(&self, script: &str) -> Document {
        let normalized = normalize(script);
        let classified = BlockClassifier::new(&self.conf).classify(&normalized);
        let document = process_paragraph_runs(classified);
        debug!(
            "解析完成: {} 个段落 (回退类型 {})",
            document.len(),
            self.conf.fallback_element
        );
        document
    }
}
