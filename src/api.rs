//! 对外 API
//!
//! 给其他语言绑定调用的简单接口，配置使用字符串形式

use crate::models::{Conf, ConfResult};
use crate::parser::FountainParser;
use crate::fdx::write_document;

/// 简化的配置结构，回退元素用名称表示
#[derive(Debug, Clone)]
pub struct SimpleConf {
    pub fallback_element: String,
    pub use_dual_dialogue: bool,
}

impl Default for SimpleConf {
    fn default() -> Self {
        Self {
            fallback_element: "General".to_string(),
            use_dual_dialogue: true,
        }
    }
}

impl TryFrom<SimpleConf> for Conf {
    type Error = crate::models::ConfError;

    fn try_from(simple: SimpleConf) -> ConfResult<Self> {
        let mut conf = Conf::default().with_fallback(&simple.fallback_element)?;
        conf.use_dual_dialogue = simple.use_dual_dialogue;
        Ok(conf)
    }
}

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub success: bool,
    pub message: String,
    pub content: Option<String>,
}

/// 解析 Fountain 文本，返回 JSON 格式的文档结构
pub fn parse_fountain_text(text: String, config: Option<SimpleConf>) -> ExportResult {
    let conf: Conf = match config.unwrap_or_default().try_into() {
        Ok(conf) => conf,
        Err(e) => return ExportResult {
            success: false,
            message: format!("配置错误: {}", e),
            content: None,
        },
    };

    let document = FountainParser::new(conf).parse(&text);
    match serde_json::to_string(&document) {
        Ok(json) => ExportResult {
            success: true,
            message: "解析成功".to_string(),
            content: Some(json),
        },
        Err(e) => ExportResult {
            success: false,
            message: format!("序列化失败: {}", e),
            content: None,
        },
    }
}

/// 转换为 FDX 文本
pub fn convert_fountain_text(text: String, config: Option<SimpleConf>) -> ExportResult {
    let conf: Conf = match config.unwrap_or_default().try_into() {
        Ok(conf) => conf,
        Err(e) => return ExportResult {
            success: false,
            message: format!("配置错误: {}", e),
            content: None,
        },
    };

    let parser = FountainParser::new(conf);
    let document = parser.parse(&text);
    ExportResult {
        success: true,
        message: "FDX 转换成功".to_string(),
        content: Some(write_document(&document, parser.conf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_with_named_fallback() {
        let config = SimpleConf { fallback_element: "action".to_string(), ..SimpleConf::default() };
        let result = convert_fountain_text("text without type".to_string(), Some(config));
        assert!(result.success);
        assert!(result.content.unwrap().contains("Type=\"Action\"><Text>text without type</Text>"));
    }

    #[test]
    fn rejects_unknown_fallback() {
        let config = SimpleConf { fallback_element: "montage".to_string(), ..SimpleConf::default() };
        let result = convert_fountain_text("x".to_string(), Some(config));
        assert!(!result.success);
        assert!(result.content.is_none());
    }

    #[test]
    fn parse_returns_json() {
        let result = parse_fountain_text("\nPAUL\nHi.\n".to_string(), None);
        let json: serde_json::Value = serde_json::from_str(&result.content.unwrap()).unwrap();
        assert_eq!(json["paragraphs"][0]["element_type"], "Character");
        assert_eq!(json["paragraphs"][1]["runs"][0]["text"], "Hi.");
    }
}
