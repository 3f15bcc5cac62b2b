use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::element_type::{ElementType, ElementTypeError};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfError {
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("无效的回退元素: {0}")]
    UnknownElement(#[from] ElementTypeError),
}

/// 配置结果
pub type ConfResult<T> = Result<T, ConfError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conf {
    /// 没有任何规则匹配时使用的元素类型
    pub fallback_element: ElementType,
    /// 是否识别双对话(角色名后的 ^)
    pub use_dual_dialogue: bool,
    /// Action 中制表符展开的空格数
    pub tab_width: usize,
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            fallback_element: ElementType::General,
            use_dual_dialogue: true,
            tab_width: 4,
        }
    }
}

impl Conf {
    /// 按名称设置回退元素，名称无效时返回错误
    pub fn with_fallback(mut self, name: &str) -> ConfResult<Self> {
        self.fallback_element = name.parse()?;
        Ok(self)
    }

    pub fn from_json(json: &str) -> ConfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_general_fallback() {
        let conf = Conf::default();
        assert_eq!(conf.fallback_element, ElementType::General);
        assert!(conf.use_dual_dialogue);
    }

    #[test]
    fn with_fallback_validates_name() {
        let conf = Conf::default().with_fallback("action").unwrap();
        assert_eq!(conf.fallback_element, ElementType::Action);

        let err = Conf::default().with_fallback("nonsense").unwrap_err();
        assert!(matches!(err, ConfError::UnknownElement(_)));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let conf = Conf::from_json(r#"{ "fallback_element": "Action" }"#).unwrap();
        assert_eq!(conf.fallback_element, ElementType::Action);
        assert_eq!(conf.tab_width, 4);

        assert!(matches!(
            Conf::from_json("{ not json"),
            Err(ConfError::JsonError(_))
        ));
    }
}
