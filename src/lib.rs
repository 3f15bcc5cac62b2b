pub mod models;
pub mod utils;
pub mod parser;
pub mod fdx;
pub mod api;

pub use models::{
    Conf,
    ConfError,
    Document,
    DualDialogueGroup,
    DualDialogueGroupId,
    ElementType,
    Paragraph,
    Run,
    StyleSet
};

pub use parser::{
    FountainParser,
    BlockClassifier,
    normalize,
    parse_runs
};

pub use fdx::{
    FdxWriter,
    write_document
};

pub use api::{
    SimpleConf,
    ExportResult,
    parse_fountain_text,
    convert_fountain_text
};

/// 解析Fountain格式文本
///
/// # Arguments
///
/// * `script` - Fountain格式的剧本文本
/// * `config` - 配置对象(回退元素等)
///
/// # Returns
///
/// 分类并解析过样式的文档
pub fn parse(script: &str, config: &Conf) -> Document {
    FountainParser::new(config.clone()).parse(script)
}

/// 把Fountain文本转换为FDX
pub fn convert(script: &str, config: &Conf) -> String {
    let document = parse(script, config);
    write_document(&document, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let config = Conf::default();
        let result = convert("\nINT. ROOM - DAY\n\nHello, world!", &config);
        assert!(result.contains("Type=\"Scene Heading\"><Text>INT. ROOM - DAY</Text>"));
        assert!(result.contains("Type=\"General\"><Text>Hello, world!</Text>"));
    }
}
