//! FDX 输出
//!
//! 每个段落输出为 `<Paragraph Type="...">`，每个 run 输出为一个 `<Text>`，
//! 双对话的两个对白块放在同一个 `<DualDialogue>` 中。

use log::debug;
use crate::models::{Conf, Document, ElementType, Paragraph, Run, StyleSet};
use crate::parser::escaper::{
    escape_double_hyphens_between,
    escape_markup_chars,
    escape_xml,
    expand_tabs,
};

pub const FDX_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\" ?>\n\
<FinalDraft DocumentType=\"Script\" Template=\"No\" Version=\"1\">\n\n<Content>\n";
pub const FDX_FOOTER: &str = "</Content>\n</FinalDraft>\n";

/// FDX 写入器
pub struct FdxWriter {
    buffer: String,
    tab_width: usize,
}

impl FdxWriter {
    pub fn new(conf: &Conf) -> Self {
        FdxWriter {
            buffer: String::with_capacity(4096),
            tab_width: conf.tab_width,
        }
    }

    /// 写出整个文档
    pub fn write_document(mut self, document: &Document) -> String {
        self.buffer.push_str(FDX_HEADER);
        for (index, paragraph) in document.paragraphs.iter().enumerate() {
            let group = paragraph.group.and_then(|id| document.group(id));
            if group.is_some_and(|g| g.span().start == index) {
                self.buffer.push_str("<Paragraph><DualDialogue>\n");
            }
            self.write_paragraph(paragraph);
            if group.is_some_and(|g| g.span().end == index + 1) {
                self.buffer.push_str("</DualDialogue></Paragraph>\n");
            }
        }
        self.buffer.push_str(FDX_FOOTER);
        debug!("FDX 输出完成: {} 个段落, {} 字节", document.len(), self.buffer.len());
        self.buffer
    }

    /// 写出一个段落，run 直接作为 `<Text>` 子元素
    pub fn write_paragraph(&mut self, paragraph: &Paragraph) {
        self.buffer.push_str("<Paragraph");
        if paragraph.starts_new_page {
            self.buffer.push_str(" StartsNewPage=\"Yes\"");
        }
        self.buffer.push_str(" Type=\"");
        self.buffer.push_str(paragraph.element_type.fdx_name());
        self.buffer.push_str("\">");

        let runs = display_runs(paragraph);
        if runs.is_empty() {
            self.buffer.push_str("<Text></Text>");
        }
        // `--` 是否在内部要看整段文本，不能只看单个 run
        let plain: String = runs.iter().map(|run| run.text.as_str()).collect();
        let mut offset = 0;
        for run in &runs {
            let end = offset + run.text.len();
            self.write_run(run, paragraph.element_type, &plain[..offset], &plain[end..]);
            offset = end;
        }
        self.buffer.push_str("</Paragraph>\n");
    }

    fn write_run(&mut self, run: &Run, element_type: ElementType, before: &str, after: &str) {
        match run.style.fdx_style() {
            Some(style) => {
                self.buffer.push_str("<Text Style=\"");
                self.buffer.push_str(&style);
                self.buffer.push_str("\">");
            }
            None => self.buffer.push_str("<Text>"),
        }
        let encoded = self.encode_text(&run.text, element_type, before, after);
        self.buffer.push_str(&encoded);
        self.buffer.push_str("</Text>");
    }

    // General 保留原样的 "--"，Action 展开制表符
    //
    // 连字符先于 XML 转义处理，生成的 &#8209; 会被 escape_xml 原样保留
    fn encode_text(&self, text: &str, element_type: ElementType, before: &str, after: &str) -> String {
        let hyphenated = if element_type == ElementType::General {
            text.to_string()
        } else {
            escape_double_hyphens_between(before, text, after)
        };
        let mut encoded = escape_markup_chars(&escape_xml(&hyphenated));
        if element_type == ElementType::Action {
            encoded = expand_tabs(&encoded, self.tab_width);
        }
        encoded
    }
}

// 歌词整体加斜体，加完后重新合并相邻同样式 run
fn display_runs(paragraph: &Paragraph) -> Vec<Run> {
    if paragraph.element_type != ElementType::Lyric {
        return paragraph.runs.clone();
    }

    let mut runs: Vec<Run> = Vec::with_capacity(paragraph.runs.len());
    for run in &paragraph.runs {
        let style = run.style.union(StyleSet::ITALIC);
        match runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&run.text),
            _ => runs.push(Run::new(style, run.text.clone())),
        }
    }
    runs
}

/// 把文档写成 FDX 文本
pub fn write_document(document: &Document, conf: &Conf) -> String {
    FdxWriter::new(conf).write_document(document)
}
