use crate::models::{Document, Paragraph, Run, StyleSet};

/// 样式标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    /// ***
    BoldItalic,
    /// **
    Bold,
    /// *
    Italic,
    /// _
    Underline,
}

impl Marker {
    fn literal(self) -> &'static str {
        match self {
            Marker::BoldItalic => "***",
            Marker::Bold => "**",
            Marker::Italic => "*",
            Marker::Underline => "_",
        }
    }

    fn from_stars(count: usize) -> Marker {
        match count {
            3 => Marker::BoldItalic,
            2 => Marker::Bold,
            _ => Marker::Italic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Char(char),
    Marker(Marker),
}

// 切分为字符和样式标记
//
// 连续的星号按 *** / ** / * 从左到右贪婪切分，\* 和 \_ 是普通字符
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some('*') | Some('_')) => {
                if let Some(escaped) = chars.next() {
                    tokens.push(Token::Char(escaped));
                }
            }
            '*' => {
                let mut count = 1;
                while chars.next_if_eq(&'*').is_some() {
                    count += 1;
                }
                while count > 0 {
                    let take = count.min(3);
                    tokens.push(Token::Marker(Marker::from_stars(take)));
                    count -= take;
                }
            }
            '_' => tokens.push(Token::Marker(Marker::Underline)),
            _ => tokens.push(Token::Char(c)),
        }
    }
    tokens
}

// 从左到右为每个未配对的开标记找同一行内最近的未配对同类闭标记，中间至少有一个 token
//
// 不同种类的标记互不影响，只处理 wanted 选中的种类
fn pair_markers(tokens: &[Token], partner: &mut [Option<usize>], wanted: impl Fn(Marker) -> bool) {
    for i in 0..tokens.len() {
        let marker = match tokens[i] {
            Token::Marker(marker) if partner[i].is_none() && wanted(marker) => marker,
            _ => continue,
        };

        for j in i + 2..tokens.len() {
            match tokens[j] {
                Token::Char('\n') => break,
                Token::Marker(other) if other == marker && partner[j].is_none() => {
                    partner[i] = Some(j);
                    partner[j] = Some(i);
                    break;
                }
                _ => {}
            }
        }
    }
}

// 没有配对的 *** 拆成 ** 和 *，两部分再分别和还在等待的粗体、斜体标记配对
// (`**a *b***`、`***a** b*`)。已有的配对下标换算到新的位置。
fn split_unpaired_stars(
    tokens: &[Token],
    partner: &[Option<usize>],
) -> (Vec<Token>, Vec<Option<usize>>) {
    let unpaired = |i: usize| {
        tokens[i] == Token::Marker(Marker::BoldItalic) && partner[i].is_none()
    };

    let mut position = Vec::with_capacity(tokens.len());
    let mut next = 0;
    for i in 0..tokens.len() {
        position.push(next);
        next += if unpaired(i) { 2 } else { 1 };
    }

    let mut split_tokens = Vec::with_capacity(next);
    let mut split_partner = Vec::with_capacity(next);
    for (i, token) in tokens.iter().enumerate() {
        if unpaired(i) {
            split_tokens.push(Token::Marker(Marker::Bold));
            split_tokens.push(Token::Marker(Marker::Italic));
            split_partner.push(None);
            split_partner.push(None);
        } else {
            split_tokens.push(*token);
            split_partner.push(partner[i].map(|j| position[j]));
        }
    }
    (split_tokens, split_partner)
}

// 相邻同样式合并，忽略空文本
#[derive(Default)]
struct RunBuilder {
    runs: Vec<Run>,
}

impl RunBuilder {
    fn push_str(&mut self, style: StyleSet, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(Run::new(style, text)),
        }
    }

    fn push_char(&mut self, style: StyleSet, c: char) {
        let mut buf = [0u8; 4];
        self.push_str(style, c.encode_utf8(&mut buf));
    }

    fn finish(self) -> Vec<Run> {
        self.runs
    }
}

#[derive(Default)]
struct StyleDepth {
    bold: usize,
    italic: usize,
    underline: usize,
}

impl StyleDepth {
    fn current(&self) -> StyleSet {
        StyleSet {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
        }
    }

    fn open(&mut self, marker: Marker) {
        match marker {
            Marker::BoldItalic => {
                self.bold += 1;
                self.italic += 1;
            }
            Marker::Bold => self.bold += 1,
            Marker::Italic => self.italic += 1,
            Marker::Underline => self.underline += 1,
        }
    }

    fn close(&mut self, marker: Marker) {
        match marker {
            Marker::BoldItalic => {
                self.bold = self.bold.saturating_sub(1);
                self.italic = self.italic.saturating_sub(1);
            }
            Marker::Bold => self.bold = self.bold.saturating_sub(1),
            Marker::Italic => self.italic = self.italic.saturating_sub(1),
            Marker::Underline => self.underline = self.underline.saturating_sub(1),
        }
    }
}

/// 把段落文本切分为样式 run
///
/// `**粗体**`、`*斜体*`、`_下划线_`、`***粗斜体***`；没有配对的标记按原文保留，
/// 转义的 `\*` `\_` 是普通字符。相邻的同样式 run 会合并。
/// 粗体和斜体可以用一个 `***` 同时结束(`**bold *both***`)。
///
/// 同一个单词内混合多种样式(如 `**b****xb***i*`)不保证得到预期的切分。
pub fn parse_runs(text: &str) -> Vec<Run> {
    let tokens = tokenize(text);
    let mut partner = vec![None; tokens.len()];
    pair_markers(&tokens, &mut partner, |marker| marker == Marker::BoldItalic);

    let (tokens, mut partner) = split_unpaired_stars(&tokens, &partner);
    pair_markers(&tokens, &mut partner, |_| true);

    let mut depth = StyleDepth::default();
    let mut builder = RunBuilder::default();
    for (i, token) in tokens.iter().enumerate() {
        match *token {
            Token::Char(c) => builder.push_char(depth.current(), c),
            Token::Marker(marker) => match partner[i] {
                Some(other) if other > i => depth.open(marker),
                Some(_) => depth.close(marker),
                None => builder.push_str(depth.current(), marker.literal()),
            },
        }
    }
    builder.finish()
}

/// 为文档中每个段落生成 run
pub fn process_paragraph_runs(document: Document) -> Document {
    let Document { paragraphs, groups } = document;
    let paragraphs = paragraphs
        .into_iter()
        .map(|paragraph| {
            let runs = parse_runs(&paragraph.text);
            Paragraph { runs, ..paragraph }
        })
        .collect();
    Document::new(paragraphs, groups)
}
