use std::ops::Range;
use log::{debug, trace};
use crate::models::{
    Conf,
    Document,
    DualDialogueGroup,
    DualDialogueGroupId,
    ElementType,
    Paragraph,
};
use crate::parser::escaper::is_page_break;
use crate::utils::{is_blank_line, trim_indent, FountainConstants, BLOCK_REGEX};

/// 以空行分隔的文本块
#[derive(Debug, Clone)]
struct Block<'a> {
    lines: Vec<&'a str>,
    /// 块前有分页线
    starts_new_page: bool,
}

/// 文本块的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    /// 角色 + 对白；dual 表示角色名带 ^
    Dialogue { dual: bool },
    Other,
}

#[derive(Debug, Clone)]
struct BlockSpan {
    range: Range<usize>,
    kind: BlockKind,
}

// 按空行(和分页线)切分文本块
fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut page_break_pending = false;
    let mut current_starts_page = false;

    for line in text.split('\n') {
        let page_break = is_page_break(line);
        if is_blank_line(line) || page_break {
            if !current.is_empty() {
                blocks.push(Block {
                    lines: std::mem::take(&mut current),
                    starts_new_page: current_starts_page,
                });
            }
            page_break_pending |= page_break;
            continue;
        }
        if current.is_empty() {
            current_starts_page = page_break_pending;
            page_break_pending = false;
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(Block { lines: current, starts_new_page: current_starts_page });
    }
    blocks
}

/// 块级分类器
pub struct BlockClassifier<'c> {
    conf: &'c Conf,
}

impl<'c> BlockClassifier<'c> {
    pub fn new(conf: &'c Conf) -> Self {
        BlockClassifier { conf }
    }

    /// 对标准化后的文本分段并分类，返回未解析 run 的文档
    pub fn classify(&self, text: &str) -> Document {
        let mut paragraphs = Vec::new();
        let mut spans = Vec::new();

        for block in split_blocks(text) {
            let start = paragraphs.len();
            let kind = self.classify_block(&block.lines, true, &mut paragraphs);
            if block.starts_new_page {
                if let Some(first) = paragraphs.get_mut(start) {
                    first.starts_new_page = true;
                }
            }
            spans.push(BlockSpan { range: start..paragraphs.len(), kind });
        }

        let groups = if self.conf.use_dual_dialogue {
            pair_dual_dialogue(&spans, &mut paragraphs)
        } else {
            Vec::new()
        };

        debug!("分类完成: {} 个段落, {} 组双对话", paragraphs.len(), groups.len());
        Document::new(paragraphs, groups)
    }

    // 按优先级依次匹配；after_blank 表示块前是空行或文档开头
    fn classify_block(&self, lines: &[&str], after_blank: bool, out: &mut Vec<Paragraph>) -> BlockKind {
        let Some((&first, rest)) = lines.split_first() else {
            return BlockKind::Other;
        };
        let head = trim_indent(first);

        // 强制镜头 / 强制动作
        if let Some(shot) = head.strip_prefix(FountainConstants::SHOT_SIGIL) {
            out.push(Paragraph::new(ElementType::Shot, join_with_first(shot, rest)));
            return BlockKind::Other;
        }
        if let Some(action) = head.strip_prefix(FountainConstants::ACTION_SIGIL) {
            out.push(Paragraph::new(ElementType::Action, join_with_first(action, rest)));
            return BlockKind::Other;
        }

        // 强制场景标题，后面的行另行分类
        if let Some(heading) = head.strip_prefix(FountainConstants::SCENE_HEADING_SIGIL) {
            if heading.chars().next().is_some_and(|c| c != FountainConstants::SCENE_HEADING_SIGIL) {
                out.push(Paragraph::new(ElementType::SceneHeading, heading.trim()));
                return self.classify_block(rest, false, out);
            }
        }

        let single_line = rest.is_empty() && after_blank;
        if single_line {
            if let Some(caps) = BLOCK_REGEX["scene_heading"].captures(first) {
                out.push(Paragraph::new(ElementType::SceneHeading, &caps[1]));
                return BlockKind::Other;
            }
        }

        // 强制转场；>居中<不算转场
        if let Some(transition) = head.strip_prefix(FountainConstants::TRANSITION_SIGIL) {
            if !transition.trim_end().ends_with('<') {
                out.push(Paragraph::new(ElementType::Transition, transition.trim()));
                return self.classify_block(rest, false, out);
            }
        }
        if single_line {
            let caps = BLOCK_REGEX["transition_left"]
                .captures(first)
                .or_else(|| BLOCK_REGEX["transition_right"].captures(first));
            if let Some(caps) = caps {
                out.push(Paragraph::new(ElementType::Transition, &caps[1]));
                return BlockKind::Other;
            }
        }

        if after_blank {
            // 强制角色名
            if let Some(caps) = BLOCK_REGEX["character_force"].captures(first) {
                out.push(Paragraph::new(ElementType::Character, caps[1].trim()));
                push_dialogue_lines(rest, out);
                return BlockKind::Dialogue { dual: caps.get(2).is_some() };
            }

            if !rest.is_empty() {
                if let Some(caps) = BLOCK_REGEX["character"].captures(first) {
                    // 带扩展时按原文截取，名字和括号之间的空白保持不变
                    let name = match (caps.get(1), caps.get(2)) {
                        (Some(name), Some(extension)) => &first[name.start()..extension.end()],
                        _ => &caps[1],
                    };
                    out.push(Paragraph::new(ElementType::Character, name));
                    push_dialogue_lines(rest, out);
                    return BlockKind::Dialogue { dual: caps.get(3).is_some() };
                }
            }
        }

        trace!("回退为 {}: {:?}", self.conf.fallback_element, first);
        out.push(Paragraph::new(self.conf.fallback_element, lines.join("\n")));
        BlockKind::Other
    }
}

fn join_with_first(first: &str, rest: &[&str]) -> String {
    let mut lines = Vec::with_capacity(rest.len() + 1);
    lines.push(first);
    lines.extend_from_slice(rest);
    lines.join("\n")
}

// 角色名之后的行：括号行为 Parenthetical，~ 开头为歌词，其余为对白；
// 连续的对白(或连续的歌词)合并为一个段落
fn push_dialogue_lines(lines: &[&str], out: &mut Vec<Paragraph>) {
    let block_start = out.len();
    for line in lines {
        let text = line.trim_matches([' ', '\t']);
        let (element_type, text) = if BLOCK_REGEX["parenthetical"].is_match(text) {
            (ElementType::Parenthetical, text)
        } else if let Some(lyric) = text.strip_prefix(FountainConstants::LYRIC_SIGIL) {
            (ElementType::Lyric, lyric.trim_start())
        } else {
            (ElementType::Dialogue, text)
        };

        if out.len() > block_start {
            if let Some(last) = out.last_mut() {
                let mergeable = matches!(element_type, ElementType::Dialogue | ElementType::Lyric);
                if mergeable && last.element_type == element_type {
                    last.text.push('\n');
                    last.text.push_str(text);
                    continue;
                }
            }
        }
        out.push(Paragraph::new(element_type, text));
    }
}

// 双对话配对：带 ^ 的对白块与紧挨着的前一个对白块组成一组，
// 前一个块不能已经属于其他组，两块之间不能有分页
fn pair_dual_dialogue(spans: &[BlockSpan], paragraphs: &mut [Paragraph]) -> Vec<DualDialogueGroup> {
    let mut groups = Vec::new();
    let mut grouped = vec![false; spans.len()];

    for i in 1..spans.len() {
        let (prev, current) = (&spans[i - 1], &spans[i]);
        if current.kind != (BlockKind::Dialogue { dual: true }) {
            continue;
        }
        let prev_is_dialogue = matches!(prev.kind, BlockKind::Dialogue { .. });
        let page_break = paragraphs
            .get(current.range.start)
            .is_some_and(|p| p.starts_new_page);
        if !prev_is_dialogue || grouped[i - 1] || page_break {
            continue;
        }

        let id = DualDialogueGroupId(groups.len());
        for paragraph in &mut paragraphs[prev.range.start..current.range.end] {
            paragraph.group = Some(id);
        }
        groups.push(DualDialogueGroup {
            first: prev.range.clone(),
            second: current.range.clone(),
        });
        grouped[i - 1] = true;
        grouped[i] = true;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Vec<(ElementType, String)> {
        classify_with(text, &Conf::default())
    }

    fn classify_with(text: &str, conf: &Conf) -> Vec<(ElementType, String)> {
        BlockClassifier::new(conf)
            .classify(text)
            .paragraphs
            .into_iter()
            .map(|p| (p.element_type, p.text))
            .collect()
    }

    fn p(element_type: ElementType, text: &str) -> (ElementType, String) {
        (element_type, text.to_string())
    }

    #[test]
    fn forced_action_wins_over_heading() {
        assert_eq!(classify("!INT. HEADING"), vec![p(ElementType::Action, "INT. HEADING")]);
    }

    #[test]
    fn forced_shot() {
        assert_eq!(classify("!/*SHOT*/SHOT"), vec![p(ElementType::Shot, "SHOT")]);
    }

    #[test]
    fn forced_heading_strips_dot() {
        assert_eq!(classify("\n. heading\n\n"), vec![p(ElementType::SceneHeading, "heading")]);
        assert_eq!(classify("...and then"), vec![p(ElementType::General, "...and then")]);
    }

    #[test]
    fn natural_heading_needs_single_line() {
        assert_eq!(classify("\nEXT. PARK\n\n"), vec![p(ElementType::SceneHeading, "EXT. PARK")]);
        assert_eq!(
            classify("int. house\n\nsomething"),
            vec![p(ElementType::SceneHeading, "int. house"), p(ElementType::General, "something")]
        );
    }

    #[test]
    fn forced_heading_remainder_is_classified_separately() {
        assert_eq!(
            classify(".ROOF\nWind howls."),
            vec![p(ElementType::SceneHeading, "ROOF"), p(ElementType::General, "Wind howls.")]
        );
    }

    #[test]
    fn transitions() {
        assert_eq!(classify("\nCUT TO:\n\n"), vec![p(ElementType::Transition, "CUT TO:")]);
        assert_eq!(classify("\nFADE OUT.\n"), vec![p(ElementType::Transition, "FADE OUT.")]);
        assert_eq!(classify("> CORTAR PARA"), vec![p(ElementType::Transition, "CORTAR PARA")]);
        assert_eq!(classify(">THE END<"), vec![p(ElementType::General, ">THE END<")]);
    }

    #[test]
    fn transition_variants() {
        assert_eq!(classify("\nFADE UP:\n\n"), vec![p(ElementType::Transition, "FADE UP:")]);
        assert_eq!(
            classify("\nINTERCUT WITH ON:\n\n"),
            vec![p(ElementType::Transition, "INTERCUT WITH ON:")]
        );
        assert_eq!(
            classify("\nFADE TO BLACK.\n"),
            vec![p(ElementType::Transition, "FADE TO BLACK.")]
        );
    }

    #[test]
    fn transition_needs_blank_line_after() {
        let doc = classify("\nCUT TO:\nmore");
        assert!(doc.iter().all(|(element_type, _)| *element_type != ElementType::Transition));
        assert_eq!(
            doc,
            vec![p(ElementType::Character, "CUT TO:"), p(ElementType::Dialogue, "more")]
        );
    }

    #[test]
    fn transition_needs_blank_line_before() {
        assert_eq!(
            classify(".ROOF\nCUT TO:"),
            vec![p(ElementType::SceneHeading, "ROOF"), p(ElementType::General, "CUT TO:")]
        );
    }

    #[test]
    fn heading_needs_blank_line_after() {
        let doc = classify("\nINT. HOUSE\nThe room.");
        assert!(doc.iter().all(|(element_type, _)| *element_type != ElementType::SceneHeading));
        assert_eq!(
            doc,
            vec![p(ElementType::Character, "INT. HOUSE"), p(ElementType::Dialogue, "The room.")]
        );
    }

    #[test]
    fn heading_needs_blank_line_before() {
        assert_eq!(
            classify("> FADE IN\nINT. HOUSE"),
            vec![p(ElementType::Transition, "FADE IN"), p(ElementType::General, "INT. HOUSE")]
        );
    }

    #[test]
    fn styled_heading_keeps_markers() {
        assert_eq!(
            classify("\n**INT. HOUSE - NIGHT**\n\n"),
            vec![p(ElementType::SceneHeading, "**INT. HOUSE - NIGHT**")]
        );
        assert_eq!(
            classify("\n_EXT. PARK_\n\n"),
            vec![p(ElementType::SceneHeading, "_EXT. PARK_")]
        );
    }

    #[test]
    fn character_and_dialogue() {
        assert_eq!(
            classify("\nPAUL\nWhat was it you said?\n"),
            vec![p(ElementType::Character, "PAUL"), p(ElementType::Dialogue, "What was it you said?")]
        );
    }

    #[test]
    fn indented_dialogue_is_trimmed() {
        assert_eq!(
            classify("      \nCHARACTER\n        (any text)\n        I am gonna say something\n"),
            vec![
                p(ElementType::Character, "CHARACTER"),
                p(ElementType::Parenthetical, "(any text)"),
                p(ElementType::Dialogue, "I am gonna say something"),
            ]
        );
    }

    #[test]
    fn forced_character_allows_lowercase() {
        assert_eq!(
            classify("\n@space and lowercase\nHello.\n"),
            vec![p(ElementType::Character, "space and lowercase"), p(ElementType::Dialogue, "Hello.")]
        );
    }

    #[test]
    fn character_keeps_extension() {
        assert_eq!(
            classify("\nMOM (O.S.)\nDinner!\n"),
            vec![p(ElementType::Character, "MOM (O.S.)"), p(ElementType::Dialogue, "Dinner!")]
        );
    }

    #[test]
    fn character_extension_keeps_source_spacing() {
        assert_eq!(
            classify("\nMOM(O.S.)\nDinner!\n"),
            vec![p(ElementType::Character, "MOM(O.S.)"), p(ElementType::Dialogue, "Dinner!")]
        );
        assert_eq!(
            classify("\nMOM (V.O.) ^\nDinner!\n")[0],
            p(ElementType::Character, "MOM (V.O.)")
        );
    }

    #[test]
    fn uppercase_line_alone_is_not_character() {
        assert_eq!(classify("\nBANG\n"), vec![p(ElementType::General, "BANG")]);
    }

    #[test]
    fn consecutive_dialogue_lines_merge() {
        assert_eq!(
            classify("\nANNA\nFirst line\nsecond line\n(beat)\n~la la\n~la\n"),
            vec![
                p(ElementType::Character, "ANNA"),
                p(ElementType::Dialogue, "First line\nsecond line"),
                p(ElementType::Parenthetical, "(beat)"),
                p(ElementType::Lyric, "la la\nla"),
            ]
        );
    }

    #[test]
    fn fallback_is_configurable() {
        assert_eq!(classify("text without type"), vec![p(ElementType::General, "text without type")]);

        let conf = Conf { fallback_element: ElementType::Action, ..Conf::default() };
        assert_eq!(
            classify_with("text without type", &conf),
            vec![p(ElementType::Action, "text without type")]
        );
    }

    #[test]
    fn page_break_marks_next_paragraph() {
        let doc = BlockClassifier::new(&Conf::default()).classify("one\n===\ntwo");
        assert_eq!(doc.paragraphs.len(), 2);
        assert!(!doc.paragraphs[0].starts_new_page);
        assert!(doc.paragraphs[1].starts_new_page);
    }

    #[test]
    fn dual_dialogue_pairs_adjacent_blocks() {
        let doc = BlockClassifier::new(&Conf::default())
            .classify("\nBRICK\nScrew retirement.\n\nSTEEL ^\nScrew retirement.\n");
        assert_eq!(doc.groups, vec![DualDialogueGroup { first: 0..2, second: 2..4 }]);
        assert_eq!(doc.paragraphs[2].text, "STEEL");
        assert!(doc.paragraphs.iter().all(|p| p.group == Some(DualDialogueGroupId(0))));
    }

    #[test]
    fn dual_marker_without_partner_is_plain_dialogue() {
        let doc = BlockClassifier::new(&Conf::default())
            .classify("\nA quiet room.\n\nSTEEL ^\nHello?\n");
        assert!(doc.groups.is_empty());
        assert_eq!(doc.paragraphs[1].text, "STEEL");
        assert_eq!(doc.paragraphs[1].group, None);
    }

    #[test]
    fn dual_dialogue_can_be_disabled() {
        let conf = Conf { use_dual_dialogue: false, ..Conf::default() };
        let doc = BlockClassifier::new(&conf).classify("\nA\nhi\n\nB ^\nho\n");
        assert!(doc.groups.is_empty());
        assert_eq!(doc.paragraphs[2].text, "B");
    }

    #[test]
    fn dual_dialogue_does_not_pair_across_page_break() {
        let doc = BlockClassifier::new(&Conf::default())
            .classify("\nBRICK\nScrew retirement.\n===\nSTEEL ^\nScrew retirement.\n");
        assert!(doc.groups.is_empty());
        assert_eq!(doc.paragraphs[2].text, "STEEL");
        assert!(doc.paragraphs[2].starts_new_page);
        assert!(doc.paragraphs.iter().all(|p| p.group.is_none()));
    }

    #[test]
    fn grouped_block_is_not_reused() {
        let doc = BlockClassifier::new(&Conf::default())
            .classify("\nA\nhi\n\nB ^\nho\n\nC ^\nhey\n");
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.paragraphs[4].group, None);
    }
}
