use log::trace;

use crate::block::{BlockNode, InlineNode, ListKind};
use crate::inline;

/// What to do with a blank run that touches the start or end of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankPolicy {
    #[default]
    Emit,
    Drop,
}

/// Scanner options. Blank runs between two content lines always become a spacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub leading_blanks: BlankPolicy,
    pub trailing_blanks: BlankPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            leading_blanks: BlankPolicy::Emit,
            trailing_blanks: BlankPolicy::Drop,
        }
    }
}

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<BlockNode> {
    parse_with_options(markdown, &ScanOptions::default())
}

pub fn parse_with_options(markdown: &str, options: &ScanOptions) -> Vec<BlockNode> {
    let mut state = ScanState::default();

    for line in markdown.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        process_line(line, options, &mut state);
    }

    state.close_list();
    if state.blank_run > 0 && options.trailing_blanks == BlankPolicy::Emit {
        state.blocks.push(BlockNode::Spacer(state.blank_run));
    }

    trace!("scanned {} blocks", state.blocks.len());
    state.blocks
}

#[derive(Default)]
struct ScanState {
    blocks: Vec<BlockNode>,
    // Items of the list currently being built
    open_list: Option<ListBuilder>,
    // Blank lines seen since the last content line
    blank_run: usize,
    seen_content: bool,
}

struct ListBuilder {
    kind: ListKind,
    items: Vec<Vec<InlineNode>>,
}

impl ScanState {
    fn close_list(&mut self) {
        if let Some(list) = self.open_list.take() {
            self.blocks.push(match list.kind {
                ListKind::Unordered => BlockNode::UnorderedList(list.items),
                ListKind::Ordered => BlockNode::OrderedList(list.items),
            });
        }
    }

    fn push_item(&mut self, kind: ListKind, item: Vec<InlineNode>) {
        if self.open_list.as_ref().is_some_and(|list| list.kind != kind) {
            self.close_list();
        }
        self.open_list
            .get_or_insert_with(|| ListBuilder {
                kind,
                items: Vec::new(),
            })
            .items
            .push(item);
    }

    fn push_block(&mut self, block: BlockNode) {
        self.close_list();
        self.blocks.push(block);
    }
}

fn process_line(line: &str, options: &ScanOptions, state: &mut ScanState) {
    if line.trim().is_empty() {
        state.blank_run += 1;
        return;
    }

    if state.blank_run > 0 {
        state.close_list();
        let run = std::mem::take(&mut state.blank_run);
        if state.seen_content || options.leading_blanks == BlankPolicy::Emit {
            state.blocks.push(BlockNode::Spacer(run));
        }
    }
    state.seen_content = true;

    if let Some((level, rest)) = heading(line) {
        let content = inline::format(rest);
        state.push_block(BlockNode::Heading { level, content });
    } else if let Some(rest) = unordered_item(line) {
        state.push_item(ListKind::Unordered, inline::format(rest));
    } else if let Some(rest) = ordered_item(line) {
        state.push_item(ListKind::Ordered, inline::format(rest));
    } else if matches!(line.trim(), "---" | "***") {
        state.push_block(BlockNode::HorizontalRule);
    } else if let Some(rest) = line.strip_prefix("> ") {
        state.push_block(BlockNode::Blockquote(inline::format(rest)));
    } else {
        state.push_block(BlockNode::Paragraph(inline::format(line)));
    }
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("# ", 1), ("## ", 2), ("### ", 3)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (level, rest)))
}

/// `-` or `*` followed by one whitespace character; both are stripped.
fn unordered_item(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let marker = chars.next()?;
    let space = chars.next()?;
    if matches!(marker, '-' | '*') && space.is_whitespace() {
        Some(chars.as_str())
    } else {
        None
    }
}

/// ASCII digits, a dot and one whitespace character.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let mut chars = rest.chars();
    if chars.next()?.is_whitespace() {
        Some(chars.as_str())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::InlineNode::{Bold, PlainText};
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Vec<InlineNode> {
        vec![PlainText(s.to_string())]
    }

    fn para(s: &str) -> BlockNode {
        BlockNode::Paragraph(text(s))
    }

    #[test]
    fn empty_document() {
        assert_eq!(parse(""), vec![]);
    }

    #[test]
    fn headings() {
        assert_eq!(
            parse("# One\n## Two\n### Three\n#### Four"),
            vec![
                BlockNode::Heading { level: 1, content: text("One") },
                BlockNode::Heading { level: 2, content: text("Two") },
                BlockNode::Heading { level: 3, content: text("Three") },
                para("#### Four"),
            ]
        );
    }

    #[test]
    fn heading_needs_space() {
        assert_eq!(parse("#Text"), vec![para("#Text")]);
        assert_eq!(
            parse("# Text"),
            vec![BlockNode::Heading { level: 1, content: text("Text") }]
        );
    }

    #[test]
    fn heading_content_is_formatted() {
        assert_eq!(
            parse("# **Big** day"),
            vec![BlockNode::Heading {
                level: 1,
                content: vec![Bold(text("Big")), PlainText(" day".into())],
            }]
        );
    }

    #[test]
    fn list_items_group() {
        assert_eq!(
            parse("- a\n- b\n* c"),
            vec![BlockNode::UnorderedList(vec![text("a"), text("b"), text("c")])]
        );
    }

    #[test]
    fn list_kind_switch_splits() {
        assert_eq!(
            parse("- a\n1. b"),
            vec![
                BlockNode::UnorderedList(vec![text("a")]),
                BlockNode::OrderedList(vec![text("b")]),
            ]
        );
    }

    #[test]
    fn ordered_then_unordered_splits() {
        assert_eq!(
            parse("1. a\n- b"),
            vec![
                BlockNode::OrderedList(vec![text("a")]),
                BlockNode::UnorderedList(vec![text("b")]),
            ]
        );
    }

    #[test]
    fn alternating_families_give_one_list_each() {
        assert_eq!(
            parse("- a\n1. b\n- c"),
            vec![
                BlockNode::UnorderedList(vec![text("a")]),
                BlockNode::OrderedList(vec![text("b")]),
                BlockNode::UnorderedList(vec![text("c")]),
            ]
        );
        assert_eq!(
            parse("1. a\n2. b\n* c\n3. d"),
            vec![
                BlockNode::OrderedList(vec![text("a"), text("b")]),
                BlockNode::UnorderedList(vec![text("c")]),
                BlockNode::OrderedList(vec![text("d")]),
            ]
        );
    }

    #[test]
    fn ordered_marker_is_stripped() {
        assert_eq!(
            parse("5. a\n12. b"),
            vec![BlockNode::OrderedList(vec![text("a"), text("b")])]
        );
    }

    #[test]
    fn ordered_needs_dot_and_space() {
        assert_eq!(parse("3 apples"), vec![para("3 apples")]);
        assert_eq!(parse("3.14"), vec![para("3.14")]);
    }

    #[test]
    fn blank_line_closes_list() {
        assert_eq!(
            parse("- a\n\n- b"),
            vec![
                BlockNode::UnorderedList(vec![text("a")]),
                BlockNode::Spacer(1),
                BlockNode::UnorderedList(vec![text("b")]),
            ]
        );
    }

    #[test]
    fn paragraph_closes_list() {
        assert_eq!(
            parse("- a\nafter"),
            vec![BlockNode::UnorderedList(vec![text("a")]), para("after")]
        );
    }

    #[test]
    fn blank_run_collapses() {
        assert_eq!(
            parse("a\n\n\nb"),
            vec![para("a"), BlockNode::Spacer(2), para("b")]
        );
    }

    #[test]
    fn whitespace_only_lines_are_blank() {
        assert_eq!(
            parse("a\n  \t\nb"),
            vec![para("a"), BlockNode::Spacer(1), para("b")]
        );
    }

    #[test]
    fn paragraphs_are_single_line() {
        assert_eq!(parse("one\ntwo"), vec![para("one"), para("two")]);
    }

    #[test]
    fn rules() {
        assert_eq!(
            parse("---\n  ***  \n- - -"),
            vec![
                BlockNode::HorizontalRule,
                BlockNode::HorizontalRule,
                BlockNode::UnorderedList(vec![text("- -")]),
            ]
        );
    }

    #[test]
    fn rule_closes_list() {
        assert_eq!(
            parse("1. a\n---"),
            vec![BlockNode::OrderedList(vec![text("a")]), BlockNode::HorizontalRule]
        );
    }

    #[test]
    fn blockquote() {
        assert_eq!(
            parse("> quoted\n>not"),
            vec![BlockNode::Blockquote(text("quoted")), para(">not")]
        );
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(
            parse("# Title\r\n- a\r\n- b\r\n"),
            vec![
                BlockNode::Heading { level: 1, content: text("Title") },
                BlockNode::UnorderedList(vec![text("a"), text("b")]),
            ]
        );
    }

    #[test]
    fn leading_blanks_emit_by_default() {
        assert_eq!(parse("\n\nx"), vec![BlockNode::Spacer(2), para("x")]);
    }

    #[test]
    fn leading_blanks_can_be_dropped() {
        let options = ScanOptions {
            leading_blanks: BlankPolicy::Drop,
            ..ScanOptions::default()
        };
        assert_eq!(parse_with_options("\n\nx", &options), vec![para("x")]);
    }

    #[test]
    fn trailing_blanks_drop_by_default() {
        assert_eq!(parse("x\n\n\n"), vec![para("x")]);
    }

    #[test]
    fn trailing_blanks_can_be_emitted() {
        let options = ScanOptions {
            trailing_blanks: BlankPolicy::Emit,
            ..ScanOptions::default()
        };
        // "x\n\n" splits into "x", "", "".
        assert_eq!(
            parse_with_options("x\n\n", &options),
            vec![para("x"), BlockNode::Spacer(2)]
        );
    }

    #[test]
    fn blank_only_document() {
        assert_eq!(parse("\n \n"), vec![]);
    }

    #[test]
    fn unicode_whitespace_after_marker() {
        assert_eq!(
            parse("-\u{a0}item"),
            vec![BlockNode::UnorderedList(vec![text("item")])]
        );
    }
}
