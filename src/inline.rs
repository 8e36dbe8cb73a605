use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::block::InlineNode;

/// A span pattern and the node it produces from its captures.
struct SpanPattern {
    regex: Regex,
    build: fn(&Captures) -> InlineNode,
}

impl SpanPattern {
    fn new(pattern: &str, build: fn(&Captures) -> InlineNode) -> Self {
        Self {
            // Literal patterns; any typo fails every formatter test.
            regex: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid span pattern {pattern}: {e}")),
            build,
        }
    }
}

fn group<'a>(caps: &Captures<'a>, index: usize) -> &'a str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// Span patterns in precedence order. The first pattern that matches anywhere
/// in the remaining text wins, even if a later pattern would match earlier.
static PATTERNS: Lazy<Vec<SpanPattern>> = Lazy::new(|| {
    vec![
        SpanPattern::new(r"\*\*\*(.+?)\*\*\*", |c| {
            InlineNode::wrapped(group(c, 1), InlineNode::BoldItalic)
        }),
        SpanPattern::new(r"\*\*_(.+?)_\*\*", |c| {
            InlineNode::wrapped(group(c, 1), InlineNode::BoldItalic)
        }),
        SpanPattern::new(r"\*\*(.+?)\*\*", |c| {
            InlineNode::wrapped(group(c, 1), InlineNode::Bold)
        }),
        SpanPattern::new(r"_(.+?)_", |c| {
            InlineNode::wrapped(group(c, 1), InlineNode::Italic)
        }),
        SpanPattern::new(r"\*(.+?)\*", |c| {
            InlineNode::wrapped(group(c, 1), InlineNode::Italic)
        }),
        SpanPattern::new(r"`(.+?)`", |c| InlineNode::Code(group(c, 1).to_string())),
        SpanPattern::new(r"\[(.+?)\]\((.+?)\)", |c| InlineNode::Link {
            text: group(c, 1).to_string(),
            href: group(c, 2).to_string(),
        }),
    ]
});

/// Split one line of text into inline nodes.
///
/// Never fails: unmatched markers stay in the surrounding plain text.
pub fn format(text: &str) -> Vec<InlineNode> {
    let mut nodes = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let found = PATTERNS
            .iter()
            .find_map(|pattern| pattern.regex.captures(rest).map(|caps| (pattern, caps)));

        let Some((pattern, caps)) = found else {
            nodes.push(InlineNode::PlainText(rest.to_string()));
            break;
        };

        let whole = caps.get(0).map_or(0..0, |m| m.range());
        if whole.start > 0 {
            nodes.push(InlineNode::PlainText(rest[..whole.start].to_string()));
        }
        nodes.push((pattern.build)(&caps));
        rest = &rest[whole.end..];
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::format;
    use crate::block::InlineNode::{self, *};
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> InlineNode {
        PlainText(s.to_string())
    }

    fn wrap(s: &str) -> Vec<InlineNode> {
        vec![text(s)]
    }

    #[test]
    fn empty_input() {
        assert_eq!(format(""), vec![]);
    }

    #[test]
    fn plain_line() {
        assert_eq!(format("just words"), vec![text("just words")]);
    }

    #[test]
    fn triple_star_is_single_bold_italic() {
        assert_eq!(format("***x***"), vec![BoldItalic(wrap("x"))]);
    }

    #[test]
    fn underscore_bold_italic() {
        assert_eq!(format("**_x_**"), vec![BoldItalic(wrap("x"))]);
    }

    #[test]
    fn bold_then_italic() {
        assert_eq!(
            format("**a** and *b*"),
            vec![Bold(wrap("a")), text(" and "), Italic(wrap("b"))]
        );
    }

    #[test]
    fn precedence_beats_position() {
        // `*b*` starts first, but bold is tried before italic.
        assert_eq!(
            format("*b* then **a**"),
            vec![text("*b* then "), Bold(wrap("a"))]
        );
    }

    #[test]
    fn table_restarts_after_each_match() {
        assert_eq!(
            format("***a*** and **b**"),
            vec![BoldItalic(wrap("a")), text(" and "), Bold(wrap("b"))]
        );
    }

    #[test]
    fn higher_precedence_span_swallows_earlier_text() {
        assert_eq!(
            format("`c` **b** ***bi***"),
            vec![text("`c` **b** "), BoldItalic(wrap("bi"))]
        );
    }

    #[test]
    fn code_and_link() {
        assert_eq!(
            format("run `cargo` or see [docs](https://example.com)"),
            vec![
                text("run "),
                Code("cargo".into()),
                text(" or see "),
                Link {
                    text: "docs".into(),
                    href: "https://example.com".into()
                },
            ]
        );
    }

    #[test]
    fn underscore_italic() {
        assert_eq!(format("an _aside_ here"), vec![text("an "), Italic(wrap("aside")), text(" here")]);
    }

    #[test]
    fn emphasis_content_is_not_rescanned() {
        assert_eq!(format("**a `b` c**"), vec![Bold(wrap("a `b` c"))]);
    }

    #[test]
    fn empty_captures_do_not_match() {
        assert_eq!(format("**"), vec![text("**")]);
        assert_eq!(format("``"), vec![text("``")]);
        assert_eq!(format("[]()"), vec![text("[]()")]);
    }

    #[test]
    fn unclosed_markers_degrade_to_text() {
        assert_eq!(format("[text]("), vec![text("[text](")]);
        assert_eq!(format("*open"), vec![text("*open")]);
    }

    #[test]
    fn underscores_inside_words_still_match() {
        assert_eq!(
            format("snake_case_name"),
            vec![text("snake"), Italic(wrap("case")), text("name")]
        );
    }
}
