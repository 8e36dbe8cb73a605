//! Reflow target: nodes tagged with class names, rendered to an HTML fragment.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::block::{ListKind, NodeKind};
use crate::project::{Backend, ProjectedItem};
use crate::style::ReflowStyles;

#[derive(Debug, Clone, PartialEq)]
pub struct ReflowTree {
    pub class: String,
    pub blocks: Vec<ReflowBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReflowBlock {
    Heading {
        level: u8,
        class: String,
        content: Vec<ReflowInline>,
    },
    Paragraph {
        class: String,
        content: Vec<ReflowInline>,
    },
    List {
        ordered: bool,
        class: String,
        items: Vec<ReflowItem>,
    },
    Blockquote {
        class: String,
        content: Vec<ReflowInline>,
    },
    Rule {
        class: String,
    },
    /// `repeat` copies of an empty element with the given class.
    Spacer {
        class: String,
        repeat: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReflowItem {
    pub position: usize,
    pub class: String,
    pub content: Vec<ReflowInline>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReflowInline {
    Text(String),
    Styled {
        class: String,
        children: Vec<ReflowInline>,
    },
    Code {
        class: String,
        text: String,
    },
    Link {
        class: String,
        text: String,
        href: String,
    },
}

impl ReflowBlock {
    /// Inline count per text run: one entry for a text block, one per list item.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ReflowBlock::Heading { content, .. }
            | ReflowBlock::Paragraph { content, .. }
            | ReflowBlock::Blockquote { content, .. } => vec![content.len()],
            ReflowBlock::List { items, .. } => items.iter().map(|item| item.content.len()).collect(),
            ReflowBlock::Rule { .. } | ReflowBlock::Spacer { .. } => Vec::new(),
        }
    }
}

/// Builds reflow nodes from a class table.
pub struct ReflowBackend<'a> {
    styles: &'a ReflowStyles,
}

impl<'a> ReflowBackend<'a> {
    pub fn new(styles: &'a ReflowStyles) -> Self {
        Self { styles }
    }

    fn class(&self, kind: NodeKind) -> String {
        self.styles.class(kind).to_string()
    }
}

impl Backend for ReflowBackend<'_> {
    type Block = ReflowBlock;
    type Inline = ReflowInline;

    fn text(&self, text: &str) -> ReflowInline {
        ReflowInline::Text(text.to_string())
    }

    fn emphasis(&self, kind: NodeKind, children: Vec<ReflowInline>) -> ReflowInline {
        ReflowInline::Styled {
            class: self.class(kind),
            children,
        }
    }

    fn code(&self, text: &str) -> ReflowInline {
        ReflowInline::Code {
            class: self.class(NodeKind::Code),
            text: text.to_string(),
        }
    }

    fn link(&self, text: &str, href: &str) -> ReflowInline {
        ReflowInline::Link {
            class: self.class(NodeKind::Link),
            text: text.to_string(),
            href: href.to_string(),
        }
    }

    fn heading(&self, level: u8, content: Vec<ReflowInline>) -> ReflowBlock {
        let kind = NodeKind::heading(level);
        // Same clamp as the class lookup.
        let level = match kind {
            NodeKind::Heading1 => 1,
            NodeKind::Heading2 => 2,
            _ => 3,
        };
        ReflowBlock::Heading {
            level,
            class: self.class(kind),
            content,
        }
    }

    fn paragraph(&self, content: Vec<ReflowInline>) -> ReflowBlock {
        ReflowBlock::Paragraph {
            class: self.class(NodeKind::Paragraph),
            content,
        }
    }

    fn list(&self, kind: ListKind, items: Vec<ProjectedItem<ReflowInline>>) -> ReflowBlock {
        let (ordered, list_kind) = match kind {
            ListKind::Unordered => (false, NodeKind::UnorderedList),
            ListKind::Ordered => (true, NodeKind::OrderedList),
        };
        ReflowBlock::List {
            ordered,
            class: self.class(list_kind),
            items: items
                .into_iter()
                .map(|item| ReflowItem {
                    position: item.position,
                    class: self.class(NodeKind::ListItem),
                    content: item.content,
                })
                .collect(),
        }
    }

    fn blockquote(&self, content: Vec<ReflowInline>) -> ReflowBlock {
        ReflowBlock::Blockquote {
            class: self.class(NodeKind::Blockquote),
            content,
        }
    }

    fn rule(&self) -> ReflowBlock {
        ReflowBlock::Rule {
            class: self.class(NodeKind::HorizontalRule),
        }
    }

    fn spacer(&self, run: usize) -> ReflowBlock {
        if run <= 1 {
            ReflowBlock::Spacer {
                class: self.class(NodeKind::Spacer),
                repeat: 1,
            }
        } else {
            ReflowBlock::Spacer {
                class: self.styles.spacer_unit.clone(),
                repeat: run - 1,
            }
        }
    }
}

/// Render a reflow tree as an HTML fragment. The output is not sanitized.
pub fn to_html(tree: &ReflowTree) -> String {
    let mut out = String::new();
    out.push_str("<div");
    push_class(&tree.class, &mut out);
    out.push_str(">\n");
    for block in &tree.blocks {
        block_to_html(block, &mut out);
    }
    out.push_str("</div>\n");
    out
}

fn push_class(class: &str, out: &mut String) {
    if !class.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&encode_double_quoted_attribute(class));
        out.push('"');
    }
}

fn open(tag: &str, class: &str, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    push_class(class, out);
    out.push('>');
}

fn close(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn block_to_html(block: &ReflowBlock, out: &mut String) {
    match block {
        ReflowBlock::Heading {
            level,
            class,
            content,
        } => {
            let tag = format!("h{level}");
            open(&tag, class, out);
            inlines_to_html(content, out);
            close(&tag, out);
        }
        ReflowBlock::Paragraph { class, content } => {
            open("p", class, out);
            inlines_to_html(content, out);
            close("p", out);
        }
        ReflowBlock::List {
            ordered,
            class,
            items,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            open(tag, class, out);
            out.push('\n');
            for item in items {
                open("li", &item.class, out);
                inlines_to_html(&item.content, out);
                close("li", out);
                out.push('\n');
            }
            close(tag, out);
        }
        ReflowBlock::Blockquote { class, content } => {
            open("blockquote", class, out);
            inlines_to_html(content, out);
            close("blockquote", out);
        }
        ReflowBlock::Rule { class } => {
            out.push_str("<hr");
            push_class(class, out);
            out.push_str(" />");
        }
        ReflowBlock::Spacer { class, repeat } => {
            for _ in 0..*repeat {
                open("div", class, out);
                close("div", out);
            }
        }
    }
    out.push('\n');
}

fn inlines_to_html(spans: &[ReflowInline], out: &mut String) {
    for span in spans {
        inline_to_html(span, out);
    }
}

fn inline_to_html(span: &ReflowInline, out: &mut String) {
    match span {
        ReflowInline::Text(text) => out.push_str(&encode_text(text)),
        ReflowInline::Styled { class, children } => {
            open("span", class, out);
            inlines_to_html(children, out);
            close("span", out);
        }
        ReflowInline::Code { class, text } => {
            open("code", class, out);
            out.push_str(&encode_text(text));
            close("code", out);
        }
        ReflowInline::Link { class, text, href } => {
            out.push_str("<a href=\"");
            out.push_str(&encode_double_quoted_attribute(href));
            out.push('"');
            push_class(class, out);
            out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\">");
            out.push_str(&encode_text(text));
            close("a", out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::to_html;
    use crate::style::ReflowStyles;
    use crate::{BlockNode, Config, InlineNode, markdown_to_html_with_config, reflow_tree};
    use pretty_assertions::assert_eq;

    /// Config with short class names so expected HTML stays readable.
    fn config() -> Config {
        let mut config = Config::default();
        config.reflow = ReflowStyles {
            container: "doc".into(),
            h1: "h1".into(),
            h2: "h2".into(),
            h3: "h3".into(),
            paragraph: "p".into(),
            unordered_list: "ul".into(),
            ordered_list: "ol".into(),
            list_item: "li".into(),
            blockquote: "q".into(),
            rule: "hr".into(),
            spacer: "gap".into(),
            spacer_unit: "unit".into(),
            bold: "b".into(),
            italic: "i".into(),
            bold_italic: "bi".into(),
            code: "c".into(),
            link: "a".into(),
        };
        config
    }

    fn html(markdown: &str) -> String {
        markdown_to_html_with_config(markdown, &config())
    }

    fn wrapped(body: &str) -> String {
        format!("<div class=\"doc\">\n{body}</div>\n")
    }

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            html("# Title\nSome **bold** text"),
            wrapped(
                "<h1 class=\"h1\">Title</h1>\n<p class=\"p\">Some <span class=\"b\">bold</span> text</p>\n"
            )
        );
    }

    #[test]
    fn lists() {
        assert_eq!(
            html("- a\n- b\n1. c"),
            wrapped(concat!(
                "<ul class=\"ul\">\n<li class=\"li\">a</li>\n<li class=\"li\">b</li>\n</ul>\n",
                "<ol class=\"ol\">\n<li class=\"li\">c</li>\n</ol>\n",
            ))
        );
    }

    #[test]
    fn quote_rule_and_inline_code() {
        assert_eq!(
            html("> `x`\n---"),
            wrapped("<blockquote class=\"q\"><code class=\"c\">x</code></blockquote>\n<hr class=\"hr\" />\n")
        );
    }

    #[test]
    fn spacers() {
        assert_eq!(
            html("a\n\nb\n\n\n\nc"),
            wrapped(concat!(
                "<p class=\"p\">a</p>\n",
                "<div class=\"gap\"></div>\n",
                "<p class=\"p\">b</p>\n",
                "<div class=\"unit\"></div><div class=\"unit\"></div>\n",
                "<p class=\"p\">c</p>\n",
            ))
        );
    }

    #[test]
    fn links_open_in_new_tab() {
        assert_eq!(
            html("[site](https://x.test/?a=1&b=2)"),
            wrapped(
                "<p class=\"p\"><a href=\"https://x.test/?a=1&amp;b=2\" class=\"a\" target=\"_blank\" rel=\"noopener noreferrer\">site</a></p>\n"
            )
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(
            html("<script>alert(1)</script> & co"),
            wrapped("<p class=\"p\">&lt;script&gt;alert(1)&lt;/script&gt; &amp; co</p>\n")
        );
    }

    #[test]
    fn out_of_range_heading_levels_clamp() {
        let blocks = [
            BlockNode::Heading {
                level: 7,
                content: vec![InlineNode::PlainText("deep".into())],
            },
            BlockNode::Heading {
                level: 0,
                content: vec![InlineNode::PlainText("zero".into())],
            },
        ];
        let tree = reflow_tree(&blocks, &config());
        assert_eq!(
            to_html(&tree),
            wrapped("<h3 class=\"h3\">deep</h3>\n<h3 class=\"h3\">zero</h3>\n")
        );
    }

    #[test]
    fn empty_document() {
        assert_eq!(html(""), wrapped(""));
    }
}
