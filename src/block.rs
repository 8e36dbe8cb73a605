/// Inline spans produced from a single source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    PlainText(String),
    Bold(Vec<InlineNode>),
    Italic(Vec<InlineNode>),
    BoldItalic(Vec<InlineNode>),
    Code(String),
    Link { text: String, href: String },
}

impl InlineNode {
    /// Emphasis wrapping the raw captured text, which is never re-scanned.
    pub(crate) fn wrapped(text: &str, wrap: fn(Vec<InlineNode>) -> InlineNode) -> InlineNode {
        wrap(vec![InlineNode::PlainText(text.to_string())])
    }

    /// Visible text with all markup removed.
    pub fn plain_text(&self) -> String {
        match self {
            InlineNode::PlainText(text) | InlineNode::Code(text) => text.clone(),
            InlineNode::Bold(inner) | InlineNode::Italic(inner) | InlineNode::BoldItalic(inner) => {
                inner.iter().map(InlineNode::plain_text).collect()
            }
            InlineNode::Link { text, .. } => text.clone(),
        }
    }
}

/// The two list marker families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `-` or `*`
    Unordered,
    /// `<digits>.`
    Ordered,
}

/// Block-level elements scanned from Markdown, one or more per source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNode {
    Heading {
        level: u8,
        content: Vec<InlineNode>,
    },
    Paragraph(Vec<InlineNode>),
    UnorderedList(Vec<Vec<InlineNode>>),
    /// Items are numbered from 1 whatever digits the source used.
    OrderedList(Vec<Vec<InlineNode>>),
    Blockquote(Vec<InlineNode>),
    HorizontalRule,
    /// A collapsed run of blank lines; the count is always at least 1.
    Spacer(usize),
}

/// Style table key shared by both output targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    UnorderedList,
    OrderedList,
    ListItem,
    Blockquote,
    HorizontalRule,
    Spacer,
    Bold,
    Italic,
    BoldItalic,
    Code,
    Link,
}

impl NodeKind {
    /// Heading kind for a level; anything past 2 maps to the smallest heading.
    pub fn heading(level: u8) -> Self {
        match level {
            1 => NodeKind::Heading1,
            2 => NodeKind::Heading2,
            _ => NodeKind::Heading3,
        }
    }
}
