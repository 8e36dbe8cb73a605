//! Fixed-layout target: every node carries its own metrics in points.

use crate::block::{ListKind, NodeKind};
use crate::project::{Backend, ProjectedItem};
use crate::style::{BlockMetrics, FixedStyles, SpanMetrics};

#[derive(Debug, Clone, PartialEq)]
pub struct FixedTree {
    pub blocks: Vec<FixedBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixedBlock {
    /// Headings, paragraphs and blockquotes.
    Text {
        kind: NodeKind,
        metrics: BlockMetrics,
        content: Vec<FixedInline>,
    },
    List {
        ordered: bool,
        items: Vec<FixedItem>,
    },
    Rule {
        metrics: BlockMetrics,
    },
    Spacer {
        height: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedItem {
    pub position: usize,
    /// Visible marker: a bullet, or the item's position followed by a dot.
    pub marker: String,
    pub metrics: BlockMetrics,
    pub content: Vec<FixedInline>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixedInline {
    Text(String),
    Styled {
        style: SpanMetrics,
        children: Vec<FixedInline>,
    },
    Code {
        style: SpanMetrics,
        text: String,
    },
    Link {
        style: SpanMetrics,
        text: String,
        href: String,
    },
}

impl FixedBlock {
    /// Inline count per text run: one entry for a text block, one per list item.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            FixedBlock::Text { content, .. } => vec![content.len()],
            FixedBlock::List { items, .. } => items.iter().map(|item| item.content.len()).collect(),
            FixedBlock::Rule { .. } | FixedBlock::Spacer { .. } => Vec::new(),
        }
    }
}

/// Builds fixed-layout nodes, multiplying every length by `scale`.
pub struct FixedBackend<'a> {
    styles: &'a FixedStyles,
    scale: f32,
}

impl<'a> FixedBackend<'a> {
    pub fn new(styles: &'a FixedStyles) -> Self {
        Self { styles, scale: 1.0 }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    fn metrics(&self, kind: NodeKind) -> BlockMetrics {
        self.styles.block(kind).scaled(self.scale)
    }

    fn span(&self, kind: NodeKind) -> SpanMetrics {
        let mut style = self.styles.span(kind).cloned().unwrap_or_default();
        style.padding *= self.scale;
        style
    }

    fn text_block(&self, kind: NodeKind, content: Vec<FixedInline>) -> FixedBlock {
        FixedBlock::Text {
            kind,
            metrics: self.metrics(kind),
            content,
        }
    }
}

impl Backend for FixedBackend<'_> {
    type Block = FixedBlock;
    type Inline = FixedInline;

    fn text(&self, text: &str) -> FixedInline {
        FixedInline::Text(text.to_string())
    }

    fn emphasis(&self, kind: NodeKind, children: Vec<FixedInline>) -> FixedInline {
        FixedInline::Styled {
            style: self.span(kind),
            children,
        }
    }

    fn code(&self, text: &str) -> FixedInline {
        FixedInline::Code {
            style: self.span(NodeKind::Code),
            text: text.to_string(),
        }
    }

    fn link(&self, text: &str, href: &str) -> FixedInline {
        FixedInline::Link {
            style: self.span(NodeKind::Link),
            text: text.to_string(),
            href: href.to_string(),
        }
    }

    fn heading(&self, level: u8, content: Vec<FixedInline>) -> FixedBlock {
        let kind = NodeKind::heading(level);
        self.text_block(kind, content)
    }

    fn paragraph(&self, content: Vec<FixedInline>) -> FixedBlock {
        self.text_block(NodeKind::Paragraph, content)
    }

    fn list(&self, kind: ListKind, items: Vec<ProjectedItem<FixedInline>>) -> FixedBlock {
        let metrics = self.metrics(NodeKind::ListItem);
        let ordered = kind == ListKind::Ordered;
        FixedBlock::List {
            ordered,
            items: items
                .into_iter()
                .map(|item| FixedItem {
                    position: item.position,
                    marker: if ordered {
                        format!("{}.", item.position)
                    } else {
                        "•".to_string()
                    },
                    metrics: metrics.clone(),
                    content: item.content,
                })
                .collect(),
        }
    }

    fn blockquote(&self, content: Vec<FixedInline>) -> FixedBlock {
        self.text_block(NodeKind::Blockquote, content)
    }

    fn rule(&self) -> FixedBlock {
        FixedBlock::Rule {
            metrics: self.metrics(NodeKind::HorizontalRule),
        }
    }

    fn spacer(&self, run: usize) -> FixedBlock {
        FixedBlock::Spacer {
            height: self.styles.spacer_height(run) * self.scale,
        }
    }
}
