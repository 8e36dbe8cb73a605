use crate::block::{BlockNode, InlineNode, ListKind, NodeKind};

/// The output target a document is projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Layout adapts to the embedding container (HTML preview).
    Reflow,
    /// Explicit metrics for a paginated export.
    Fixed,
}

impl Target {
    pub fn from_reflow_flag(as_reflow: bool) -> Self {
        if as_reflow { Target::Reflow } else { Target::Fixed }
    }
}

/// A list item after projection. Positions count from 1 for both list kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedItem<I> {
    pub position: usize,
    pub content: Vec<I>,
}

/// Node constructors for one output target.
///
/// [`project`] is the only walk over the block tree, so every backend sees
/// the same blocks, items and spans in the same order.
pub trait Backend {
    type Block;
    type Inline;

    fn text(&self, text: &str) -> Self::Inline;
    /// Bold, italic or bold-italic around already projected children.
    fn emphasis(&self, kind: NodeKind, children: Vec<Self::Inline>) -> Self::Inline;
    fn code(&self, text: &str) -> Self::Inline;
    fn link(&self, text: &str, href: &str) -> Self::Inline;

    fn heading(&self, level: u8, content: Vec<Self::Inline>) -> Self::Block;
    fn paragraph(&self, content: Vec<Self::Inline>) -> Self::Block;
    fn list(&self, kind: ListKind, items: Vec<ProjectedItem<Self::Inline>>) -> Self::Block;
    fn blockquote(&self, content: Vec<Self::Inline>) -> Self::Block;
    fn rule(&self) -> Self::Block;
    fn spacer(&self, run: usize) -> Self::Block;
}

pub fn project<B: Backend>(blocks: &[BlockNode], backend: &B) -> Vec<B::Block> {
    blocks.iter().map(|block| project_block(block, backend)).collect()
}

fn project_block<B: Backend>(block: &BlockNode, backend: &B) -> B::Block {
    match block {
        BlockNode::Heading { level, content } => {
            backend.heading(*level, project_inlines(content, backend))
        }
        BlockNode::Paragraph(content) => backend.paragraph(project_inlines(content, backend)),
        BlockNode::UnorderedList(items) => {
            backend.list(ListKind::Unordered, project_items(items, backend))
        }
        BlockNode::OrderedList(items) => {
            backend.list(ListKind::Ordered, project_items(items, backend))
        }
        BlockNode::Blockquote(content) => backend.blockquote(project_inlines(content, backend)),
        BlockNode::HorizontalRule => backend.rule(),
        BlockNode::Spacer(run) => backend.spacer(*run),
    }
}

fn project_items<B: Backend>(
    items: &[Vec<InlineNode>],
    backend: &B,
) -> Vec<ProjectedItem<B::Inline>> {
    items
        .iter()
        .enumerate()
        .map(|(i, content)| ProjectedItem {
            position: i + 1,
            content: project_inlines(content, backend),
        })
        .collect()
}

fn project_inlines<B: Backend>(spans: &[InlineNode], backend: &B) -> Vec<B::Inline> {
    spans.iter().map(|span| project_inline(span, backend)).collect()
}

fn project_inline<B: Backend>(span: &InlineNode, backend: &B) -> B::Inline {
    match span {
        InlineNode::PlainText(text) => backend.text(text),
        InlineNode::Bold(inner) => backend.emphasis(NodeKind::Bold, project_inlines(inner, backend)),
        InlineNode::Italic(inner) => {
            backend.emphasis(NodeKind::Italic, project_inlines(inner, backend))
        }
        InlineNode::BoldItalic(inner) => {
            backend.emphasis(NodeKind::BoldItalic, project_inlines(inner, backend))
        }
        InlineNode::Code(text) => backend.code(text),
        InlineNode::Link { text, href } => backend.link(text, href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    /// Records the call sequence, to check the traversal itself.
    struct Trace;

    impl Backend for Trace {
        type Block = String;
        type Inline = String;

        fn text(&self, text: &str) -> String {
            format!("'{text}'")
        }
        fn emphasis(&self, kind: NodeKind, children: Vec<String>) -> String {
            format!("{kind:?}({})", children.join(","))
        }
        fn code(&self, text: &str) -> String {
            format!("code({text})")
        }
        fn link(&self, text: &str, href: &str) -> String {
            format!("link({text}->{href})")
        }
        fn heading(&self, level: u8, content: Vec<String>) -> String {
            format!("h{level}[{}]", content.join(" "))
        }
        fn paragraph(&self, content: Vec<String>) -> String {
            format!("p[{}]", content.join(" "))
        }
        fn list(&self, kind: ListKind, items: Vec<ProjectedItem<String>>) -> String {
            let items: Vec<String> = items
                .into_iter()
                .map(|item| format!("{}:{}", item.position, item.content.join(" ")))
                .collect();
            format!("{kind:?}[{}]", items.join(" | "))
        }
        fn blockquote(&self, content: Vec<String>) -> String {
            format!("quote[{}]", content.join(" "))
        }
        fn rule(&self) -> String {
            "hr".to_string()
        }
        fn spacer(&self, run: usize) -> String {
            format!("gap{run}")
        }
    }

    #[test]
    fn traversal_order() {
        let blocks = parse("# **T**\n\n\n5. a\n5. *b*\n> [q](u)\n---\n`x`");
        assert_eq!(
            project(&blocks, &Trace),
            vec![
                "h1[Bold('T')]",
                "gap2",
                "Ordered[1:'a' | 2:Italic('b')]",
                "quote[link(q->u)]",
                "hr",
                "p[code(x)]",
            ]
        );
    }

    #[test]
    fn reflow_flag() {
        assert_eq!(Target::from_reflow_flag(true), Target::Reflow);
        assert_eq!(Target::from_reflow_flag(false), Target::Fixed);
    }
}
