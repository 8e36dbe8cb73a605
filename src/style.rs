//! Style tables for the two output targets.
//!
//! The reflow table maps each node kind to a class string that the embedding
//! page styles; the fixed table maps it to explicit metrics in points. Both
//! are plain data, loaded once and shared read-only.

use serde::{Deserialize, Serialize};

use crate::block::NodeKind;

/// Class names for the reflow (HTML preview) target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflowStyles {
    pub container: String,
    pub h1: String,
    pub h2: String,
    pub h3: String,
    pub paragraph: String,
    pub unordered_list: String,
    pub ordered_list: String,
    pub list_item: String,
    pub blockquote: String,
    pub rule: String,
    /// Spacer for a single blank line.
    pub spacer: String,
    /// Spacer repeated once per extra blank line in longer runs.
    pub spacer_unit: String,
    pub bold: String,
    pub italic: String,
    pub bold_italic: String,
    pub code: String,
    pub link: String,
}

impl Default for ReflowStyles {
    fn default() -> Self {
        Self {
            container: "prose max-w-none p-4".into(),
            h1: "text-2xl font-bold my-4".into(),
            h2: "text-xl font-bold my-3".into(),
            h3: "text-lg font-bold my-2".into(),
            paragraph: "text-base my-2".into(),
            unordered_list: "list-disc ml-5".into(),
            ordered_list: "list-decimal ml-5".into(),
            list_item: "ml-1".into(),
            blockquote: "border-l-4 border-gray-300 pl-4 italic text-gray-600".into(),
            rule: "my-4 border-t border-gray-300".into(),
            spacer: "h-2".into(),
            spacer_unit: "h-4".into(),
            bold: "font-bold".into(),
            italic: "italic".into(),
            bold_italic: "font-bold italic".into(),
            code: "font-mono bg-gray-100 p-1 rounded".into(),
            link: "text-blue-600 underline".into(),
        }
    }
}

impl ReflowStyles {
    pub fn class(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Heading1 => &self.h1,
            NodeKind::Heading2 => &self.h2,
            NodeKind::Heading3 => &self.h3,
            NodeKind::Paragraph => &self.paragraph,
            NodeKind::UnorderedList => &self.unordered_list,
            NodeKind::OrderedList => &self.ordered_list,
            NodeKind::ListItem => &self.list_item,
            NodeKind::Blockquote => &self.blockquote,
            NodeKind::HorizontalRule => &self.rule,
            NodeKind::Spacer => &self.spacer,
            NodeKind::Bold => &self.bold,
            NodeKind::Italic => &self.italic,
            NodeKind::BoldItalic => &self.bold_italic,
            NodeKind::Code => &self.code,
            NodeKind::Link => &self.link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderSide {
    Left,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub side: BorderSide,
    pub width: f32,
    pub color: String,
}

/// Explicit metrics for a block on the fixed-layout target. Lengths are points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockMetrics {
    pub font_size: f32,
    pub margin_before: f32,
    pub margin_after: f32,
    /// Multiple of the font size.
    pub line_height: f32,
    pub color: String,
    /// Offset from the left page margin.
    pub indent: f32,
    /// Gap between the border (if any) and the text.
    pub padding: f32,
    pub weight: u16,
    pub italic: bool,
    pub border: Option<Border>,
}

impl Default for BlockMetrics {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            margin_before: 0.0,
            margin_after: 8.0,
            line_height: 1.5,
            color: "#000000".into(),
            indent: 0.0,
            padding: 0.0,
            weight: 400,
            italic: false,
            border: None,
        }
    }
}

impl BlockMetrics {
    fn heading(font_size: f32, margin_after: f32) -> Self {
        Self {
            font_size,
            margin_after,
            line_height: 1.2,
            weight: 700,
            ..Self::default()
        }
    }

    /// Same metrics with every length multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            font_size: self.font_size * factor,
            margin_before: self.margin_before * factor,
            margin_after: self.margin_after * factor,
            indent: self.indent * factor,
            padding: self.padding * factor,
            border: self.border.as_ref().map(|border| Border {
                width: border.width * factor,
                ..border.clone()
            }),
            ..self.clone()
        }
    }
}

/// Overrides an inline span applies on top of its block's metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanMetrics {
    pub weight: Option<u16>,
    pub italic: bool,
    pub monospace: bool,
    pub underline: bool,
    pub color: Option<String>,
    pub background: Option<String>,
    pub padding: f32,
}

/// Metrics for the fixed-layout (paginated) target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedStyles {
    pub h1: BlockMetrics,
    pub h2: BlockMetrics,
    pub h3: BlockMetrics,
    pub paragraph: BlockMetrics,
    pub list_item: BlockMetrics,
    pub blockquote: BlockMetrics,
    pub rule: BlockMetrics,
    /// Height of a single blank line.
    pub spacer_gap: f32,
    /// Height added per extra blank line in longer runs.
    pub spacer_unit: f32,
    pub bold: SpanMetrics,
    pub italic: SpanMetrics,
    pub bold_italic: SpanMetrics,
    pub code: SpanMetrics,
    pub link: SpanMetrics,
}

impl Default for FixedStyles {
    fn default() -> Self {
        Self {
            h1: BlockMetrics::heading(24.0, 10.0),
            h2: BlockMetrics::heading(20.0, 8.0),
            h3: BlockMetrics::heading(16.0, 6.0),
            paragraph: BlockMetrics::default(),
            list_item: BlockMetrics {
                margin_after: 4.0,
                indent: 12.0,
                ..BlockMetrics::default()
            },
            blockquote: BlockMetrics {
                font_size: 11.0,
                indent: 8.0,
                padding: 8.0,
                italic: true,
                border: Some(Border {
                    side: BorderSide::Left,
                    width: 2.0,
                    color: "#cccccc".into(),
                }),
                ..BlockMetrics::default()
            },
            rule: BlockMetrics {
                margin_before: 10.0,
                margin_after: 10.0,
                border: Some(Border {
                    side: BorderSide::Bottom,
                    width: 0.5,
                    color: "#888888".into(),
                }),
                ..BlockMetrics::default()
            },
            spacer_gap: 6.0,
            spacer_unit: 12.0,
            bold: SpanMetrics {
                weight: Some(900),
                ..SpanMetrics::default()
            },
            italic: SpanMetrics {
                italic: true,
                ..SpanMetrics::default()
            },
            bold_italic: SpanMetrics {
                weight: Some(900),
                italic: true,
                ..SpanMetrics::default()
            },
            code: SpanMetrics {
                monospace: true,
                background: Some("#f5f5f5".into()),
                padding: 2.0,
                ..SpanMetrics::default()
            },
            link: SpanMetrics {
                underline: true,
                color: Some("#0000ff".into()),
                ..SpanMetrics::default()
            },
        }
    }
}

impl FixedStyles {
    /// Block metrics for a node kind; kinds without their own entry use the paragraph's.
    pub fn block(&self, kind: NodeKind) -> &BlockMetrics {
        match kind {
            NodeKind::Heading1 => &self.h1,
            NodeKind::Heading2 => &self.h2,
            NodeKind::Heading3 => &self.h3,
            NodeKind::ListItem | NodeKind::UnorderedList | NodeKind::OrderedList => {
                &self.list_item
            }
            NodeKind::Blockquote => &self.blockquote,
            NodeKind::HorizontalRule => &self.rule,
            _ => &self.paragraph,
        }
    }

    /// Span overrides for an inline node kind. Plain text has none.
    pub fn span(&self, kind: NodeKind) -> Option<&SpanMetrics> {
        match kind {
            NodeKind::Bold => Some(&self.bold),
            NodeKind::Italic => Some(&self.italic),
            NodeKind::BoldItalic => Some(&self.bold_italic),
            NodeKind::Code => Some(&self.code),
            NodeKind::Link => Some(&self.link),
            _ => None,
        }
    }

    /// Spacer height for a blank run: one gap for a single line, otherwise
    /// one unit per line beyond the first.
    pub fn spacer_height(&self, run: usize) -> f32 {
        if run <= 1 {
            self.spacer_gap
        } else {
            (run - 1) as f32 * self.spacer_unit
        }
    }
}
