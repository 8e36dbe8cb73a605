//! Lowering of the fixed-layout tree to Typst markup.
//!
//! Every block states its own spacing, size, fill and stroke, and all text
//! goes through string literals, so the output never depends on Typst's
//! default styles or on markup characters in the source text.

use crate::block::NodeKind;
use crate::config::{Config, FontConfig};
use crate::fixed::{FixedBlock, FixedInline, FixedItem, FixedTree};
use crate::style::{BlockMetrics, BorderSide, SpanMetrics};

/// Lists with at most this many items are kept on one page.
const UNBREAKABLE_LIST_ITEMS: usize = 5;

/// Convert a fixed-layout tree to Typst markup
pub fn tree_to_typst(tree: &FixedTree, config: &Config) -> String {
    let mut out = String::new();
    emit_preamble(config, &mut out);

    let blocks = &tree.blocks;
    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];

        if is_heading(block) {
            // Keep a run of headings with the first content block after it
            out.push_str("#block(breakable: false)[\n");
            emit_block(block, &config.font, &mut out);
            while i + 1 < blocks.len() {
                i += 1;
                emit_block(&blocks[i], &config.font, &mut out);
                if !is_heading(&blocks[i]) {
                    break;
                }
            }
            out.push_str("]\n");
        } else {
            emit_block(block, &config.font, &mut out);
        }

        i += 1;
    }

    out
}

fn is_heading(block: &FixedBlock) -> bool {
    matches!(
        block,
        FixedBlock::Text {
            kind: NodeKind::Heading1 | NodeKind::Heading2 | NodeKind::Heading3,
            ..
        }
    )
}

fn emit_preamble(config: &Config, out: &mut String) {
    out.push_str(&format!(
        "#set page(paper: {}, margin: {}",
        string_literal(&config.page.paper),
        pt(config.page.margin)
    ));
    if config.page.numbers {
        out.push_str(", numbering: \"1\"");
    }
    out.push_str(")\n");
    out.push_str(&format!(
        "#set text(font: {}, top-edge: \"ascender\", bottom-edge: \"descender\")\n",
        string_literal(&config.font.body)
    ));
    out.push_str("#set par(linebreaks: \"optimized\", spacing: 0pt)\n");
    out.push_str("#set block(spacing: 0pt)\n\n");
}

fn emit_block(block: &FixedBlock, font: &FontConfig, out: &mut String) {
    match block {
        FixedBlock::Text {
            metrics, content, ..
        } => {
            emit_text_block(metrics, "", content, font, out);
        }
        FixedBlock::List { items, .. } => {
            if items.len() <= UNBREAKABLE_LIST_ITEMS {
                out.push_str("#block(breakable: false)[\n");
                emit_items(items, font, out);
                out.push_str("]\n");
            } else {
                emit_items(items, font, out);
            }
        }
        FixedBlock::Rule { metrics } => {
            out.push_str(&format!(
                "#block(above: {}, below: {}, inset: (left: {}))[#line(length: 100%{})]\n",
                pt(metrics.margin_before),
                pt(metrics.margin_after),
                pt(metrics.indent),
                metrics
                    .border
                    .as_ref()
                    .map(|b| format!(", stroke: {}", stroke(b.width, &b.color)))
                    .unwrap_or_default()
            ));
        }
        FixedBlock::Spacer { height } => {
            out.push_str(&format!("#v({})\n", pt(*height)));
        }
    }
}

fn emit_items(items: &[FixedItem], font: &FontConfig, out: &mut String) {
    for item in items {
        let marker = format!("{} ", item.marker);
        emit_text_block(&item.metrics, &marker, &item.content, font, out);
    }
}

fn emit_text_block(
    metrics: &BlockMetrics,
    prefix: &str,
    content: &[FixedInline],
    font: &FontConfig,
    out: &mut String,
) {
    out.push_str(&format!(
        "#block(above: {}, below: {}, inset: (left: {}))[",
        pt(metrics.margin_before),
        pt(metrics.margin_after),
        pt(metrics.indent)
    ));

    let framed = metrics.padding > 0.0 || metrics.border.is_some();
    if framed {
        out.push_str(&format!("#block(inset: {}", inset(metrics)));
        if let Some(border) = &metrics.border {
            out.push_str(&format!(
                ", stroke: ({}: {})",
                side_name(border.side),
                stroke(border.width, &border.color)
            ));
        }
        out.push_str(")[");
    }

    out.push('\n');
    out.push_str(&format!(
        "#set par(leading: {})\n",
        pt(((metrics.line_height - 1.0) * metrics.font_size).max(0.0))
    ));
    out.push_str(&format!(
        "#set text(size: {}, fill: {}, weight: {}{})\n",
        pt(metrics.font_size),
        color(&metrics.color),
        metrics.weight,
        if metrics.italic { ", style: \"italic\"" } else { "" }
    ));
    if !prefix.is_empty() {
        out.push('#');
        out.push_str(&string_literal(prefix));
    }
    inlines_to_typst(content, font, out);
    out.push('\n');

    if framed {
        out.push(']');
    }
    out.push_str("]\n");
}

fn inset(metrics: &BlockMetrics) -> String {
    match metrics.border.as_ref().map(|b| b.side) {
        Some(BorderSide::Bottom) => format!("(bottom: {})", pt(metrics.padding)),
        _ => format!("(left: {})", pt(metrics.padding)),
    }
}

fn side_name(side: BorderSide) -> &'static str {
    match side {
        BorderSide::Left => "left",
        BorderSide::Bottom => "bottom",
    }
}

fn inlines_to_typst(spans: &[FixedInline], font: &FontConfig, out: &mut String) {
    for span in spans {
        out.push('#');
        out.push_str(&inline_expr(span, font));
    }
}

/// A code-mode expression for one inline node.
fn inline_expr(span: &FixedInline, font: &FontConfig) -> String {
    match span {
        FixedInline::Text(text) => string_literal(text),
        FixedInline::Styled { style, children } => {
            let mut body = String::from("[");
            inlines_to_typst(children, font, &mut body);
            body.push(']');
            styled(style, body, font)
        }
        FixedInline::Code { style, text } => styled(style, string_literal(text), font),
        FixedInline::Link { style, text, href } => format!(
            "link({}, {})",
            string_literal(href),
            styled(style, string_literal(text), font)
        ),
    }
}

fn styled(style: &SpanMetrics, body: String, font: &FontConfig) -> String {
    let mut args = Vec::new();
    if let Some(weight) = style.weight {
        args.push(format!("weight: {weight}"));
    }
    if style.italic {
        args.push("style: \"italic\"".to_string());
    }
    if style.monospace {
        args.push(format!("font: {}", string_literal(&font.monospace)));
    }
    if let Some(fill) = &style.color {
        args.push(format!("fill: {}", color(fill)));
    }
    args.push(body);

    let mut expr = format!("text({})", args.join(", "));
    if style.underline {
        expr = format!("underline({expr})");
    }
    if let Some(background) = &style.background {
        expr = format!(
            "box(fill: {}, inset: (x: {pad}), outset: (y: {pad}), {expr})",
            color(background),
            pad = pt(style.padding)
        );
    }
    expr
}

fn color(value: &str) -> String {
    format!("rgb({})", string_literal(value))
}

fn stroke(width: f32, value: &str) -> String {
    format!("{} + {}", pt(width), color(value))
}

/// A length in points, without trailing zeros.
fn pt(value: f32) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    format!("{trimmed}pt")
}

/// A Typst string literal. Text never reaches markup mode, so no markup escaping is needed.
fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
