mod block;
mod config;
mod error;
mod fixed;
mod inline;
mod parser;
mod project;
mod reflow;
mod style;
mod typst;

pub use block::{BlockNode, InlineNode, ListKind, NodeKind};
pub use config::{Config, FontConfig, PageConfig};
pub use error::Error;
pub use fixed::{FixedBackend, FixedBlock, FixedInline, FixedItem, FixedTree};
pub use parser::{BlankPolicy, ScanOptions};
pub use project::{Backend, ProjectedItem, Target, project};
pub use reflow::{ReflowBackend, ReflowBlock, ReflowInline, ReflowItem, ReflowTree};
pub use style::{BlockMetrics, Border, BorderSide, FixedStyles, ReflowStyles, SpanMetrics};

use log::{debug, warn};
use std::time::Instant;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_library::layout::PagedDocument;
use typst_pdf::PdfOptions;

/// Output of [`render`]: one tree per target, identical in structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Reflow(ReflowTree),
    Fixed(FixedTree),
}

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<BlockNode> {
    parser::parse(markdown)
}

/// Parse with explicit handling of blank runs at the document boundaries.
pub fn parse_with_options(markdown: &str, options: &ScanOptions) -> Vec<BlockNode> {
    parser::parse_with_options(markdown, options)
}

/// Split a single line into inline nodes.
pub fn format_inline(text: &str) -> Vec<InlineNode> {
    inline::format(text)
}

/// Convert markdown for the on-screen target (`as_reflow`) or the paginated one,
/// using the built-in style tables.
pub fn render(markdown: &str, as_reflow: bool) -> Rendered {
    render_with_config(markdown, Target::from_reflow_flag(as_reflow), Config::compiled_default())
}

pub fn render_with_config(markdown: &str, target: Target, config: &Config) -> Rendered {
    let blocks = parse(markdown);
    debug!("parsed {} blocks for {:?} target", blocks.len(), target);
    match target {
        Target::Reflow => Rendered::Reflow(reflow_tree(&blocks, config)),
        Target::Fixed => Rendered::Fixed(fixed_tree(&blocks, config, 1.0)),
    }
}

/// Project parsed blocks onto the reflow target.
pub fn reflow_tree(blocks: &[BlockNode], config: &Config) -> ReflowTree {
    ReflowTree {
        class: config.reflow.container.clone(),
        blocks: project(blocks, &ReflowBackend::new(&config.reflow)),
    }
}

/// Project parsed blocks onto the fixed-layout target, scaling every length.
pub fn fixed_tree(blocks: &[BlockNode], config: &Config, scale: f32) -> FixedTree {
    FixedTree {
        blocks: project(blocks, &FixedBackend::new(&config.fixed).with_scale(scale)),
    }
}

/// Convert markdown to an HTML preview fragment using default config.
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with_config(markdown, Config::compiled_default())
}

/// Convert markdown to an HTML preview fragment with custom config.
pub fn markdown_to_html_with_config(markdown: &str, config: &Config) -> String {
    let blocks = parse(markdown);
    reflow::to_html(&reflow_tree(&blocks, config))
}

/// Convert markdown to Typst markup using default config.
pub fn markdown_to_typst(markdown: &str) -> String {
    markdown_to_typst_with_config(markdown, Config::compiled_default())
}

/// Convert markdown to Typst markup with custom config.
pub fn markdown_to_typst_with_config(markdown: &str, config: &Config) -> String {
    markdown_to_typst_scaled(markdown, config, 1.0)
}

/// Convert markdown to Typst markup, multiplying every size by `scale`.
pub fn markdown_to_typst_scaled(markdown: &str, config: &Config, scale: f32) -> String {
    let blocks = parse(markdown);
    typst::tree_to_typst(&fixed_tree(&blocks, config, scale), config)
}

/// Convert markdown to PDF bytes using default config.
pub fn markdown_to_pdf(markdown: &str) -> Result<Vec<u8>, Error> {
    markdown_to_pdf_with_config(markdown, Config::compiled_default(), 1.0)
}

/// Compile Typst markup to a paged document.
fn compile_document(typst_content: String) -> Result<PagedDocument, Error> {
    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let started = Instant::now();
    let result = engine.compile();
    let doc: PagedDocument = result
        .output
        .map_err(|e| Error::Compile(format!("{:?}", e)))?;
    for warning in &result.warnings {
        warn!("typst: {}", warning.message);
    }
    debug!(
        "compiled {} pages in {:?}",
        doc.pages.len(),
        started.elapsed()
    );
    Ok(doc)
}

/// Convert markdown to PDF bytes with custom config.
pub fn markdown_to_pdf_with_config(
    markdown: &str,
    config: &Config,
    scale: f32,
) -> Result<Vec<u8>, Error> {
    let doc = compile_document(markdown_to_typst_scaled(markdown, config, scale))?;

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| Error::Export(format!("{:?}", e)))
}

/// Result of rendering markdown to SVG pages.
pub struct SvgDocument {
    pub pages: Vec<String>,
    pub width_pt: f64,
    pub height_pt: f64,
}

/// Convert markdown to SVG pages using default config.
pub fn markdown_to_svg(markdown: &str) -> Result<SvgDocument, Error> {
    markdown_to_svg_with_config(markdown, Config::compiled_default(), 1.0)
}

/// Convert markdown to SVG pages with custom config.
pub fn markdown_to_svg_with_config(
    markdown: &str,
    config: &Config,
    scale: f32,
) -> Result<SvgDocument, Error> {
    let doc = compile_document(markdown_to_typst_scaled(markdown, config, scale))?;

    let pages: Vec<String> = doc.pages.iter().map(|page| typst_svg::svg(page)).collect();

    // Get dimensions from first page (assuming all pages same size)
    let (width_pt, height_pt) = if let Some(first_page) = doc.pages.first() {
        let size = first_page.frame.size();
        (size.x.to_pt(), size.y.to_pt())
    } else {
        (595.0, 842.0) // A4 default
    };

    Ok(SvgDocument {
        pages,
        width_pt,
        height_pt,
    })
}
