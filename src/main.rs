use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::info;
use mdexport::{Config, Error};

#[derive(Parser)]
#[command(name = "mdexport")]
#[command(about = "Convert Markdown files to PDF, SVG pages or an HTML preview")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output file (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pdf)]
    format: Format,

    /// TOML file overriding the built-in styles
    #[arg(short, long, default_value = "mdexport.toml")]
    config: PathBuf,

    /// Multiplier applied to every size in paginated output
    #[arg(long, default_value_t = 1.0, value_parser = parse_scale)]
    scale: f32,
}

fn parse_scale(s: &str) -> Result<f32, String> {
    let scale: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(format!("scale must be a positive number, got {s}"))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Svg,
    Html,
    Typst,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Svg => "svg",
            Format::Html => "html",
            Format::Typst => "typ",
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(written) => {
            for path in written {
                println!("Created {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<Vec<PathBuf>, Error> {
    let markdown = fs::read_to_string(&cli.input)?;
    let config = Config::load(&cli.config)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension(cli.format.extension()));
    info!("converting {} to {}", cli.input.display(), output.display());

    match cli.format {
        Format::Pdf => {
            let bytes = mdexport::markdown_to_pdf_with_config(&markdown, &config, cli.scale)?;
            fs::write(&output, bytes)?;
            Ok(vec![output])
        }
        Format::Html => {
            fs::write(&output, mdexport::markdown_to_html_with_config(&markdown, &config))?;
            Ok(vec![output])
        }
        Format::Typst => {
            let typst = mdexport::markdown_to_typst_scaled(&markdown, &config, cli.scale);
            fs::write(&output, typst)?;
            Ok(vec![output])
        }
        Format::Svg => {
            let doc = mdexport::markdown_to_svg_with_config(&markdown, &config, cli.scale)?;
            let mut written = Vec::with_capacity(doc.pages.len());
            for (i, page) in doc.pages.iter().enumerate() {
                let path = page_path(&output, i, doc.pages.len());
                fs::write(&path, page)?;
                written.push(path);
            }
            Ok(written)
        }
    }
}

/// `out.svg` for a single page, `out-1.svg`, `out-2.svg`, ... otherwise.
fn page_path(output: &Path, index: usize, pages: usize) -> PathBuf {
    if pages <= 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{}-{}.svg", stem, index + 1))
}
