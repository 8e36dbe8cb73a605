use thiserror::Error;

/// Failures at the edges of the converter. Parsing and projection never fail;
/// only file access, config decoding and the Typst export step do.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("could not encode config defaults: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
    #[error("Typst compilation failed: {0}")]
    Compile(String),
    #[error("PDF generation failed: {0}")]
    Export(String),
}
