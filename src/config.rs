use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Error;
use crate::style::{FixedStyles, ReflowStyles};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub font: FontConfig,
    pub reflow: ReflowStyles,
    pub fixed: FixedStyles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub paper: String,
    /// Margin on every side, in points.
    pub margin: f32,
    pub numbers: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            paper: "a4".to_string(),
            margin: 40.0,
            numbers: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub body: String,
    pub monospace: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        // Families bundled with typst-kit's embedded fonts.
        Self {
            body: "Libertinus Serif".to_string(),
            monospace: "DejaVu Sans Mono".to_string(),
        }
    }
}

static COMPILED_DEFAULT: Lazy<Config> = Lazy::new(Config::default);

impl Config {
    /// The built-in style tables, shared by every conversion that has no config of its own.
    pub fn compiled_default() -> &'static Config {
        &COMPILED_DEFAULT
    }

    /// Load config from a TOML file, or return defaults if the file does not exist.
    ///
    /// Keys present in the file override the defaults one by one, so a file
    /// containing only `[fixed.h1] font_size = 30.0` keeps the rest of the h1 entry.
    pub fn load(path: &Path) -> Result<Self, Error> {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!("loading config from {}", path.display());
                Self::from_toml(&content)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Parse a TOML document layered over the defaults.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        let overrides: toml::Table = toml::from_str(content)?;
        let mut merged = toml::Value::try_from(Self::default())?;
        if let toml::Value::Table(base) = &mut merged {
            merge_tables(base, overrides);
        }
        Ok(merged.try_into()?)
    }
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(patch) => match base.get_mut(&key) {
                Some(toml::Value::Table(inner)) => merge_tables(inner, patch),
                _ => {
                    base.insert(key, toml::Value::Table(patch));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}
