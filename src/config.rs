//! CLI configuration from `jsql.toml`.
//!
//! ```toml
//! dialect = "mysql"
//! format = "json"
//! ```
//!
//! `./jsql.toml` wins over `~/.config/jsql/config.toml`; with neither
//! present every field is unset.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{JsqlError, JsqlResult};

/// Local config file name.
pub const LOCAL_FILE: &str = "jsql.toml";

/// How the CLI prints a compiled query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default dialect name.
    pub dialect: Option<String>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load the first config file found, or defaults.
    pub fn load() -> JsqlResult<Self> {
        match Self::locate() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> JsqlResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
            .map_err(|e| JsqlError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(contents: &str) -> JsqlResult<Self> {
        toml::from_str(contents).map_err(|e| JsqlError::Config(e.to_string()))
    }

    /// `~/.config/jsql/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jsql").join("config.toml"))
    }

    fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_FILE);
        if local.exists() {
            return Some(local);
        }
        Self::default_path().filter(|p| p.exists())
    }
}
