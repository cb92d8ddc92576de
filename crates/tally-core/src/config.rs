//! Configuration loading
//!
//! Settings come from, in order of precedence: command-line flags (and their
//! `TALLY_*` environment variables, handled by the CLI), an optional
//! `config.toml` in the platform data directory, then built-in defaults.
//!
//! ```toml
//! db = "/home/me/finance/tally.db"
//! categories = "/home/me/finance/categories.json"
//! host = "127.0.0.1"
//! port = 3001
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_DB_FILE: &str = "tally.db";
pub const DEFAULT_CATEGORIES_FILE: &str = "categories.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;

/// Raw contents of config.toml; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    db: Option<PathBuf>,
    categories: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
}

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// Explicit categories path; None means "next to the database"
    categories_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            categories_path: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Location of config.toml in the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("tally").join("config.toml"))
    }

    /// Load config.toml from `path`, or from the default location
    ///
    /// A missing default file yields the defaults; a missing explicit path is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) if !p.exists() => {
                return Err(Error::NotFound(format!("Config file {}", p.display())));
            }
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse config.toml content on top of the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)?;
        let defaults = Self::default();
        Ok(Self {
            db_path: file.db.unwrap_or(defaults.db_path),
            categories_path: file.categories,
            host: file.host.unwrap_or(defaults.host),
            port: file.port.unwrap_or(defaults.port),
        })
    }

    /// Override the database path (e.g. from `--db`)
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.db_path = p;
        }
        self
    }

    /// Override the categories path (e.g. from `--categories`)
    pub fn with_categories_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.categories_path = path;
        }
        self
    }

    /// Categories file: explicit setting, else `categories.json` beside the database
    pub fn categories_path(&self) -> PathBuf {
        match &self.categories_path {
            Some(p) => p.clone(),
            None => self.db_path.with_file_name(DEFAULT_CATEGORIES_FILE),
        }
    }
}
