//! Categories document served to MCP clients
//!
//! The file is read from disk on every access so it can be edited while the
//! server is running.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// MCP resource URI of the categories document
pub const CATEGORIES_URI: &str = "expense://categories";

/// MIME type of the categories document
pub const CATEGORIES_MIME_TYPE: &str = "application/json";

/// Document written by `tally init` when no categories file exists yet
pub const DEFAULT_CATEGORIES: &str = r#"{
  "categories": {
    "food": ["groceries", "dining_out", "coffee", "delivery"],
    "transport": ["fuel", "public_transport", "taxi", "parking", "maintenance"],
    "housing": ["rent", "utilities", "internet", "repairs"],
    "health": ["pharmacy", "doctor", "insurance", "fitness"],
    "entertainment": ["streaming", "movies", "games", "events"],
    "shopping": ["clothing", "electronics", "household"],
    "education": ["courses", "books", "supplies"],
    "travel": ["flights", "lodging", "activities"],
    "gifts": [],
    "misc": []
  },
  "income_sources": ["salary", "freelance", "investment", "gift", "refund", "other"]
}
"#;

/// Handle on the categories JSON file
#[derive(Debug, Clone)]
pub struct CategoriesFile {
    path: PathBuf,
}

impl CategoriesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current document, rejecting content that is not valid JSON
    pub fn read(&self) -> Result<String> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("Categories file {}", self.path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        serde_json::from_str::<serde_json::Value>(&content)?;
        Ok(content)
    }

    /// Write the default document if the file does not exist yet
    ///
    /// Returns true when a file was created.
    pub fn ensure_default(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, DEFAULT_CATEGORIES)?;
        info!("Wrote default categories to {}", self.path.display());
        Ok(true)
    }
}
