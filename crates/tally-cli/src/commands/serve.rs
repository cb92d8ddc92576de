//! MCP server command implementation

use anyhow::{Context, Result};
use tally_core::{CategoriesFile, Config};
use tracing::{info, warn};

use super::open_db;

pub async fn cmd_serve(
    config: &Config,
    http: bool,
    host: Option<&str>,
    port: Option<u16>,
) -> Result<()> {
    let db = open_db(&config.db_path)?;

    let categories = CategoriesFile::new(config.categories_path());
    if !categories.path().exists() {
        warn!(
            "Categories file {} not found; run 'tally init' to create it",
            categories.path().display()
        );
    }

    if !http {
        // stdout carries the protocol; announce on stderr via tracing only
        info!("Database: {}", db.path());
        return tally_server::serve_stdio(db, categories)
            .await
            .context("MCP stdio server failed");
    }

    let host = host.unwrap_or(config.host.as_str());
    let port = port.unwrap_or(config.port);

    println!("🚀 Starting Tally MCP server...");
    println!("   Database: {}", config.db_path.display());
    println!("   Categories: {}", categories.path().display());
    println!("   Listening: http://{}:{}/mcp", host, port);
    println!();
    println!("   Press Ctrl+C to stop");

    tally_server::start_mcp_server(db, categories, host, port).await?;

    Ok(())
}
