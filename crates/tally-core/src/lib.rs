//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - SQLite store for expenses, income and budgets
//! - Budget status evaluation and spending trend aggregation
//! - Income/expense summary rollups
//! - Tool operations shared by the MCP server and the CLI
//! - Categories document and configuration loading

pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod tools;

pub use categories::CategoriesFile;
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
