//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - init, shared utilities (open_db, resolve_period, tool outcomes)
//! - `budgets` - Budget commands (set, check, list)
//! - `expenses` - Expense commands (list, add, delete)
//! - `income` - Income commands (list, add, delete)
//! - `reports` - Report generation commands
//! - `serve` - MCP server command

pub mod budgets;
pub mod core;
pub mod expenses;
pub mod income;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use expenses::*;
pub use income::*;
pub use reports::*;
pub use serve::*;

/// How query commands render their results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
