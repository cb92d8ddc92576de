//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses, income and budgets
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal expense tracker with an MCP server for LLM clients", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (overrides config.toml)
    #[arg(long, env = "TALLY_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Categories JSON file (defaults to categories.json beside the database)
    #[arg(long, env = "TALLY_CATEGORIES", global = true)]
    pub categories: Option<PathBuf>,

    /// Config file (defaults to config.toml in the platform data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and write the default categories file
    Init,

    /// Start the MCP server (stdio by default)
    Serve {
        /// Serve Streamable HTTP at /mcp instead of stdio
        #[arg(long)]
        http: bool,

        /// Host to bind to in HTTP mode (overrides config.toml)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on in HTTP mode (overrides config.toml)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: ExpensesAction,
    },

    /// Manage income entries
    Income {
        #[command(subcommand)]
        action: IncomeAction,
    },

    /// Manage category budgets
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses in a period, newest first
    List {
        /// Time period: this-month, last-month, this-year, last-30-days, last-90-days, all
        #[arg(long, default_value = "this-month")]
        period: String,

        /// Custom start date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        to: Option<String>,
    },

    /// Record an expense
    Add {
        /// Amount spent
        amount: f64,

        /// Category (see the categories file)
        category: String,

        /// Subcategory
        #[arg(long, default_value = "")]
        subcategory: String,

        /// Free-text note
        #[arg(long, default_value = "")]
        note: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense by ID
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// List income in a period, newest first
    List {
        /// Time period: this-month, last-month, this-year, last-30-days, last-90-days, all
        #[arg(long, default_value = "this-month")]
        period: String,

        /// Custom start date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        to: Option<String>,
    },

    /// Record an income entry
    Add {
        /// Amount earned
        amount: f64,

        /// Source, e.g. salary, freelance
        source: String,

        /// Free-text note
        #[arg(long, default_value = "")]
        note: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an income entry by ID
    Delete {
        /// Income ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set or replace a monthly budget for a category
    Set {
        /// Category to budget
        category: String,

        /// Monthly limit
        limit: f64,

        /// Start date (YYYY-MM-DD), defaults to the first of this month
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), omit for an open-ended budget
        #[arg(long)]
        end: Option<String>,
    },

    /// Check spending against a category budget
    Check {
        /// Category to check
        category: String,

        /// Time period
        #[arg(long, default_value = "this-month")]
        period: String,

        /// Custom start date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        to: Option<String>,
    },

    /// List budgets still in effect
    List,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Income, expenses and balance with breakdowns
    Summary {
        /// Time period
        #[arg(long, default_value = "this-month")]
        period: String,

        /// Custom start date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        to: Option<String>,
    },

    /// Spending trends over time
    Trends {
        /// Grouping: day, week or month
        #[arg(long, default_value = "month")]
        group_by: String,

        /// Time period
        #[arg(long, default_value = "last-12-months")]
        period: String,

        /// Custom start date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        from: Option<String>,

        /// Custom end date (YYYY-MM-DD) - overrides period
        #[arg(long)]
        to: Option<String>,
    },
}
