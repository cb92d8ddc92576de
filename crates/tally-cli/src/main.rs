//! Tally CLI - Personal expense tracker
//!
//! Usage:
//!   tally init                       Initialize database and categories
//!   tally serve                      MCP server on stdio
//!   tally serve --http --port 3001   MCP server over HTTP
//!   tally expenses add 12.50 food    Record an expense
//!   tally report summary             Income, expenses and balance

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout belongs to the MCP protocol in stdio mode
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load config")?
        .with_db_path(cli.db.clone())
        .with_categories_path(cli.categories.clone());
    let output = if cli.json {
        commands::Output::Json
    } else {
        commands::Output::Table
    };

    match cli.command {
        Commands::Init => commands::cmd_init(&config),
        Commands::Serve { http, host, port } => {
            commands::cmd_serve(&config, http, host.as_deref(), port).await
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&config.db_path)?;
            match action {
                ExpensesAction::List { period, from, to } => {
                    let range = commands::resolve_period(&period, from.as_deref(), to.as_deref())?;
                    commands::cmd_expenses_list(&db, range, output)
                }
                ExpensesAction::Add {
                    amount,
                    category,
                    subcategory,
                    note,
                    date,
                } => commands::cmd_expenses_add(
                    &db,
                    date.as_deref(),
                    amount,
                    &category,
                    &subcategory,
                    &note,
                ),
                ExpensesAction::Delete { id } => commands::cmd_expenses_delete(&db, id),
            }
        }
        Commands::Income { action } => {
            let db = commands::open_db(&config.db_path)?;
            match action {
                IncomeAction::List { period, from, to } => {
                    let range = commands::resolve_period(&period, from.as_deref(), to.as_deref())?;
                    commands::cmd_income_list(&db, range, output)
                }
                IncomeAction::Add {
                    amount,
                    source,
                    note,
                    date,
                } => commands::cmd_income_add(&db, date.as_deref(), amount, &source, &note),
                IncomeAction::Delete { id } => commands::cmd_income_delete(&db, id),
            }
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&config.db_path)?;
            match action {
                BudgetAction::Set {
                    category,
                    limit,
                    start,
                    end,
                } => commands::cmd_budget_set(
                    &db,
                    &category,
                    limit,
                    start.as_deref(),
                    end.as_deref(),
                ),
                BudgetAction::Check {
                    category,
                    period,
                    from,
                    to,
                } => {
                    let range = commands::resolve_period(&period, from.as_deref(), to.as_deref())?;
                    commands::cmd_budget_check(&db, &category, range, output)
                }
                BudgetAction::List => commands::cmd_budget_list(&db, output),
            }
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&config.db_path)?;
            match report_type {
                ReportType::Summary { period, from, to } => {
                    let range = commands::resolve_period(&period, from.as_deref(), to.as_deref())?;
                    commands::cmd_report_summary(&db, range, output)
                }
                ReportType::Trends {
                    group_by,
                    period,
                    from,
                    to,
                } => {
                    let range = commands::resolve_period(&period, from.as_deref(), to.as_deref())?;
                    commands::cmd_report_trends(&db, range, &group_by, output)
                }
            }
        }
    }
}
