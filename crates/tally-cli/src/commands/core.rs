//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_period` - Turn a period name or custom dates into a range
//! - `expect_success` - Turn a tool outcome into a CLI result
//! - `cmd_init` - Initialize the database and categories file

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate, Utc};
use tally_core::tools::{parse_date, ToolOutcome};
use tally_core::{CategoriesFile, Config, Database};

/// Inclusive date range selected on the command line
pub type Period = (NaiveDate, NaiveDate);

/// Open the ledger database, creating the schema if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).with_context(|| format!("Failed to open database {}", path_str))
}

/// Today's date (UTC), used for defaults
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolve a period name to (from_date, to_date); `--from` / `--to` override either end
pub fn resolve_period(
    period: &str,
    custom_from: Option<&str>,
    custom_to: Option<&str>,
) -> Result<Period> {
    let (mut from, mut to) = named_period(period, today())?;

    if let Some(s) = custom_from {
        from = parse_date(s).context("Invalid --from date")?;
    }
    if let Some(s) = custom_to {
        to = parse_date(s).context("Invalid --to date")?;
    }
    if from > to {
        anyhow::bail!("Start date {} is after end date {}", from, to);
    }

    Ok((from, to))
}

/// Resolve a period name relative to `today`
pub fn named_period(period: &str, today: NaiveDate) -> Result<Period> {
    let month_start = today.with_day(1).context("Date out of range")?;

    let range = match period.to_lowercase().as_str() {
        "this-month" => Some((month_start, today)),
        "last-month" => month_start
            .pred_opt()
            .and_then(|last_day| last_day.with_day(1).map(|first| (first, last_day))),
        "this-year" => today.with_ordinal(1).map(|first| (first, today)),
        "last-30-days" => Some((today - chrono::Duration::days(30), today)),
        "last-90-days" => Some((today - chrono::Duration::days(90), today)),
        "last-12-months" => month_start
            .checked_sub_months(Months::new(11))
            .map(|first| (first, today)),
        "all" => NaiveDate::from_ymd_opt(1900, 1, 1).map(|first| (first, today)),
        _ => anyhow::bail!(
            "Unknown period: {}. Available: this-month, last-month, this-year, last-30-days, last-90-days, last-12-months, all",
            period
        ),
    };

    range.context("Date out of range")
}

/// Fail the command unless the tool reported success
///
/// Not-found and invalid-input errors surface with the same message an MCP
/// client would see.
pub fn expect_success(result: tally_core::Result<ToolOutcome>) -> Result<ToolOutcome> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => match ToolOutcome::from_recoverable(&err) {
            Some(outcome) => outcome,
            None => return Err(err.into()),
        },
    };

    if !outcome.is_success() {
        anyhow::bail!("{}", outcome.message);
    }
    Ok(outcome)
}

pub fn cmd_init(config: &Config) -> Result<()> {
    println!("🔧 Initializing ledger at {}...", config.db_path.display());

    open_db(&config.db_path)?;
    println!("   Database schema ready");

    let categories = CategoriesFile::new(config.categories_path());
    let created = categories
        .ensure_default()
        .context("Failed to write categories file")?;
    if created {
        println!(
            "   Wrote default categories to {}",
            categories.path().display()
        );
    } else {
        println!(
            "   Keeping existing categories at {}",
            categories.path().display()
        );
    }

    println!("✅ Ledger initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: tally expenses add 12.50 food --subcategory coffee");
    println!("  2. Connect an MCP client: tally serve");

    Ok(())
}
