//! Income command implementations

use anyhow::Result;
use tally_core::db::Database;
use tally_core::tools::{self, AddIncomeParams, DateRangeParams, DeleteIncomeParams};

use super::{expect_success, print_json, today, truncate, Output, Period};

pub fn cmd_income_list(db: &Database, (from, to): Period, output: Output) -> Result<()> {
    let entries = tools::list_income(
        db,
        DateRangeParams {
            start_date: from.to_string(),
            end_date: to.to_string(),
        },
    )?;

    if output == Output::Json {
        return print_json(&entries);
    }

    println!();
    println!("💰 Income");
    println!("   Period: {} to {}", from, to);
    println!("   ─────────────────────────────────────────────────────────────");

    if entries.is_empty() {
        println!("   No income found in this period.");
        return Ok(());
    }

    for i in &entries {
        println!(
            "   [{:>4}] {} │ \x1b[32m{:>10.2}\x1b[0m │ {:20} │ {}",
            i.id,
            i.date,
            i.amount,
            truncate(&i.source, 20),
            truncate(&i.note, 30)
        );
    }

    let total: f64 = entries.iter().map(|i| i.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: ${:.2} ({} entries)", total, entries.len());

    Ok(())
}

pub fn cmd_income_add(
    db: &Database,
    date: Option<&str>,
    amount: f64,
    source: &str,
    note: &str,
) -> Result<()> {
    let outcome = expect_success(tools::add_income(
        db,
        AddIncomeParams {
            date: date.map_or_else(|| today().to_string(), str::to_string),
            amount,
            source: source.to_string(),
            note: note.to_string(),
        },
    ))?;

    println!("✅ {}", outcome.message);
    Ok(())
}

pub fn cmd_income_delete(db: &Database, id: i64) -> Result<()> {
    if let Some(i) = db.get_income(id)? {
        println!(
            "   {} │ {:>10.2} │ {}",
            i.date,
            i.amount,
            truncate(&i.source, 20)
        );
    }

    let outcome = expect_success(tools::delete_income(
        db,
        DeleteIncomeParams { income_id: id },
    ))?;

    println!("🗑️  {}", outcome.message);
    Ok(())
}
