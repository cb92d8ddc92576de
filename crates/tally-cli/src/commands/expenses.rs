//! Expense command implementations

use anyhow::Result;
use tally_core::db::Database;
use tally_core::tools::{self, AddExpenseParams, DateRangeParams, DeleteExpenseParams};

use super::{expect_success, print_json, today, truncate, Output, Period};

pub fn cmd_expenses_list(db: &Database, (from, to): Period, output: Output) -> Result<()> {
    let expenses = tools::list_expenses(
        db,
        DateRangeParams {
            start_date: from.to_string(),
            end_date: to.to_string(),
        },
    )?;

    if output == Output::Json {
        return print_json(&expenses);
    }

    println!();
    println!("🧾 Expenses");
    println!("   Period: {} to {}", from, to);
    println!("   ─────────────────────────────────────────────────────────────");

    if expenses.is_empty() {
        println!("   No expenses found. Record one with:");
        println!("     tally expenses add 12.50 food");
        return Ok(());
    }

    for e in &expenses {
        let category = if e.subcategory.is_empty() {
            e.category.clone()
        } else {
            format!("{}/{}", e.category, e.subcategory)
        };
        println!(
            "   [{:>4}] {} │ {:>10.2} │ {:20} │ {}",
            e.id,
            e.date,
            e.amount,
            truncate(&category, 20),
            truncate(&e.note, 30)
        );
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: ${:.2} ({} entries)", total, expenses.len());

    Ok(())
}

pub fn cmd_expenses_add(
    db: &Database,
    date: Option<&str>,
    amount: f64,
    category: &str,
    subcategory: &str,
    note: &str,
) -> Result<()> {
    let outcome = expect_success(tools::add_expense(
        db,
        AddExpenseParams {
            date: date.map_or_else(|| today().to_string(), str::to_string),
            amount,
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            note: note.to_string(),
        },
    ))?;

    println!("✅ {}", outcome.message);
    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, id: i64) -> Result<()> {
    if let Some(e) = db.get_expense(id)? {
        println!(
            "   {} │ {:>10.2} │ {}",
            e.date,
            e.amount,
            truncate(&e.category, 20)
        );
    }

    let outcome = expect_success(tools::delete_expense(
        db,
        DeleteExpenseParams { expense_id: id },
    ))?;

    println!("🗑️  {}", outcome.message);
    Ok(())
}
