//! Budget command implementations

use anyhow::{Context, Result};
use chrono::Datelike;
use tally_core::db::Database;
use tally_core::models::{BudgetCheck, BudgetStatus};
use tally_core::tools::{self, CheckBudgetParams, SetBudgetParams};

use super::{expect_success, print_json, today, Output, Period};

pub fn cmd_budget_set(
    db: &Database,
    category: &str,
    limit: f64,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<()> {
    let start_date = match start {
        Some(s) => s.to_string(),
        None => today()
            .with_day(1)
            .context("Date out of range")?
            .to_string(),
    };

    let outcome = expect_success(tools::set_budget(
        db,
        SetBudgetParams {
            category: category.to_string(),
            monthly_limit: limit,
            start_date,
            end_date: end.map(str::to_string),
        },
    ))?;

    println!("✅ {}", outcome.message);
    Ok(())
}

fn status_label(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::NoBudget => "➖ No budget",
        BudgetStatus::UnderBudget => "\x1b[32m✅ Under budget\x1b[0m",
        BudgetStatus::Warning => "\x1b[33m⚠️  Warning\x1b[0m",
        BudgetStatus::OverBudget => "\x1b[31m🚨 Over budget\x1b[0m",
    }
}

pub fn cmd_budget_check(
    db: &Database,
    category: &str,
    (from, to): Period,
    output: Output,
) -> Result<()> {
    let check = tools::check_budget(
        db,
        CheckBudgetParams {
            category: category.to_string(),
            start_date: from.to_string(),
            end_date: to.to_string(),
        },
    )?;

    if output == Output::Json {
        return print_json(&check);
    }

    println!();
    println!("🎯 Budget: {}", category);
    println!("   Period: {} to {}", from, to);
    println!("   ─────────────────────────────────────────────────────────────");

    match check {
        BudgetCheck::NoBudget(no_budget) => {
            println!("   {}", no_budget.message);
            println!(
                "   Set one with: tally budget set {} <monthly-limit>",
                category
            );
        }
        BudgetCheck::Evaluated(eval) => {
            println!("   Limit:     ${:>10.2}", eval.budget_limit);
            println!("   Spent:     ${:>10.2}", eval.spent);
            println!("   Remaining: ${:>10.2}", eval.remaining);
            println!("   Used:      {:>10.2}%", eval.percentage_used);
            println!("   Status:    {}", status_label(eval.status));
        }
    }

    Ok(())
}

pub fn cmd_budget_list(db: &Database, output: Output) -> Result<()> {
    let budgets = tools::list_budgets(db)?;

    if output == Output::Json {
        return print_json(&budgets);
    }

    if budgets.is_empty() {
        println!("No budgets in effect. Create one with:");
        println!("  tally budget set food 400");
        return Ok(());
    }

    println!();
    println!("🎯 Budgets");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:20} │ {:>10} │ {:10} │ {:10}",
        "Category", "Limit", "Start", "End"
    );
    println!("   ─────────────────────┼────────────┼────────────┼───────────");

    for b in &budgets {
        let end = b
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "ongoing".to_string());
        println!(
            "   {:20} │ {:>10.2} │ {:10} │ {:10}",
            b.category,
            b.monthly_limit,
            b.start_date.to_string(),
            end
        );
    }

    Ok(())
}
