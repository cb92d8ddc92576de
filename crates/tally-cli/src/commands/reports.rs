//! Report command implementations

use anyhow::Result;
use tally_core::db::Database;
use tally_core::models::TrendGrouping;
use tally_core::tools::{self, DateRangeParams, SpendingTrendsParams};
use tracing::warn;

use super::{print_json, truncate, Output, Period};

pub fn cmd_report_summary(db: &Database, (from, to): Period, output: Output) -> Result<()> {
    let summary = tools::financial_summary(
        db,
        DateRangeParams {
            start_date: from.to_string(),
            end_date: to.to_string(),
        },
    )?;

    if output == Output::Json {
        return print_json(&summary);
    }

    println!();
    println!("📊 Financial Summary");
    println!(
        "   Period: {} to {}",
        summary.period.start_date, summary.period.end_date
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:   ${:>10.2}", summary.total_income);
    println!("   Expenses: ${:>10.2}", summary.total_expenses);
    let balance = if summary.balance < 0.0 {
        format!("\x1b[31m${:>10.2}\x1b[0m", summary.balance)
    } else {
        format!("\x1b[32m${:>10.2}\x1b[0m", summary.balance)
    };
    println!("   Balance:  {}", balance);

    if !summary.income_by_source.is_empty() {
        println!();
        println!("   {:25} │ {:>10} │ {:>5}", "Income source", "Amount", "Count");
        println!("   ──────────────────────────┼────────────┼───────");
        for s in &summary.income_by_source {
            println!(
                "   {:25} │ {:>10.2} │ {:>5}",
                truncate(&s.source, 25),
                s.total,
                s.count
            );
        }
    }

    if !summary.expenses_by_category.is_empty() {
        println!();
        println!("   {:25} │ {:>10} │ {:>6} │ {:>5}", "Category", "Amount", "%", "Count");
        println!("   ──────────────────────────┼────────────┼────────┼───────");
        for c in &summary.expenses_by_category {
            let share = if summary.total_expenses > 0.0 {
                c.total / summary.total_expenses * 100.0
            } else {
                0.0
            };
            println!(
                "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
                truncate(&c.category, 25),
                c.total,
                share,
                c.count
            );
        }
    }

    Ok(())
}

pub fn cmd_report_trends(
    db: &Database,
    (from, to): Period,
    group_by: &str,
    output: Output,
) -> Result<()> {
    if group_by.parse::<TrendGrouping>().is_err() {
        warn!("Unknown grouping '{}', using month", group_by);
    }

    let report = tools::get_spending_trends(
        db,
        SpendingTrendsParams {
            start_date: from.to_string(),
            end_date: to.to_string(),
            group_by: Some(group_by.to_string()),
        },
    )?;

    if output == Output::Json {
        return print_json(&report);
    }

    println!();
    println!(
        "📈 Spending Trends ({})",
        TrendGrouping::from_group_by(&report.group_by).as_str()
    );
    println!(
        "   Period: {} to {}",
        report.date_range.start, report.date_range.end
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if report.trends.is_empty() {
        println!("   No spending data found.");
        return Ok(());
    }

    println!(
        "   {:12} │ {:>10} │ {:>5} │ {:>10}",
        "Period", "Amount", "Count", "Average"
    );
    println!("   ─────────────┼────────────┼───────┼───────────");

    for point in &report.trends {
        println!(
            "   {:12} │ {:>10.2} │ {:>5} │ {:>10.2}",
            point.period, point.total_spent, point.transaction_count, point.avg_transaction
        );
    }

    let total_amount: f64 = report.trends.iter().map(|p| p.total_spent).sum();
    let total_count: i64 = report.trends.iter().map(|p| p.transaction_count).sum();
    let avg_amount = total_amount / report.trends.len() as f64;

    println!("   ─────────────┼────────────┼───────┼───────────");
    println!(
        "   {:12} │ {:>10.2} │ {:>5} │",
        "Total", total_amount, total_count
    );
    println!("   {:12} │ {:>10.2} │       │", "Per period", avg_amount);

    Ok(())
}
