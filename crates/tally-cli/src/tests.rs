//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::NaiveDate;
use clap::Parser;
use tally_core::db::Database;
use tally_core::models::BudgetStatus;
use tally_core::Config;

use crate::cli::{BudgetAction, Cli, Commands, ExpensesAction, ReportType};
use crate::commands::{self, truncate, Output};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn january() -> commands::Period {
    (date("2025-01-01"), date("2025-01-31"))
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_expenses_add() {
    let cli = Cli::try_parse_from([
        "tally",
        "--db",
        "/tmp/ledger.db",
        "expenses",
        "add",
        "12.5",
        "food",
        "--subcategory",
        "coffee",
    ])
    .unwrap();

    assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/ledger.db")));
    match cli.command {
        Commands::Expenses {
            action:
                ExpensesAction::Add {
                    amount,
                    category,
                    subcategory,
                    date,
                    ..
                },
        } => {
            assert_eq!(amount, 12.5);
            assert_eq!(category, "food");
            assert_eq!(subcategory, "coffee");
            assert!(date.is_none());
        }
        _ => panic!("expected expenses add"),
    }
}

#[test]
fn test_parse_serve_defaults_to_stdio() {
    let cli = Cli::try_parse_from(["tally", "serve"]).unwrap();
    match cli.command {
        Commands::Serve { http, host, port } => {
            assert!(!http);
            assert!(host.is_none());
            assert!(port.is_none());
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_parse_budget_and_report() {
    let cli = Cli::try_parse_from(["tally", "budget", "set", "food", "400", "--end", "2025-12-31"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Budget {
            action: BudgetAction::Set { ref end, .. }
        } if end.as_deref() == Some("2025-12-31")
    ));

    let cli = Cli::try_parse_from(["tally", "--json", "report", "trends", "--group-by", "week"])
        .unwrap();
    assert!(cli.json);
    assert!(matches!(
        cli.command,
        Commands::Report {
            report_type: ReportType::Trends { ref group_by, .. }
        } if group_by == "week"
    ));
}

// ========== Period Resolution Tests ==========

#[test]
fn test_named_periods() {
    let today = date("2025-03-15");

    assert_eq!(
        commands::named_period("this-month", today).unwrap(),
        (date("2025-03-01"), today)
    );
    assert_eq!(
        commands::named_period("last-month", today).unwrap(),
        (date("2025-02-01"), date("2025-02-28"))
    );
    assert_eq!(
        commands::named_period("this-year", today).unwrap(),
        (date("2025-01-01"), today)
    );
    assert_eq!(
        commands::named_period("last-12-months", today).unwrap(),
        (date("2024-04-01"), today)
    );
    assert_eq!(
        commands::named_period("last-30-days", today).unwrap().0,
        date("2025-02-13")
    );
}

#[test]
fn test_last_month_in_january() {
    assert_eq!(
        commands::named_period("last-month", date("2025-01-10")).unwrap(),
        (date("2024-12-01"), date("2024-12-31"))
    );
}

#[test]
fn test_unknown_period() {
    assert!(commands::named_period("fortnight", date("2025-01-10")).is_err());
}

#[test]
fn test_resolve_period_custom_dates() {
    let range =
        commands::resolve_period("this-month", Some("2025-01-01"), Some("2025-01-31")).unwrap();
    assert_eq!(range, january());

    assert!(commands::resolve_period("all", Some("01/01/2025"), None).is_err());
    assert!(commands::resolve_period("all", Some("2025-02-01"), Some("2025-01-01")).is_err());
}

// ========== Expense / Income Command Tests ==========

#[test]
fn test_cmd_expenses_add_and_list() {
    let db = setup_test_db();

    commands::cmd_expenses_add(&db, Some("2025-01-15"), 50.0, "food", "groceries", "").unwrap();
    commands::cmd_expenses_add(&db, Some("2025-01-16"), 20.0, "transport", "", "bus").unwrap();

    assert!(commands::cmd_expenses_list(&db, january(), Output::Table).is_ok());
    assert!(commands::cmd_expenses_list(&db, january(), Output::Json).is_ok());

    let expenses = db.list_expenses(date("2025-01-01"), date("2025-01-31")).unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[1].subcategory, "groceries");
}

#[test]
fn test_cmd_expenses_add_defaults_to_today() {
    let db = setup_test_db();
    commands::cmd_expenses_add(&db, None, 9.99, "food", "", "").unwrap();

    let today = commands::today();
    let expenses = db.list_expenses(today, today).unwrap();
    assert_eq!(expenses.len(), 1);
}

#[test]
fn test_cmd_expenses_add_invalid_date() {
    let db = setup_test_db();
    let err = commands::cmd_expenses_add(&db, Some("15/01/2025"), 5.0, "food", "", "")
        .unwrap_err();
    assert!(err.to_string().contains("Invalid date format"));
}

#[test]
fn test_cmd_expenses_delete() {
    let db = setup_test_db();
    commands::cmd_expenses_add(&db, Some("2025-01-15"), 50.0, "food", "", "").unwrap();
    let id = db.list_expenses(date("2025-01-01"), date("2025-01-31")).unwrap()[0].id;

    assert!(commands::cmd_expenses_delete(&db, id).is_ok());

    let err = commands::cmd_expenses_delete(&db, id).unwrap_err();
    assert_eq!(err.to_string(), format!("Expense {} not found", id));
}

#[test]
fn test_cmd_income_commands() {
    let db = setup_test_db();
    commands::cmd_income_add(&db, Some("2025-01-01"), 3000.0, "salary", "").unwrap();

    assert!(commands::cmd_income_list(&db, january(), Output::Table).is_ok());

    let income = db.list_income(date("2025-01-01"), date("2025-01-31")).unwrap();
    assert_eq!(income.len(), 1);
    assert!(commands::cmd_income_delete(&db, income[0].id).is_ok());
    assert!(commands::cmd_income_delete(&db, income[0].id).is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budget_set_and_check() {
    let db = setup_test_db();
    commands::cmd_expenses_add(&db, Some("2025-01-10"), 120.0, "food", "", "").unwrap();

    commands::cmd_budget_set(&db, "food", 100.0, Some("2025-01-01"), None).unwrap();
    assert!(commands::cmd_budget_check(&db, "food", january(), Output::Table).is_ok());
    assert!(commands::cmd_budget_check(&db, "fuel", january(), Output::Table).is_ok());

    let check = db
        .check_budget("food", date("2025-01-01"), date("2025-01-31"))
        .unwrap();
    assert_eq!(check.status(), BudgetStatus::OverBudget);
}

#[test]
fn test_cmd_budget_set_defaults_to_month_start() {
    let db = setup_test_db();
    commands::cmd_budget_set(&db, "food", 400.0, None, None).unwrap();

    let budgets = db.list_active_budgets(commands::today()).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(
        budgets[0].start_date,
        commands::named_period("this-month", commands::today()).unwrap().0
    );
    assert!(commands::cmd_budget_list(&db, Output::Table).is_ok());
}

#[test]
fn test_cmd_budget_set_invalid_end_date() {
    let db = setup_test_db();
    let result = commands::cmd_budget_set(&db, "food", 400.0, Some("2025-01-01"), Some("soon"));
    assert!(result.is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_reports() {
    let db = setup_test_db();
    commands::cmd_income_add(&db, Some("2025-01-01"), 1000.0, "salary", "").unwrap();
    commands::cmd_expenses_add(&db, Some("2025-01-05"), 40.0, "food", "", "").unwrap();
    commands::cmd_expenses_add(&db, Some("2025-01-20"), 60.0, "food", "", "").unwrap();

    assert!(commands::cmd_report_summary(&db, january(), Output::Table).is_ok());
    assert!(commands::cmd_report_summary(&db, january(), Output::Json).is_ok());
    assert!(commands::cmd_report_trends(&db, january(), "week", Output::Table).is_ok());
    assert!(commands::cmd_report_trends(&db, january(), "year", Output::Table).is_ok());
}

#[test]
fn test_cmd_reports_empty() {
    let db = setup_test_db();
    assert!(commands::cmd_report_summary(&db, january(), Output::Table).is_ok());
    assert!(commands::cmd_report_trends(&db, january(), "month", Output::Table).is_ok());
}

// ========== Init Tests ==========

#[test]
fn test_cmd_init_writes_categories_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_db_path(Some(dir.path().join("ledger.db")));

    commands::cmd_init(&config).unwrap();
    let categories_path = dir.path().join("categories.json");
    assert!(categories_path.exists());
    assert!(dir.path().join("ledger.db").exists());

    std::fs::write(&categories_path, r#"{"categories": {}}"#).unwrap();
    commands::cmd_init(&config).unwrap();
    let content = std::fs::read_to_string(&categories_path).unwrap();
    assert_eq!(content, r#"{"categories": {}}"#);
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("groceries", 20), "groceries");
    assert_eq!(truncate("a very long note about lunch", 10), "a very ...");
}
