//! Tool operations exposed over MCP
//!
//! Each tool takes a typed parameter struct (deserialized from the client's
//! JSON arguments) and the `Database` handle it should run against. Dates
//! arrive as `YYYY-MM-DD` strings and are validated here before touching the
//! store.
//!
//! Error handling at this boundary:
//! - `Error::NotFound` / `Error::InvalidData` are expected outcomes that the
//!   server reports as structured error results (see [`ToolOutcome::error`]).
//! - `set_budget` reports any store error as a structured error result.
//! - Every other error is a fault and propagates to the caller.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Database, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::models::{
    Budget, BudgetCheck, CategoryTotal, Expense, ExpenseUpdate, FinancialSummary, Income,
    IncomeUpdate, NewExpense, NewIncome, TrendsReport,
};

// =============================================================================
// Shared helpers
// =============================================================================

/// Parse a required YYYY-MM-DD date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidData(format!("Invalid date format: {}. Use YYYY-MM-DD", s)))
}

/// Parse optional date strings
pub fn parse_date_opt(s: Option<&str>) -> Result<Option<NaiveDate>> {
    s.map(parse_date).transpose()
}

/// Outcome status of a mutating tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Result body of mutating tools, and of recoverable failures of any tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<i64>>,
    pub message: String,
}

impl ToolOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            id: None,
            count: None,
            ids: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Error,
            id: None,
            count: None,
            ids: None,
            message: message.into(),
        }
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn with_ids(mut self, ids: Vec<i64>) -> Self {
        self.count = Some(ids.len());
        self.ids = Some(ids);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    /// Structured error for recoverable failures (not-found, invalid input)
    ///
    /// Returns None for faults that should propagate.
    pub fn from_recoverable(err: &Error) -> Option<Self> {
        match err {
            Error::NotFound(msg) | Error::InvalidData(msg) => Some(Self::error(msg.clone())),
            _ => None,
        }
    }
}

// =============================================================================
// add_expense / add_multiple_expenses
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ExpenseInput {
    #[schemars(description = "Date in YYYY-MM-DD format")]
    pub date: String,

    #[schemars(description = "Amount spent")]
    pub amount: f64,

    #[schemars(description = "Expense category, e.g. food, transport")]
    pub category: String,

    #[schemars(description = "Optional subcategory")]
    #[serde(default)]
    pub subcategory: String,

    #[schemars(description = "Optional note or description")]
    #[serde(default)]
    pub note: String,
}

impl TryFrom<ExpenseInput> for NewExpense {
    type Error = Error;

    fn try_from(input: ExpenseInput) -> Result<Self> {
        Ok(NewExpense {
            date: parse_date(&input.date)?,
            amount: input.amount,
            category: input.category,
            subcategory: input.subcategory,
            note: input.note,
        })
    }
}

pub type AddExpenseParams = ExpenseInput;

pub fn add_expense(db: &Database, params: AddExpenseParams) -> Result<ToolOutcome> {
    let expense = NewExpense::try_from(params)?;
    let id = db.insert_expense(&expense)?;
    Ok(ToolOutcome::success(format!("Expense added with ID {}", id)).with_id(id))
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct AddMultipleExpensesParams {
    #[schemars(description = "Expenses to add, each with date, amount, category and optional subcategory/note")]
    pub expenses: Vec<ExpenseInput>,
}

pub fn add_multiple_expenses(
    db: &Database,
    params: AddMultipleExpensesParams,
) -> Result<ToolOutcome> {
    let expenses = params
        .expenses
        .into_iter()
        .map(NewExpense::try_from)
        .collect::<Result<Vec<_>>>()?;
    let ids = db.insert_expenses(&expenses)?;
    Ok(ToolOutcome::success(format!("Successfully added {} expenses", ids.len())).with_ids(ids))
}

// =============================================================================
// add_income / add_multiple_income
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct IncomeInput {
    #[schemars(description = "Date in YYYY-MM-DD format")]
    pub date: String,

    #[schemars(description = "Amount earned")]
    pub amount: f64,

    #[schemars(description = "Source of income, e.g. salary, freelance, investment")]
    pub source: String,

    #[schemars(description = "Optional note or description")]
    #[serde(default)]
    pub note: String,
}

impl TryFrom<IncomeInput> for NewIncome {
    type Error = Error;

    fn try_from(input: IncomeInput) -> Result<Self> {
        Ok(NewIncome {
            date: parse_date(&input.date)?,
            amount: input.amount,
            source: input.source,
            note: input.note,
        })
    }
}

pub type AddIncomeParams = IncomeInput;

pub fn add_income(db: &Database, params: AddIncomeParams) -> Result<ToolOutcome> {
    let income = NewIncome::try_from(params)?;
    let id = db.insert_income(&income)?;
    Ok(ToolOutcome::success(format!("Income added with ID {}", id)).with_id(id))
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct AddMultipleIncomeParams {
    #[schemars(description = "Income entries to add, each with date, amount, source and optional note")]
    pub income_entries: Vec<IncomeInput>,
}

pub fn add_multiple_income(db: &Database, params: AddMultipleIncomeParams) -> Result<ToolOutcome> {
    let entries = params
        .income_entries
        .into_iter()
        .map(NewIncome::try_from)
        .collect::<Result<Vec<_>>>()?;
    let ids = db.insert_income_batch(&entries)?;
    Ok(
        ToolOutcome::success(format!("Successfully added {} income entries", ids.len()))
            .with_ids(ids),
    )
}

// =============================================================================
// list_expenses / list_income / financial_summary
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct DateRangeParams {
    #[schemars(description = "Start date in YYYY-MM-DD format (inclusive)")]
    pub start_date: String,

    #[schemars(description = "End date in YYYY-MM-DD format (inclusive)")]
    pub end_date: String,
}

impl DateRangeParams {
    fn resolve(&self) -> Result<(NaiveDate, NaiveDate)> {
        Ok((parse_date(&self.start_date)?, parse_date(&self.end_date)?))
    }
}

pub fn list_expenses(db: &Database, params: DateRangeParams) -> Result<Vec<Expense>> {
    let (from, to) = params.resolve()?;
    db.list_expenses(from, to)
}

pub fn list_income(db: &Database, params: DateRangeParams) -> Result<Vec<Income>> {
    let (from, to) = params.resolve()?;
    db.list_income(from, to)
}

pub fn financial_summary(db: &Database, params: DateRangeParams) -> Result<FinancialSummary> {
    let (from, to) = params.resolve()?;
    db.financial_summary(from, to)
}

// =============================================================================
// summarize
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SummarizeParams {
    #[schemars(description = "Start date in YYYY-MM-DD format (inclusive)")]
    pub start_date: String,

    #[schemars(description = "End date in YYYY-MM-DD format (inclusive)")]
    pub end_date: String,

    #[schemars(description = "Optional category filter")]
    pub category: Option<String>,
}

pub fn summarize(db: &Database, params: SummarizeParams) -> Result<Vec<CategoryTotal>> {
    let from = parse_date(&params.start_date)?;
    let to = parse_date(&params.end_date)?;
    db.summarize_expenses(from, to, params.category.as_deref())
}

// =============================================================================
// set_budget / check_budget / list_budgets
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SetBudgetParams {
    #[schemars(description = "Expense category to budget")]
    pub category: String,

    #[schemars(description = "Maximum amount to spend per month")]
    pub monthly_limit: f64,

    #[schemars(description = "Budget start date in YYYY-MM-DD format")]
    pub start_date: String,

    #[schemars(description = "Optional budget end date in YYYY-MM-DD format (omit for ongoing)")]
    pub end_date: Option<String>,
}

pub fn set_budget(db: &Database, params: SetBudgetParams) -> Result<ToolOutcome> {
    let start = parse_date(&params.start_date)?;
    let end = parse_date_opt(params.end_date.as_deref())?;

    match db.set_budget(&params.category, params.monthly_limit, start, end) {
        Ok(id) => Ok(ToolOutcome::success(format!(
            "Budget set for {}: ${:.2}/month starting {}",
            params.category, params.monthly_limit, start
        ))
        .with_id(id)),
        Err(e @ (Error::Database(_) | Error::Pool(_))) => {
            tracing::warn!("set_budget failed: {}", e);
            Ok(ToolOutcome::error(e.to_string()))
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct CheckBudgetParams {
    #[schemars(description = "Expense category to check")]
    pub category: String,

    #[schemars(description = "Start date in YYYY-MM-DD format; selects the budget active on this date")]
    pub start_date: String,

    #[schemars(description = "End date in YYYY-MM-DD format (inclusive)")]
    pub end_date: String,
}

pub fn check_budget(db: &Database, params: CheckBudgetParams) -> Result<BudgetCheck> {
    let from = parse_date(&params.start_date)?;
    let to = parse_date(&params.end_date)?;
    db.check_budget(&params.category, from, to)
}

/// Budgets still in effect today (open-ended or ending today or later)
pub fn list_budgets(db: &Database) -> Result<Vec<Budget>> {
    db.list_active_budgets(Utc::now().date_naive())
}

// =============================================================================
// delete_expense / delete_income
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct DeleteExpenseParams {
    #[schemars(description = "ID of the expense to delete")]
    pub expense_id: i64,
}

pub fn delete_expense(db: &Database, params: DeleteExpenseParams) -> Result<ToolOutcome> {
    db.delete_expense(params.expense_id)?;
    Ok(ToolOutcome::success(format!("Expense {} deleted", params.expense_id)))
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct DeleteIncomeParams {
    #[schemars(description = "ID of the income entry to delete")]
    pub income_id: i64,
}

pub fn delete_income(db: &Database, params: DeleteIncomeParams) -> Result<ToolOutcome> {
    db.delete_income(params.income_id)?;
    Ok(ToolOutcome::success(format!("Income {} deleted", params.income_id)))
}

// =============================================================================
// update_expense / update_income
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct UpdateExpenseParams {
    #[schemars(description = "ID of the expense to update")]
    pub expense_id: i64,

    #[schemars(description = "New date in YYYY-MM-DD format")]
    pub date: Option<String>,

    #[schemars(description = "New amount")]
    pub amount: Option<f64>,

    #[schemars(description = "New category")]
    pub category: Option<String>,

    #[schemars(description = "New subcategory")]
    pub subcategory: Option<String>,

    #[schemars(description = "New note")]
    pub note: Option<String>,
}

pub fn update_expense(db: &Database, params: UpdateExpenseParams) -> Result<ToolOutcome> {
    let update = ExpenseUpdate {
        date: parse_date_opt(params.date.as_deref())?,
        amount: params.amount,
        category: params.category,
        subcategory: params.subcategory,
        note: params.note,
    };
    db.update_expense(params.expense_id, &update)?;
    Ok(ToolOutcome::success(format!("Expense {} updated", params.expense_id)))
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct UpdateIncomeParams {
    #[schemars(description = "ID of the income entry to update")]
    pub income_id: i64,

    #[schemars(description = "New date in YYYY-MM-DD format")]
    pub date: Option<String>,

    #[schemars(description = "New amount")]
    pub amount: Option<f64>,

    #[schemars(description = "New income source")]
    pub source: Option<String>,

    #[schemars(description = "New note")]
    pub note: Option<String>,
}

pub fn update_income(db: &Database, params: UpdateIncomeParams) -> Result<ToolOutcome> {
    let update = IncomeUpdate {
        date: parse_date_opt(params.date.as_deref())?,
        amount: params.amount,
        source: params.source,
        note: params.note,
    };
    db.update_income(params.income_id, &update)?;
    Ok(ToolOutcome::success(format!("Income {} updated", params.income_id)))
}

// =============================================================================
// get_spending_trends
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SpendingTrendsParams {
    #[schemars(description = "Start date in YYYY-MM-DD format (inclusive)")]
    pub start_date: String,

    #[schemars(description = "End date in YYYY-MM-DD format (inclusive)")]
    pub end_date: String,

    #[schemars(description = "Group by 'day', 'week', or 'month' (default: month)")]
    pub group_by: Option<String>,
}

pub fn get_spending_trends(db: &Database, params: SpendingTrendsParams) -> Result<TrendsReport> {
    let from = parse_date(&params.start_date)?;
    let to = parse_date(&params.end_date)?;
    let group_by = params.group_by.as_deref().unwrap_or("month");
    db.get_spending_trends(from, to, group_by)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> DateRangeParams {
        DateRangeParams {
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
        assert!(matches!(parse_date("15/01/2025"), Err(Error::InvalidData(_))));
        assert!(matches!(parse_date("2025-02-30"), Err(Error::InvalidData(_))));
        assert_eq!(parse_date_opt(None).unwrap(), None);
    }

    #[test]
    fn test_add_expense_then_list() {
        let db = Database::in_memory().unwrap();
        let params: AddExpenseParams = serde_json::from_value(serde_json::json!({
            "date": "2025-01-15",
            "amount": 50.0,
            "category": "food"
        }))
        .unwrap();

        let outcome = add_expense(&db, params).unwrap();
        assert!(outcome.is_success());
        let id = outcome.id.unwrap();
        assert_eq!(outcome.message, format!("Expense added with ID {}", id));

        let rows = list_expenses(&db, range("2025-01-01", "2025-01-31")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 50.0);
        assert_eq!(rows[0].category, "food");
    }

    #[test]
    fn test_add_multiple_expenses() {
        let db = Database::in_memory().unwrap();
        let params: AddMultipleExpensesParams = serde_json::from_value(serde_json::json!({
            "expenses": [
                {"date": "2025-01-15", "amount": 50.0, "category": "food", "note": "Groceries"},
                {"date": "2025-01-16", "amount": 30.0, "category": "transport", "subcategory": "fuel"}
            ]
        }))
        .unwrap();

        let outcome = add_multiple_expenses(&db, params).unwrap();
        assert_eq!(outcome.count, Some(2));
        assert_eq!(outcome.ids.as_ref().unwrap().len(), 2);
        assert_eq!(outcome.message, "Successfully added 2 expenses");
    }

    #[test]
    fn test_add_multiple_expenses_rejects_bad_date_before_inserting() {
        let db = Database::in_memory().unwrap();
        let params: AddMultipleExpensesParams = serde_json::from_value(serde_json::json!({
            "expenses": [
                {"date": "2025-01-15", "amount": 50.0, "category": "food"},
                {"date": "yesterday", "amount": 30.0, "category": "transport"}
            ]
        }))
        .unwrap();

        let err = add_multiple_expenses(&db, params).unwrap_err();
        assert!(ToolOutcome::from_recoverable(&err).is_some());
        assert!(list_expenses(&db, range("2025-01-01", "2025-01-31"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_add_multiple_income() {
        let db = Database::in_memory().unwrap();
        let params: AddMultipleIncomeParams = serde_json::from_value(serde_json::json!({
            "income_entries": [
                {"date": "2025-01-01", "amount": 3000.0, "source": "salary"},
                {"date": "2025-01-10", "amount": 200.0, "source": "freelance", "note": "logo"}
            ]
        }))
        .unwrap();

        let outcome = add_multiple_income(&db, params).unwrap();
        assert_eq!(outcome.message, "Successfully added 2 income entries");

        let rows = list_income(&db, range("2025-01-01", "2025-01-31")).unwrap();
        assert_eq!(rows[0].note, "logo");
    }

    #[test]
    fn test_update_expense_outcomes() {
        let db = Database::in_memory().unwrap();
        let id = add_expense(
            &db,
            serde_json::from_value(serde_json::json!({
                "date": "2025-01-15", "amount": 50.0, "category": "food"
            }))
            .unwrap(),
        )
        .unwrap()
        .id
        .unwrap();

        let no_fields: UpdateExpenseParams =
            serde_json::from_value(serde_json::json!({ "expense_id": id })).unwrap();
        let err = update_expense(&db, no_fields).unwrap_err();
        let outcome = ToolOutcome::from_recoverable(&err).unwrap();
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(outcome.message, "No fields to update");

        let missing: UpdateExpenseParams =
            serde_json::from_value(serde_json::json!({ "expense_id": id + 100, "amount": 1.0 }))
                .unwrap();
        let err = update_expense(&db, missing).unwrap_err();
        assert_eq!(
            ToolOutcome::from_recoverable(&err).unwrap().message,
            format!("Expense {} not found", id + 100)
        );

        let ok: UpdateExpenseParams = serde_json::from_value(
            serde_json::json!({ "expense_id": id, "category": "dining" }),
        )
        .unwrap();
        let outcome = update_expense(&db, ok).unwrap();
        assert_eq!(outcome.message, format!("Expense {} updated", id));
        assert_eq!(db.get_expense(id).unwrap().unwrap().category, "dining");
    }

    #[test]
    fn test_set_budget_message_and_upsert() {
        let db = Database::in_memory().unwrap();
        let params = SetBudgetParams {
            category: "food".to_string(),
            monthly_limit: 300.0,
            start_date: "2025-01-01".to_string(),
            end_date: None,
        };
        let first = set_budget(&db, params.clone()).unwrap();
        assert_eq!(first.message, "Budget set for food: $300.00/month starting 2025-01-01");

        let second = set_budget(
            &db,
            SetBudgetParams {
                monthly_limit: 350.5,
                ..params
            },
        )
        .unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_get_spending_trends_defaults_to_month() {
        let db = Database::in_memory().unwrap();
        db.insert_expense(&NewExpense {
            date: NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(),
            amount: 12.0,
            category: "food".to_string(),
            subcategory: String::new(),
            note: String::new(),
        })
        .unwrap();

        let report = get_spending_trends(
            &db,
            SpendingTrendsParams {
                start_date: "2025-01-01".to_string(),
                end_date: "2025-12-31".to_string(),
                group_by: None,
            },
        )
        .unwrap();
        assert_eq!(report.group_by, "month");
        assert_eq!(report.trends[0].period, "2025-05");
    }

    #[test]
    fn test_tool_outcome_serialization_skips_empty_fields() {
        let json = serde_json::to_value(ToolOutcome::error("Expense 3 not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "Expense 3 not found"})
        );
    }
}
