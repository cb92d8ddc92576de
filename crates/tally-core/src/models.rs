//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Round a monetary value to 2 decimal places
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ========== Ledger Entries ==========

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Expense to be inserted
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

/// A recorded income entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub source: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Income entry to be inserted
#[derive(Debug, Clone)]
pub struct NewIncome {
    pub date: NaiveDate,
    pub amount: f64,
    pub source: String,
    pub note: String,
}

/// Partial update of an expense. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
}

/// Partial update of an income entry. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct IncomeUpdate {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub note: Option<String>,
}

// ========== Budgets ==========

/// A category budget with an optional end date (None = open-ended)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub monthly_limit: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Whether this budget's window contains `date`
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end >= date)
    }
}

/// Spend-vs-budget classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    NoBudget,
    UnderBudget,
    Warning,
    OverBudget,
}

/// Share of the limit at which a budget is flagged as a warning
pub const BUDGET_WARNING_PERCENT: f64 = 90.0;

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoBudget => "no_budget",
            Self::UnderBudget => "under_budget",
            Self::Warning => "warning",
            Self::OverBudget => "over_budget",
        }
    }

    /// Classify spending against a limit
    pub fn classify(limit: f64, spent: f64) -> Self {
        if spent > limit {
            Self::OverBudget
        } else if percentage_used(limit, spent) >= BUDGET_WARNING_PERCENT {
            Self::Warning
        } else {
            Self::UnderBudget
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Percentage of `limit` consumed by `spent` (0 when the limit is not positive)
pub fn percentage_used(limit: f64, spent: f64) -> f64 {
    if limit > 0.0 {
        spent / limit * 100.0
    } else {
        0.0
    }
}

/// Budget check result when no active budget exists
#[derive(Debug, Clone, Serialize)]
pub struct NoBudget {
    pub status: BudgetStatus,
    pub category: String,
    pub message: String,
}

/// Budget check result for an active budget
#[derive(Debug, Clone, Serialize)]
pub struct BudgetEvaluation {
    pub status: BudgetStatus,
    pub category: String,
    pub period: ReportPeriod,
    pub budget_limit: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage_used: f64,
}

/// Outcome of checking a category against its budget
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BudgetCheck {
    NoBudget(NoBudget),
    Evaluated(BudgetEvaluation),
}

impl BudgetCheck {
    pub fn status(&self) -> BudgetStatus {
        match self {
            Self::NoBudget(b) => b.status,
            Self::Evaluated(b) => b.status,
        }
    }
}

// ========== Report Models ==========

/// Report period info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start_date: String,
    pub end_date: String,
}

impl ReportPeriod {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            start_date: from.to_string(),
            end_date: to.to_string(),
        }
    }
}

/// Trend bucket size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendGrouping {
    Day,
    Week,
    #[default]
    Month,
}

impl TrendGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Resolve a `group_by` value; anything other than the exact lowercase
    /// names falls back to month
    pub fn from_group_by(group_by: &str) -> Self {
        group_by.parse().unwrap_or_default()
    }

    /// SQLite strftime pattern producing the bucket key
    pub(crate) fn strftime_format(&self) -> &'static str {
        match self {
            Self::Day => "%Y-%m-%d",
            Self::Week => "%Y-W%W",
            Self::Month => "%Y-%m",
        }
    }
}

impl std::str::FromStr for TrendGrouping {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(format!("Unknown grouping: {} (valid: day, week, month)", s)),
        }
    }
}

/// Date range echoed back in a trends report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// A single bucket in a trends report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendDataPoint {
    pub period: String,
    pub total_spent: f64,
    pub transaction_count: i64,
    pub avg_transaction: f64,
}

/// Spending over time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsReport {
    /// The grouping as requested, even when it fell back to month
    pub group_by: String,
    pub date_range: DateRange,
    pub trends: Vec<TrendDataPoint>,
}

/// Expense total for one category (summarize)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
    pub count: i64,
}

/// Income total for one source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source: String,
    pub total: f64,
    pub count: i64,
}

/// Expense total for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub total: f64,
    pub count: i64,
}

/// Income, expenses and balance for a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub period: ReportPeriod,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub income_by_source: Vec<SourceBreakdown>,
    pub expenses_by_category: Vec<CategoryBreakdown>,
}
