//! Budget operations and status evaluation

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{date_column, optional_date_column, parse_datetime, Database, DbConn};
use crate::error::Result;
use crate::models::{
    percentage_used, round_money, Budget, BudgetCheck, BudgetEvaluation, BudgetStatus, NoBudget,
    ReportPeriod,
};

const BUDGET_COLUMNS: &str = "id, category, monthly_limit, start_date, end_date, created_at";

impl Database {
    /// Create or update the budget keyed by (category, start_date)
    ///
    /// Setting the same key again overwrites the limit and end date in place.
    pub fn set_budget(
        &self,
        category: &str,
        monthly_limit: f64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        let id: i64 = conn.query_row(
            r#"
            INSERT INTO budgets (category, monthly_limit, start_date, end_date)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(category, start_date)
            DO UPDATE SET monthly_limit = excluded.monthly_limit, end_date = excluded.end_date
            RETURNING id
            "#,
            params![
                category,
                monthly_limit,
                start_date.to_string(),
                end_date.map(|d| d.to_string()),
            ],
            |row| row.get(0),
        )?;

        debug!(id, category, monthly_limit, "Budget set");
        Ok(id)
    }

    /// List budgets that have not ended before `today`, by category
    pub fn list_active_budgets(&self, today: NaiveDate) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM budgets
            WHERE end_date IS NULL OR end_date >= ?
            ORDER BY category ASC, start_date DESC
            "#,
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![today.to_string()], |row| Self::row_to_budget(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Find the budget governing `category` on `date`
    ///
    /// Overlapping windows are allowed; the one with the latest start date wins.
    pub fn active_budget(&self, category: &str, date: NaiveDate) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!(
                    r#"
                    SELECT {}
                    FROM budgets
                    WHERE category = ?1
                      AND start_date <= ?2
                      AND (end_date IS NULL OR end_date >= ?2)
                    ORDER BY start_date DESC
                    LIMIT 1
                    "#,
                    BUDGET_COLUMNS
                ),
                params![category, date.to_string()],
                |row| Self::row_to_budget(row),
            )
            .optional()?;
        Ok(budget)
    }

    /// Total spent in `category` within `from..=to`
    fn category_spending(
        conn: &DbConn,
        category: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let spent: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE category = ? AND date BETWEEN ? AND ?",
            params![category, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(spent)
    }

    /// Compare spending in `from..=to` against the budget active on `from`
    pub fn check_budget(&self, category: &str, from: NaiveDate, to: NaiveDate) -> Result<BudgetCheck> {
        let Some(budget) = self.active_budget(category, from)? else {
            return Ok(BudgetCheck::NoBudget(NoBudget {
                status: BudgetStatus::NoBudget,
                category: category.to_string(),
                message: format!("No budget set for {}", category),
            }));
        };

        debug_assert!(budget.is_active_on(from));

        let conn = self.conn()?;
        let spent = Self::category_spending(&conn, category, from, to)?;
        let limit = budget.monthly_limit;
        let status = BudgetStatus::classify(limit, spent);

        debug!(category, limit, spent, %status, "Budget checked");

        Ok(BudgetCheck::Evaluated(BudgetEvaluation {
            status,
            category: category.to_string(),
            period: ReportPeriod::new(from, to),
            budget_limit: round_money(limit),
            spent: round_money(spent),
            remaining: round_money(limit - spent),
            percentage_used: round_money(percentage_used(limit, spent)),
        }))
    }

    fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let created_at_str: String = row.get(5)?;
        Ok(Budget {
            id: row.get(0)?,
            category: row.get(1)?,
            monthly_limit: row.get(2)?,
            start_date: date_column(row, 3)?,
            end_date: optional_date_column(row, 4)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
