//! Spending reports and analytics

use chrono::NaiveDate;
use rusqlite::params;

use super::{Database, DbConn};
use crate::error::Result;
use crate::models::{
    round_money, CategoryBreakdown, CategoryTotal, DateRange, FinancialSummary, ReportPeriod,
    SourceBreakdown, TrendDataPoint, TrendGrouping, TrendsReport,
};

impl Database {
    /// Expense totals per category in `from..=to`, largest first
    /// category narrows the result to a single category
    pub fn summarize_expenses(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        category: Option<&str>,
    ) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            r#"
            SELECT category, SUM(amount) AS total_amount, COUNT(*) AS count
            FROM expenses
            WHERE date BETWEEN ? AND ?
            "#,
        );
        let mut query_params: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(from.to_string()), Box::new(to.to_string())];

        if let Some(cat) = category.filter(|c| !c.is_empty()) {
            sql.push_str(" AND category = ?");
            query_params.push(Box::new(cat.to_string()));
        }
        sql.push_str(" GROUP BY category ORDER BY total_amount DESC");

        let param_refs: Vec<&dyn rusqlite::ToSql> =
            query_params.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let totals = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total_amount: round_money(row.get(1)?),
                    count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Income, expenses, balance and their breakdowns for `from..=to`
    pub fn financial_summary(&self, from: NaiveDate, to: NaiveDate) -> Result<FinancialSummary> {
        let conn = self.conn()?;

        let total_income = Self::sum_amount(&conn, "income", from, to)?;
        let total_expenses = Self::sum_amount(&conn, "expenses", from, to)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source, SUM(amount) AS total, COUNT(*) AS count
            FROM income
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY source
            ORDER BY total DESC
            "#,
        )?;
        let income_by_source = stmt
            .query_map(params![from.to_string(), to.to_string()], |row| {
                Ok(SourceBreakdown {
                    source: row.get(0)?,
                    total: round_money(row.get(1)?),
                    count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT category, SUM(amount) AS total, COUNT(*) AS count
            FROM expenses
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY category
            ORDER BY total DESC
            "#,
        )?;
        let expenses_by_category = stmt
            .query_map(params![from.to_string(), to.to_string()], |row| {
                Ok(CategoryBreakdown {
                    category: row.get(0)?,
                    total: round_money(row.get(1)?),
                    count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(FinancialSummary {
            period: ReportPeriod::new(from, to),
            total_income: round_money(total_income),
            total_expenses: round_money(total_expenses),
            balance: round_money(total_income - total_expenses),
            income_by_source,
            expenses_by_category,
        })
    }

    /// Helper: sum of `amount` in a ledger table over a date range
    fn sum_amount(conn: &DbConn, table: &str, from: NaiveDate, to: NaiveDate) -> Result<f64> {
        let sql = format!(
            "SELECT COALESCE(SUM(amount), 0) FROM {} WHERE date BETWEEN ?1 AND ?2",
            table
        );
        let total: f64 = conn.query_row(&sql, params![from.to_string(), to.to_string()], |row| {
            row.get(0)
        })?;
        Ok(total)
    }

    /// Get spending trends over time
    /// group_by is day, week or month; anything else is bucketed by month
    pub fn get_spending_trends(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        group_by: &str,
    ) -> Result<TrendsReport> {
        let conn = self.conn()?;
        let grouping = TrendGrouping::from_group_by(group_by);

        let sql = format!(
            r#"
            SELECT
                strftime('{}', date) AS period,
                SUM(amount) AS total_spent,
                COUNT(*) AS transaction_count,
                AVG(amount) AS avg_transaction
            FROM expenses
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY period
            ORDER BY period ASC
            "#,
            grouping.strftime_format()
        );

        let mut stmt = conn.prepare(&sql)?;
        let trends = stmt
            .query_map(params![from.to_string(), to.to_string()], |row| {
                Ok(TrendDataPoint {
                    period: row.get(0)?,
                    total_spent: round_money(row.get(1)?),
                    transaction_count: row.get(2)?,
                    avg_transaction: round_money(row.get(3)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(TrendsReport {
            group_by: group_by.to_string(),
            date_range: DateRange {
                start: from.to_string(),
                end: to.to_string(),
            },
            trends,
        })
    }
}
