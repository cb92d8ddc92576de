//! Expense operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::update_builder::UpdateBuilder;
use super::{date_column, parse_datetime, Database, DbConn};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseUpdate, NewExpense};

const EXPENSE_COLUMNS: &str = "id, date, amount, category, subcategory, note, created_at";

impl Database {
    /// Insert an expense, returning its new ID
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;
        let id = Self::insert_expense_with_conn(&conn, expense)?;
        debug!(id, category = %expense.category, "Inserted expense");
        Ok(id)
    }

    /// Insert several expenses on one connection, returning IDs in input order
    ///
    /// Rows are inserted one at a time without a surrounding transaction, so
    /// rows before a failing one stay committed.
    pub fn insert_expenses(&self, expenses: &[NewExpense]) -> Result<Vec<i64>> {
        let conn = self.conn()?;
        let ids = expenses
            .iter()
            .map(|expense| Self::insert_expense_with_conn(&conn, expense))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = ids.len(), "Inserted expense batch");
        Ok(ids)
    }

    fn insert_expense_with_conn(conn: &DbConn, expense: &NewExpense) -> Result<i64> {
        conn.execute(
            "INSERT INTO expenses (date, amount, category, subcategory, note) VALUES (?, ?, ?, ?, ?)",
            params![
                expense.date.to_string(),
                expense.amount,
                expense.category,
                expense.subcategory,
                expense.note,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a single expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                Self::row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// List expenses dated within `from..=to`, newest first
    pub fn list_expenses(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM expenses
            WHERE date BETWEEN ? AND ?
            ORDER BY date DESC, id DESC
            "#,
            EXPENSE_COLUMNS
        ))?;

        let expenses = stmt
            .query_map(
                params![from.to_string(), to.to_string()],
                Self::row_to_expense,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Apply a partial update to an expense
    ///
    /// Returns `InvalidData` when no field is set and `NotFound` when no row
    /// has the given ID.
    pub fn update_expense(&self, id: i64, update: &ExpenseUpdate) -> Result<()> {
        let stmt = UpdateBuilder::from(update)
            .build(id)
            .ok_or_else(|| Error::InvalidData("No fields to update".to_string()))?;

        let conn = self.conn()?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = stmt.params.iter().map(|p| p.as_ref()).collect();
        let changed = conn.execute(&stmt.sql, param_refs.as_slice())?;

        if changed == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        debug!(id, "Updated expense");
        Ok(())
    }

    /// Delete an expense by ID
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        debug!(id, "Deleted expense");
        Ok(())
    }

    fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let created_at_str: String = row.get(6)?;
        Ok(Expense {
            id: row.get(0)?,
            date: date_column(row, 1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            subcategory: row.get(4)?,
            note: row.get(5)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
