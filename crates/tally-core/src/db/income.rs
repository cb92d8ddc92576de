//! Income operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::update_builder::UpdateBuilder;
use super::{date_column, parse_datetime, Database, DbConn};
use crate::error::{Error, Result};
use crate::models::{Income, IncomeUpdate, NewIncome};

impl Database {
    /// Insert an income entry, returning its new ID
    pub fn insert_income(&self, income: &NewIncome) -> Result<i64> {
        let conn = self.conn()?;
        let id = Self::insert_income_with_conn(&conn, income)?;
        debug!(id, source = %income.source, "Inserted income");
        Ok(id)
    }

    /// Insert several income entries on one connection, returning IDs in input order
    ///
    /// Rows are inserted one at a time without a surrounding transaction, so
    /// rows before a failing one stay committed.
    pub fn insert_income_batch(&self, entries: &[NewIncome]) -> Result<Vec<i64>> {
        let conn = self.conn()?;
        let ids = entries
            .iter()
            .map(|entry| Self::insert_income_with_conn(&conn, entry))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = ids.len(), "Inserted income batch");
        Ok(ids)
    }

    fn insert_income_with_conn(conn: &DbConn, income: &NewIncome) -> Result<i64> {
        conn.execute(
            "INSERT INTO income (date, amount, source, note) VALUES (?, ?, ?, ?)",
            params![income.date.to_string(), income.amount, income.source, income.note],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a single income entry by ID
    pub fn get_income(&self, id: i64) -> Result<Option<Income>> {
        let conn = self.conn()?;
        let income = conn
            .query_row(
                "SELECT id, date, amount, source, note, created_at FROM income WHERE id = ?",
                params![id],
                |row| Self::row_to_income(row),
            )
            .optional()?;
        Ok(income)
    }

    /// List income dated within `from..=to`, newest first
    pub fn list_income(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, date, amount, source, note, created_at
            FROM income
            WHERE date BETWEEN ? AND ?
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let income = stmt
            .query_map(params![from.to_string(), to.to_string()], |row| {
                Self::row_to_income(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(income)
    }

    /// Apply a partial update to an income entry
    pub fn update_income(&self, id: i64, update: &IncomeUpdate) -> Result<()> {
        let stmt = UpdateBuilder::from(update)
            .build(id)
            .ok_or_else(|| Error::InvalidData("No fields to update".to_string()))?;

        let conn = self.conn()?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = stmt.params.iter().map(|p| p.as_ref()).collect();
        if conn.execute(&stmt.sql, param_refs.as_slice())? == 0 {
            return Err(Error::NotFound(format!("Income {} not found", id)));
        }
        debug!(id, "Updated income");
        Ok(())
    }

    /// Delete an income entry by ID
    pub fn delete_income(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        if conn.execute("DELETE FROM income WHERE id = ?", params![id])? == 0 {
            return Err(Error::NotFound(format!("Income {} not found", id)));
        }
        debug!(id, "Deleted income");
        Ok(())
    }

    fn row_to_income(row: &rusqlite::Row) -> rusqlite::Result<Income> {
        let created_at_str: String = row.get(5)?;
        Ok(Income {
            id: row.get(0)?,
            date: date_column(row, 1)?,
            amount: row.get(2)?,
            source: row.get(3)?,
            note: row.get(4)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
