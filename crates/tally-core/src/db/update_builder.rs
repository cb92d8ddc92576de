//! Builder for partial UPDATE statements
//!
//! Accumulates `column = ?` assignments only for the fields that were
//! provided, so a partial update never touches the other columns.

use chrono::NaiveDate;

use crate::models::{ExpenseUpdate, IncomeUpdate};

/// Builder for constructing `UPDATE <table> SET ... WHERE id = ?`
pub struct UpdateBuilder {
    table: &'static str,
    assignments: Vec<&'static str>,
    params: Vec<Box<dyn rusqlite::ToSql>>,
}

/// Result of building an update - the SQL and its parameters (id last)
pub struct UpdateStatement {
    pub sql: String,
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl UpdateBuilder {
    /// Create a builder for the given table
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Set a column if a value was provided
    pub fn set<T>(mut self, column: &'static str, value: Option<T>) -> Self
    where
        T: rusqlite::ToSql + 'static,
    {
        if let Some(v) = value {
            self.assignments.push(column);
            self.params.push(Box::new(v));
        }
        self
    }

    /// Set a date column if a value was provided
    pub fn set_date(self, column: &'static str, value: Option<NaiveDate>) -> Self {
        self.set(column, value.map(|d| d.to_string()))
    }

    /// Build the statement for the row with `id`, or None when no field was set
    pub fn build(mut self, id: i64) -> Option<UpdateStatement> {
        if self.assignments.is_empty() {
            return None;
        }

        let set_clause = self
            .assignments
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");

        self.params.push(Box::new(id));

        Some(UpdateStatement {
            sql: format!("UPDATE {} SET {} WHERE id = ?", self.table, set_clause),
            params: self.params,
        })
    }
}

impl From<&ExpenseUpdate> for UpdateBuilder {
    fn from(update: &ExpenseUpdate) -> Self {
        UpdateBuilder::new("expenses")
            .set_date("date", update.date)
            .set("amount", update.amount)
            .set("category", update.category.clone())
            .set("subcategory", update.subcategory.clone())
            .set("note", update.note.clone())
    }
}

impl From<&IncomeUpdate> for UpdateBuilder {
    fn from(update: &IncomeUpdate) -> Self {
        UpdateBuilder::new("income")
            .set_date("date", update.date)
            .set("amount", update.amount)
            .set("source", update.source.clone())
            .set("note", update.note.clone())
    }
}
