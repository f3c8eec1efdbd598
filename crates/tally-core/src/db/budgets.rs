//! Budget operations

use rust_decimal::Decimal;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};

use super::{date_column, decimal_column, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Budget, NewBudget};

const BUDGET_COLUMNS: &str = "id, user_id, name, category_id, amount, period, start_date, \
     is_active, alert_threshold, created_at";

impl Database {
    /// Insert a budget; budgets created without a threshold get `default_threshold`
    pub fn insert_budget(&self, budget: NewBudget, default_threshold: Decimal) -> Result<i64> {
        let budget = budget.validate(default_threshold)?;
        let threshold = budget.alert_threshold.unwrap_or(default_threshold);
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO budgets (user_id, name, category_id, amount, period, start_date, alert_threshold)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                budget.user_id,
                budget.name.trim(),
                budget.category_id,
                budget.amount.to_string(),
                budget.period.as_str(),
                budget.start_date.to_string(),
                threshold.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// All budgets a user owns, newest first
    pub fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM budgets WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            BUDGET_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let budgets = stmt
            .query_map(params![user_id], |row| Self::row_to_budget(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Get a budget owned by `user_id`
    pub fn get_budget(&self, user_id: i64, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM budgets WHERE id = ? AND user_id = ?",
            BUDGET_COLUMNS
        );

        let budget = conn
            .query_row(&sql, params![id, user_id], |row| Self::row_to_budget(row))
            .optional()?;

        Ok(budget)
    }

    /// Pause or resume a budget; returns false when it did not exist
    pub fn set_budget_active(&self, user_id: i64, id: i64, active: bool) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE budgets SET is_active = ? WHERE id = ? AND user_id = ?",
            params![active, id, user_id],
        )?;
        Ok(updated > 0)
    }

    /// Delete a budget; returns false when it did not exist
    pub fn delete_budget(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let period_str: String = row.get(5)?;
        let is_active: i64 = row.get(7)?;
        let created_at_str: String = row.get(9)?;

        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            category_id: row.get(3)?,
            amount: decimal_column(row, 4)?,
            period: period_str.parse().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
            })?,
            start_date: date_column(row, 6)?,
            is_active: is_active != 0,
            alert_threshold: decimal_column(row, 8)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
