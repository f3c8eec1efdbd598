//! Savings goal operations

use rust_decimal::Decimal;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{decimal_column, opt_date_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{normalize_money, Goal, NewGoal};

const GOAL_COLUMNS: &str = "id, user_id, name, target_amount, current_amount, deadline, \
     is_completed, priority, created_at";

impl Database {
    /// Insert a goal; returns the new id
    pub fn insert_goal(&self, goal: NewGoal) -> Result<i64> {
        let goal = goal.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO goals (user_id, name, target_amount, current_amount, deadline, is_completed, priority)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                goal.user_id,
                goal.name.trim(),
                goal.target_amount.to_string(),
                goal.current_amount.to_string(),
                goal.deadline.map(|d| d.to_string()),
                goal.current_amount >= goal.target_amount,
                goal.priority.as_str(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// A user's goals: open ones first, then by deadline (undated last)
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM goals WHERE user_id = ? \
             ORDER BY is_completed, deadline IS NULL, deadline, id",
            GOAL_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let goals = stmt
            .query_map(params![user_id], |row| Self::row_to_goal(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Get a goal owned by `user_id`
    pub fn get_goal(&self, user_id: i64, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM goals WHERE id = ? AND user_id = ?", GOAL_COLUMNS);

        let goal = conn
            .query_row(&sql, params![id, user_id], |row| Self::row_to_goal(row))
            .optional()?;

        Ok(goal)
    }

    /// Add a contribution to a goal and return the updated goal
    ///
    /// The goal is marked completed once current_amount reaches target_amount.
    pub fn add_goal_progress(&self, user_id: i64, id: i64, amount: Decimal) -> Result<Goal> {
        let amount = normalize_money(amount, "amount")?;
        let mut goal = self
            .get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("goal {}", id)))?;

        goal.current_amount += amount;
        if !goal.is_completed && goal.current_amount >= goal.target_amount {
            goal.is_completed = true;
            info!(user_id, goal_id = id, "Goal completed");
        }

        let conn = self.conn()?;
        conn.execute(
            "UPDATE goals SET current_amount = ?, is_completed = ? WHERE id = ? AND user_id = ?",
            params![goal.current_amount.to_string(), goal.is_completed, id, user_id],
        )?;

        Ok(goal)
    }

    /// Delete a goal; returns false when it did not exist
    pub fn delete_goal(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
        let is_completed: i64 = row.get(6)?;
        let priority_str: String = row.get(7)?;
        let created_at_str: String = row.get(8)?;

        Ok(Goal {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            target_amount: decimal_column(row, 3)?,
            current_amount: decimal_column(row, 4)?,
            deadline: opt_date_column(row, 5)?,
            is_completed: is_completed != 0,
            priority: priority_str.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(7, Type::Text, e.into())
            })?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
