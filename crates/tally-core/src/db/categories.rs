//! Category operations

use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Category, NewCategory, TransactionType};

/// System categories shared by every user: (name, icon, color, type)
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str, TransactionType)] = &[
    ("Food & Dining", "🍔", "#ef4444", TransactionType::Expense),
    ("Transportation", "🚗", "#f59e0b", TransactionType::Expense),
    ("Shopping", "🛍️", "#8b5cf6", TransactionType::Expense),
    ("Entertainment", "🎬", "#ec4899", TransactionType::Expense),
    ("Bills & Utilities", "💡", "#3b82f6", TransactionType::Expense),
    ("Healthcare", "🏥", "#10b981", TransactionType::Expense),
    ("Education", "📚", "#6366f1", TransactionType::Expense),
    ("Other", "📦", "#6b7280", TransactionType::Expense),
    ("Salary", "💰", "#22c55e", TransactionType::Income),
    ("Freelance", "💼", "#14b8a6", TransactionType::Income),
    ("Investments", "📈", "#0ea5e9", TransactionType::Income),
    ("Other Income", "💵", "#84cc16", TransactionType::Income),
];

impl Database {
    /// Insert the system default categories if none exist yet
    ///
    /// Returns the number of categories created (0 when already seeded).
    pub fn seed_default_categories(&self) -> Result<usize> {
        let conn = self.conn()?;

        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE user_id IS NULL",
            [],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Ok(0);
        }

        let mut stmt = conn.prepare(
            "INSERT INTO categories (user_id, name, icon, color, type) VALUES (NULL, ?, ?, ?, ?)",
        )?;
        for (name, icon, color, category_type) in DEFAULT_CATEGORIES {
            stmt.execute(params![name, icon, color, category_type.as_str()])?;
        }

        info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
        Ok(DEFAULT_CATEGORIES.len())
    }

    /// System defaults plus the user's own categories, ordered by type then name
    pub fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, name, icon, color, type
            FROM categories
            WHERE user_id IS NULL OR user_id = ?
            ORDER BY type, name
            "#,
        )?;

        let categories = stmt
            .query_map(params![user_id], |row| Self::row_to_category(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category visible to `user_id`
    pub fn get_category(&self, user_id: i64, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                r#"
                SELECT id, user_id, name, icon, color, type
                FROM categories
                WHERE id = ? AND (user_id IS NULL OR user_id = ?)
                "#,
                params![id, user_id],
                |row| Self::row_to_category(row),
            )
            .optional()?;

        Ok(category)
    }

    /// Create a user-defined category
    pub fn insert_category(&self, category: &NewCategory) -> Result<i64> {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("name must not be empty".to_string()));
        }

        let conn = self.conn()?;

        let duplicate: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE name = ? COLLATE NOCASE AND type = ? AND (user_id IS NULL OR user_id = ?)",
                params![name, category.category_type.as_str(), category.user_id],
                |row| row.get(0),
            )
            .optional()?;
        if duplicate.is_some() {
            return Err(Error::InvalidInput(format!(
                "category '{}' already exists",
                name
            )));
        }

        conn.execute(
            "INSERT INTO categories (user_id, name, icon, color, type) VALUES (?, ?, ?, ?, ?)",
            params![
                category.user_id,
                name,
                category.icon,
                category.color,
                category.category_type.as_str(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Delete a user-owned category (system defaults cannot be deleted)
    ///
    /// Transactions keep their now-dangling category_id and are reported as
    /// uncategorized from then on.
    pub fn delete_category(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM categories WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
        let type_str: String = row.get(5)?;
        Ok(Category {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            icon: row.get(3)?,
            color: row.get(4)?,
            category_type: type_str.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into())
            })?,
        })
    }
}
