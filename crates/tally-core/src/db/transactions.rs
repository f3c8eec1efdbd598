//! Transaction operations

use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};

use super::transaction_filter::TransactionFilter;
use super::{date_column, decimal_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{normalize_money, NewTransaction, Transaction, TransactionUpdate};

const TRANSACTION_COLUMNS: &str = "t.id, t.user_id, t.amount, t.type, t.description, t.category_id, \
     t.date, t.is_fixed, t.tags, t.satisfaction_rating, t.created_at";

impl Database {
    /// Insert a transaction after validating it; returns the new id
    pub fn insert_transaction(&self, tx: NewTransaction) -> Result<i64> {
        let tx = tx.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, amount, type, description, category_id, date, is_fixed, tags, satisfaction_rating)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.user_id,
                tx.amount.to_string(),
                tx.transaction_type.as_str(),
                tx.description.trim(),
                tx.category_id,
                tx.date.to_string(),
                tx.is_fixed,
                serde_json::to_string(&tx.tags)?,
                tx.satisfaction_rating,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's transactions matching a filter
    ///
    /// `limit: None` returns every match.
    pub fn list_transactions(
        &self,
        user_id: i64,
        filter: &TransactionFilter<'_>,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let filter = filter.clone().user_id(Some(user_id)).build();
        let sql = format!(
            "SELECT {} FROM transactions t {} {} LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS, filter.where_clause, filter.order_clause
        );

        let mut params = filter.into_params();
        params.push(Box::new(limit.unwrap_or(-1)));
        params.push(Box::new(offset));
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(params_refs.as_slice(), |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count a user's transactions matching a filter
    pub fn count_transactions(&self, user_id: i64, filter: &TransactionFilter<'_>) -> Result<i64> {
        let conn = self.conn()?;

        let filter = filter.clone().user_id(Some(user_id)).build();
        let count: i64 = conn.query_row(
            &filter.build_count_query(),
            filter.params_refs().as_slice(),
            |row| row.get(0),
        )?;

        Ok(count)
    }

    /// Get a single transaction owned by `user_id`
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions t WHERE t.id = ? AND t.user_id = ?",
            TRANSACTION_COLUMNS
        );

        let transaction = conn
            .query_row(&sql, params![id, user_id], |row| Self::row_to_transaction(row))
            .optional()?;

        Ok(transaction)
    }

    /// Apply an edit to a transaction and return the updated record
    pub fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<Transaction> {
        let mut current = self
            .get_transaction(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))?;

        if let Some(amount) = update.amount {
            current.amount = normalize_money(amount, "amount")?;
        }
        if let Some(category_id) = update.category_id {
            current.category_id = category_id;
        }
        if let Some(date) = update.date {
            current.date = date;
        }
        if let Some(ref description) = update.description {
            if description.trim().is_empty() {
                return Err(Error::InvalidInput(
                    "description must not be empty".to_string(),
                ));
            }
            current.description = description.trim().to_string();
        }
        if let Some(is_fixed) = update.is_fixed {
            current.is_fixed = is_fixed;
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE transactions
            SET amount = ?, category_id = ?, date = ?, description = ?, is_fixed = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                current.amount.to_string(),
                current.category_id,
                current.date.to_string(),
                current.description,
                current.is_fixed,
                id,
                user_id,
            ],
        )?;

        Ok(current)
    }

    /// Delete a transaction; returns false when it did not exist
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(deleted > 0)
    }

    /// Helper to convert a row to Transaction
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let type_str: String = row.get(3)?;
        let is_fixed: i64 = row.get(7)?;
        let tags_str: String = row.get(8)?;
        let created_at_str: String = row.get(10)?;

        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: decimal_column(row, 2)?,
            transaction_type: type_str.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
            })?,
            description: row.get(4)?,
            category_id: row.get(5)?,
            date: date_column(row, 6)?,
            is_fixed: is_fixed != 0,
            tags: serde_json::from_str(&tags_str).unwrap_or_default(),
            satisfaction_rating: row.get(9)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
