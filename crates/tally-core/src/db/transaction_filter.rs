//! Transaction filter builder for constructing dynamic SQL queries
//!
//! This module provides a builder pattern for constructing WHERE clauses
//! and related SQL components for transaction queries.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::TransactionType;

/// Builder for constructing transaction query filters
///
/// Shared by `list_transactions` and `count_transactions`, and handed to
/// `FinanceStore::fetch_transactions` by the analytics engine.
///
/// The lifetime `'query` represents how long borrowed parameters (search
/// text, sort options) must remain valid.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter<'query> {
    pub user_id: Option<i64>,
    /// Inclusive on both ends
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub category_id: Option<i64>,
    /// Only transactions with no category
    pub uncategorized: bool,
    pub transaction_type: Option<TransactionType>,
    pub fixed_only: bool,
    pub search: Option<&'query str>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub sort_field: Option<&'query str>,
    pub sort_order: Option<&'query str>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> TransactionFilter<'query> {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set owning user filter
    pub fn user_id(mut self, id: Option<i64>) -> Self {
        self.user_id = id;
        self
    }

    /// Set date range filter (inclusive)
    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.date_range = range;
        self
    }

    /// Set category filter
    pub fn category_id(mut self, id: Option<i64>) -> Self {
        self.category_id = id;
        self
    }

    /// Only transactions with no category (ignored when category_id is set)
    pub fn uncategorized(mut self, value: bool) -> Self {
        self.uncategorized = value;
        self
    }

    /// Set expense/income filter
    pub fn transaction_type(mut self, t: Option<TransactionType>) -> Self {
        self.transaction_type = t;
        self
    }

    /// Only recurring / fixed transactions
    pub fn fixed_only(mut self, value: bool) -> Self {
        self.fixed_only = value;
        self
    }

    /// Set search query (searches description)
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    /// Set inclusive amount bounds
    pub fn amount_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    /// Set sort field (date or amount)
    pub fn sort_field(mut self, field: Option<&'query str>) -> Self {
        self.sort_field = field;
        self
    }

    /// Set sort order (asc or desc)
    pub fn sort_order(mut self, order: Option<&'query str>) -> Self {
        self.sort_order = order;
        self
    }

    /// Build the filter components
    pub fn build(&self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(uid) = self.user_id {
            conditions.push("t.user_id = ?".to_string());
            params.push(Box::new(uid));
        }

        // Date range filter (dates are stored as ISO text, so they compare lexically)
        if let Some((from_date, to_date)) = self.date_range {
            conditions.push("t.date >= ? AND t.date <= ?".to_string());
            params.push(Box::new(from_date.to_string()));
            params.push(Box::new(to_date.to_string()));
        }

        if let Some(cid) = self.category_id {
            conditions.push("t.category_id = ?".to_string());
            params.push(Box::new(cid));
        } else if self.uncategorized {
            conditions.push("t.category_id IS NULL".to_string());
        }

        if let Some(t) = self.transaction_type {
            conditions.push("t.type = ?".to_string());
            params.push(Box::new(t.as_str()));
        }

        if self.fixed_only {
            conditions.push("t.is_fixed = 1".to_string());
        }

        // Search filter (description)
        if let Some(q) = self.search {
            if !q.trim().is_empty() {
                conditions.push("t.description LIKE ? COLLATE NOCASE".to_string());
                params.push(Box::new(format!("%{}%", q.trim())));
            }
        }

        // Amounts are stored as decimal text; compare numerically
        if let Some(min) = self.min_amount {
            conditions.push("CAST(t.amount AS REAL) >= CAST(? AS REAL)".to_string());
            params.push(Box::new(min.to_string()));
        }
        if let Some(max) = self.max_amount {
            conditions.push("CAST(t.amount AS REAL) <= CAST(? AS REAL)".to_string());
            params.push(Box::new(max.to_string()));
        }

        // Build WHERE clause
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Build ORDER BY clause
        let order_column = match self.sort_field {
            Some("amount") => "CAST(t.amount AS REAL)",
            _ => "t.date",
        };
        let order_dir = match self.sort_order {
            Some("asc") => "ASC",
            _ => "DESC",
        };
        let order_clause = format!("ORDER BY {} {}, t.id DESC", order_column, order_dir);

        FilterResult {
            where_clause,
            order_clause,
            params,
        }
    }
}

impl FilterResult {
    /// Build a COUNT query
    pub fn build_count_query(&self) -> String {
        format!("SELECT COUNT(*) FROM transactions t {}", self.where_clause)
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Get mutable parameter vector to append pagination params
    pub fn into_params(self) -> Vec<Box<dyn rusqlite::ToSql>> {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_filter() {
        let result = TransactionFilter::new().build();
        assert!(result.where_clause.is_empty());
        assert_eq!(result.order_clause, "ORDER BY t.date DESC, t.id DESC");
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_combined_conditions() {
        let result = TransactionFilter::new()
            .user_id(Some(1))
            .category_id(Some(3))
            .transaction_type(Some(TransactionType::Expense))
            .fixed_only(true)
            .search(Some("  coffee "))
            .amount_range(Some(dec!(5)), None)
            .build();

        assert_eq!(
            result.where_clause,
            "WHERE t.user_id = ? AND t.category_id = ? AND t.type = ? AND t.is_fixed = 1 \
             AND t.description LIKE ? COLLATE NOCASE AND CAST(t.amount AS REAL) >= CAST(? AS REAL)"
        );
        assert_eq!(result.params.len(), 5);
    }

    #[test]
    fn test_blank_search_ignored() {
        let result = TransactionFilter::new().search(Some("   ")).build();
        assert!(result.where_clause.is_empty());
    }

    #[test]
    fn test_sort_by_amount_ascending() {
        let result = TransactionFilter::new()
            .sort_field(Some("amount"))
            .sort_order(Some("asc"))
            .build();
        assert_eq!(
            result.order_clause,
            "ORDER BY CAST(t.amount AS REAL) ASC, t.id DESC"
        );
    }

    #[test]
    fn test_count_query() {
        let result = TransactionFilter::new().user_id(Some(2)).build();
        assert_eq!(
            result.build_count_query(),
            "SELECT COUNT(*) FROM transactions t WHERE t.user_id = ?"
        );
    }
}
