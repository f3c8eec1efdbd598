//! Data-access seam consumed by the analytics engine
//!
//! The engine never talks to SQLite directly; it asks a `FinanceStore` for a
//! snapshot of a user's records and computes over the returned slices.

use crate::db::{Database, TransactionFilter};
use crate::error::Result;
use crate::models::{Budget, Category, Transaction};

/// Read access to a user's financial records
pub trait FinanceStore {
    /// Transactions matching `filter`, newest first
    fn fetch_transactions(
        &self,
        user_id: i64,
        filter: &TransactionFilter<'_>,
    ) -> Result<Vec<Transaction>>;

    /// System default categories plus the user's own
    fn fetch_categories(&self, user_id: i64) -> Result<Vec<Category>>;

    /// Every budget the user owns, active or not
    fn fetch_budgets(&self, user_id: i64) -> Result<Vec<Budget>>;
}

impl FinanceStore for Database {
    fn fetch_transactions(
        &self,
        user_id: i64,
        filter: &TransactionFilter<'_>,
    ) -> Result<Vec<Transaction>> {
        self.list_transactions(user_id, filter, None, 0)
    }

    fn fetch_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        self.list_categories(user_id)
    }

    fn fetch_budgets(&self, user_id: i64) -> Result<Vec<Budget>> {
        self.list_budgets(user_id)
    }
}
