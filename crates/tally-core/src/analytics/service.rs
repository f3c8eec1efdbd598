//! Store-backed analytics operations
//!
//! `AnalyticsService` binds a `FinanceStore` and runs each report over a
//! fresh snapshot. It holds no state of its own, so one is built per request.

use chrono::NaiveDate;
use tracing::debug;

use super::aggregate::{category_breakdown, monthly_trends};
use super::budget::evaluate_budget;
use super::dashboard::compute_dashboard_stats;
use super::period::{add_months, budget_window, month_start, resolve_period, DateWindow, Period};
use crate::db::TransactionFilter;
use crate::error::Result;
use crate::models::{
    Budget, BudgetProgress, BudgetWithProgress, CategoryBreakdown, DashboardStats, MonthlyTrend,
    Transaction,
};
use crate::store::FinanceStore;

pub struct AnalyticsService<'a, S: FinanceStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: FinanceStore + ?Sized> AnalyticsService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Current-month totals with month-over-month change and savings rate
    pub fn compute_dashboard_stats(&self, user_id: i64, today: NaiveDate) -> Result<DashboardStats> {
        let window = DateWindow {
            start: Period::LastMonth.window(today)?.start,
            end: Period::ThisMonth.window(today)?.end,
        };
        let transactions = self.transactions_in(user_id, window)?;
        debug!(user_id, count = transactions.len(), "Computing dashboard stats");

        compute_dashboard_stats(&transactions, today)
    }

    /// Expense breakdown by category for a named period
    pub fn compute_category_breakdown(
        &self,
        user_id: i64,
        period: &str,
        today: NaiveDate,
    ) -> Result<Vec<CategoryBreakdown>> {
        let window = resolve_period(period, today)?;
        let transactions = self.transactions_in(user_id, window)?;
        let categories = self.store.fetch_categories(user_id)?;
        debug!(
            user_id,
            period,
            count = transactions.len(),
            "Computing category breakdown"
        );

        category_breakdown(&transactions, &categories, window)
    }

    /// Income/expense totals for the trailing `months` months
    pub fn compute_spending_trends(
        &self,
        user_id: i64,
        months: u32,
        today: NaiveDate,
    ) -> Result<Vec<MonthlyTrend>> {
        if months == 0 {
            return Ok(Vec::new());
        }

        let this_month = month_start(today);
        let span = i32::try_from(months).unwrap_or(i32::MAX);
        let window = DateWindow {
            start: add_months(this_month, 1 - span)?,
            end: add_months(this_month, 1)?,
        };
        let transactions = self.transactions_in(user_id, window)?;
        debug!(user_id, months, count = transactions.len(), "Computing spending trends");

        monthly_trends(&transactions, months, today)
    }

    /// Evaluate one budget against the spending in the budget's cycle from its start date
    pub fn evaluate_budget(&self, budget: &Budget, today: NaiveDate) -> Result<BudgetProgress> {
        let window = budget_window(budget.period, budget.start_date)?;
        let transactions = self.transactions_in(budget.user_id, window)?;
        debug!(
            user_id = budget.user_id,
            budget_id = budget.id,
            count = transactions.len(),
            "Evaluating budget"
        );

        evaluate_budget(budget, &transactions, today)
    }

    /// Every active budget of a user with its progress
    pub fn budget_overview(&self, user_id: i64, today: NaiveDate) -> Result<Vec<BudgetWithProgress>> {
        self.store
            .fetch_budgets(user_id)?
            .into_iter()
            .filter(|b| b.is_active)
            .map(|budget| {
                let progress = self.evaluate_budget(&budget, today)?;
                Ok(BudgetWithProgress { budget, progress })
            })
            .collect()
    }

    fn transactions_in(&self, user_id: i64, window: DateWindow) -> Result<Vec<Transaction>> {
        if window.is_empty() {
            return Ok(Vec::new());
        }
        let filter = TransactionFilter::new().date_range(Some((window.start, window.last_day())));
        self.store.fetch_transactions(user_id, &filter)
    }
}
