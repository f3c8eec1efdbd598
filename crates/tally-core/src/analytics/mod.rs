//! Analytics engine
//!
//! Derived metrics computed from raw transaction records:
//! - `period` - named period tokens and budget cycles to half-open date windows
//! - `aggregate` - filtered sums, category breakdown, monthly trends
//! - `budget` - spent vs allotted with threshold status
//! - `dashboard` - current vs previous month, savings rate
//! - `goals` - savings goal progress
//! - `ratio` - the divide-by-zero guard every percentage goes through
//!
//! Everything here is synchronous and pure over borrowed slices except
//! `AnalyticsService`, which pulls a snapshot from a `FinanceStore` first.

pub mod aggregate;
pub mod budget;
pub mod dashboard;
pub mod goals;
pub mod period;
pub mod ratio;
mod service;

pub use aggregate::{
    aggregate, category_breakdown, monthly_trends, Aggregate, AggregateFilter,
    UNCATEGORIZED_COLOR, UNCATEGORIZED_LABEL,
};
pub use budget::{classify, evaluate_budget};
pub use dashboard::compute_dashboard_stats;
pub use goals::goal_progress;
pub use period::{budget_window, resolve_period, DateWindow, Period};
pub use ratio::{percentage, safe_ratio};
pub use service::AnalyticsService;
