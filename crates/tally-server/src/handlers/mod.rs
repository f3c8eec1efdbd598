//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod budgets;
pub mod categories;
pub mod goals;
pub mod health;
pub mod transactions;

// Re-export all handlers for use in router
pub use analytics::*;
pub use budgets::*;
pub use categories::*;
pub use goals::*;
pub use health::*;
pub use transactions::*;
