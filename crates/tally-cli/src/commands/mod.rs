//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budgets` - Budget commands (list with progress, add, pause, resume, delete)
//! - `categories` - Category commands (list, add, delete)
//! - `core` - Core commands (init, reset) and shared utilities (open_db, dates)
//! - `goals` - Savings goal commands (list, add, progress, delete)
//! - `reports` - Dashboard and analytics reports
//! - `serve` - Web server command
//! - `transactions` - Transaction commands (list, add, delete)

pub mod budgets;
pub mod categories;
pub mod core;
pub mod goals;
pub mod reports;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use budgets::*;
pub use categories::*;
pub use core::*;
pub use goals::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
