//! Tally Core Library
//!
//! Shared functionality for the Tally personal finance tracker:
//! - Domain models for transactions, categories, budgets and goals
//! - Analytics engine (period windows, aggregation, budget evaluation,
//!   dashboard statistics, goal progress)
//! - Data-access trait consumed by the engine, with a pooled SQLite implementation
//! - Analytics configuration with a file override

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use analytics::{AnalyticsService, DateWindow, Period};
pub use config::AnalyticsConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use store::FinanceStore;
