//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// Tally - Personal finance tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal finance tracking and spending analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// User id to act as
    #[arg(long, default_value = "1", global = true)]
    pub user: i64,

    /// Print report output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed default categories
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Show this month's dashboard figures
    Dashboard,

    /// Generate spending reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Manage transactions (list, add, delete)
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage categories (list, add, delete)
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage budgets (list, add, pause, resume, delete)
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Manage savings goals (list, add, progress, delete)
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Delete every record belonging to the current user
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Expense breakdown by category
    Categories {
        /// Time period: thisMonth, lastMonth, thisYear
        #[arg(long, default_value = "thisMonth")]
        period: String,
    },

    /// Monthly income/expense trends
    Trends {
        /// Number of months to include (defaults to the configured window)
        #[arg(long)]
        months: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List recent transactions
    List {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Restrict to a period: thisMonth, lastMonth, thisYear
        #[arg(long)]
        period: Option<String>,

        /// Only expense or income
        #[arg(long = "type")]
        transaction_type: Option<String>,

        /// Search descriptions
        #[arg(long)]
        search: Option<String>,
    },

    /// Record a transaction
    Add {
        /// Amount (non-negative; the type carries the direction)
        amount: Decimal,

        /// Description
        description: String,

        /// expense or income
        #[arg(long = "type", default_value = "expense")]
        transaction_type: String,

        /// Category id
        #[arg(long)]
        category: Option<i64>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Mark as a fixed (recurring) cost
        #[arg(long)]
        fixed: bool,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories
    List,

    /// Add a category
    Add {
        /// Category name
        name: String,

        /// expense or income
        #[arg(long = "type", default_value = "expense")]
        category_type: String,

        /// Icon (emoji)
        #[arg(long)]
        icon: Option<String>,

        /// Color (hex, e.g. #ff0000)
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete one of your categories (its transactions become uncategorized)
    Delete {
        /// Category ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List active budgets with their progress
    List,

    /// Create a budget
    Add {
        /// Budget name
        name: String,

        /// Amount allotted per cycle
        amount: Decimal,

        /// Cycle: weekly, monthly, yearly
        #[arg(long, default_value = "monthly")]
        period: String,

        /// Restrict to one category (omit for all expenses)
        #[arg(long)]
        category: Option<i64>,

        /// First day of the first cycle (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,

        /// Alert threshold as a fraction in [0, 1] (defaults to the configured value)
        #[arg(long)]
        threshold: Option<Decimal>,
    },

    /// Stop tracking a budget without deleting it
    Pause {
        /// Budget ID
        id: i64,
    },

    /// Resume tracking a paused budget
    Resume {
        /// Budget ID
        id: i64,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with their progress
    List,

    /// Create a savings goal
    Add {
        /// Goal name
        name: String,

        /// Target amount
        target: Decimal,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,

        /// Priority: low, medium, high
        #[arg(long, default_value = "medium")]
        priority: String,
    },

    /// Add a contribution to a goal
    Progress {
        /// Goal ID
        id: i64,

        /// Amount saved
        amount: Decimal,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: i64,
    },
}
