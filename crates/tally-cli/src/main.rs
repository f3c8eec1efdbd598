//! Tally CLI - Personal finance tracker
//!
//! Usage:
//!   tally init                      Initialize database
//!   tally transactions add 12.50 Lunch --category 1
//!   tally report categories         Expense breakdown for this month
//!   tally serve --port 3000         Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tally_core::AnalyticsConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let user = cli.user;
    let today = commands::today();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve { port, host } => commands::cmd_serve(&cli.db, &host, port).await,
        Commands::Dashboard => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_dashboard(&db, user, today, cli.json)
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db)?;
            match report_type {
                ReportType::Categories { period } => {
                    commands::cmd_report_categories(&db, user, &period, today, cli.json)
                }
                ReportType::Trends { months } => {
                    let config = AnalyticsConfig::load()?;
                    commands::cmd_report_trends(&db, user, &config, months, today, cli.json)
                }
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_transactions_list(&db, user, 20, None, None, None, today),
                Some(TransactionsAction::List {
                    limit,
                    period,
                    transaction_type,
                    search,
                }) => commands::cmd_transactions_list(
                    &db,
                    user,
                    limit,
                    period.as_deref(),
                    transaction_type.as_deref(),
                    search.as_deref(),
                    today,
                ),
                Some(TransactionsAction::Add {
                    amount,
                    description,
                    transaction_type,
                    category,
                    date,
                    fixed,
                    tags,
                }) => commands::cmd_transactions_add(
                    &db,
                    user,
                    commands::NewTransactionArgs {
                        amount,
                        description,
                        transaction_type,
                        category,
                        date,
                        fixed,
                        tags,
                    },
                    today,
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, user, id)
                }
            }
        }
        Commands::Categories { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(CategoriesAction::List) => commands::cmd_categories_list(&db, user),
                Some(CategoriesAction::Add {
                    name,
                    category_type,
                    icon,
                    color,
                }) => commands::cmd_categories_add(
                    &db,
                    user,
                    &name,
                    &category_type,
                    icon.as_deref(),
                    color.as_deref(),
                ),
                Some(CategoriesAction::Delete { id }) => {
                    commands::cmd_categories_delete(&db, user, id)
                }
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(BudgetsAction::List) => {
                    commands::cmd_budgets_list(&db, user, today, cli.json)
                }
                Some(BudgetsAction::Add {
                    name,
                    amount,
                    period,
                    category,
                    start,
                    threshold,
                }) => {
                    let config = AnalyticsConfig::load()?;
                    commands::cmd_budgets_add(
                        &db,
                        user,
                        &config,
                        commands::NewBudgetArgs {
                            name,
                            amount,
                            period,
                            category,
                            start,
                            threshold,
                        },
                        today,
                    )
                }
                Some(BudgetsAction::Pause { id }) => {
                    commands::cmd_budgets_set_active(&db, user, id, false)
                }
                Some(BudgetsAction::Resume { id }) => {
                    commands::cmd_budgets_set_active(&db, user, id, true)
                }
                Some(BudgetsAction::Delete { id }) => commands::cmd_budgets_delete(&db, user, id),
            }
        }
        Commands::Goals { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&db, user, today),
                Some(GoalsAction::Add {
                    name,
                    target,
                    deadline,
                    priority,
                }) => commands::cmd_goals_add(
                    &db,
                    user,
                    &name,
                    target,
                    deadline.as_deref(),
                    &priority,
                ),
                Some(GoalsAction::Progress { id, amount }) => {
                    commands::cmd_goals_progress(&db, user, id, amount, today)
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&db, user, id),
            }
        }
        Commands::Reset { yes } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_reset(&db, user, yes)
        }
    }
}
