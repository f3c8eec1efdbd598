//! Budget command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::db::Database;
use tally_core::models::{BudgetPeriod, BudgetStatus, NewBudget};
use tally_core::{AnalyticsConfig, AnalyticsService};

use super::{parse_date, truncate};

/// Arguments for `tally budgets add`
pub struct NewBudgetArgs {
    pub name: String,
    pub amount: Decimal,
    pub period: String,
    pub category: Option<i64>,
    pub start: Option<String>,
    pub threshold: Option<Decimal>,
}

fn status_badge(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::OnTrack => "✅ on track",
        BudgetStatus::Warning => "⚠️  warning",
        BudgetStatus::OverBudget => "🚨 over budget",
    }
}

pub fn cmd_budgets_list(db: &Database, user_id: i64, today: NaiveDate, json: bool) -> Result<()> {
    let overview = AnalyticsService::new(db).budget_overview(user_id, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    if overview.is_empty() {
        println!("No active budgets. Create one with:");
        println!("  tally budgets add Groceries 400 --period monthly");
        return Ok(());
    }

    println!();
    println!("💼 Budgets");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in overview {
        let budget = &entry.budget;
        let progress = &entry.progress;
        println!(
            "   [{}] {:<20} ${:>9.2} / ${:<9.2} {:>7.2}%  {}",
            budget.id,
            truncate(&budget.name, 20),
            progress.spent,
            budget.amount,
            progress.percentage,
            status_badge(progress.status)
        );
        println!(
            "        {} cycle {} to {}, ${:.2} remaining",
            budget.period,
            progress.period_start,
            progress.period_end,
            progress.remaining
        );
    }

    Ok(())
}

pub fn cmd_budgets_add(
    db: &Database,
    user_id: i64,
    config: &AnalyticsConfig,
    args: NewBudgetArgs,
    today: NaiveDate,
) -> Result<()> {
    let period: BudgetPeriod = args.period.parse()?;
    let start_date = args
        .start
        .as_deref()
        .map(|d| parse_date(d, "start"))
        .transpose()?
        .unwrap_or(today);

    let id = db
        .insert_budget(
            NewBudget {
                user_id,
                name: args.name.clone(),
                category_id: args.category,
                amount: args.amount,
                period,
                start_date,
                alert_threshold: args.threshold,
            },
            config.default_alert_threshold,
        )
        .context("Failed to create budget")?;

    println!(
        "✅ Created {} budget '{}' (id {}) starting {}",
        period, args.name, id, start_date
    );

    Ok(())
}

pub fn cmd_budgets_set_active(db: &Database, user_id: i64, id: i64, active: bool) -> Result<()> {
    if !db.set_budget_active(user_id, id, active)? {
        anyhow::bail!("Budget {} not found", id);
    }

    if active {
        println!("▶️  Resumed budget {}", id);
    } else {
        println!("⏸️  Paused budget {}", id);
    }

    Ok(())
}

pub fn cmd_budgets_delete(db: &Database, user_id: i64, id: i64) -> Result<()> {
    if !db.delete_budget(user_id, id)? {
        anyhow::bail!("Budget {} not found", id);
    }

    println!("🗑️  Deleted budget {}", id);

    Ok(())
}
