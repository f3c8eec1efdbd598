//! Dashboard and analytics report commands

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tally_core::db::Database;
use tally_core::{AnalyticsConfig, AnalyticsService};

use super::truncate;

/// Render a percent change with a direction marker
fn change_str(change: Decimal) -> String {
    if change > Decimal::ZERO {
        format!("▲ {:.2}%", change)
    } else if change < Decimal::ZERO {
        format!("▼ {:.2}%", change.abs())
    } else {
        "─ 0.00%".to_string()
    }
}

/// Fixed-width bar for a 0-100 percentage
fn bar(percentage: Decimal, width: usize) -> String {
    let filled = (percentage.min(Decimal::ONE_HUNDRED) * Decimal::from(width as u64)
        / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn cmd_dashboard(db: &Database, user_id: i64, today: NaiveDate, json: bool) -> Result<()> {
    let stats = AnalyticsService::new(db).compute_dashboard_stats(user_id, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Tally Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Month: {}", today.format("%B %Y"));
    println!();
    println!(
        "  💵 Income:    ${:>10.2}  {}",
        stats.this_month_income,
        change_str(stats.income_change)
    );
    println!(
        "  💸 Expenses:  ${:>10.2}  {}",
        stats.this_month_expenses,
        change_str(stats.expense_change)
    );
    println!("  ⚖️  Balance:   ${:>10.2}", stats.total_balance);
    println!();
    println!("  🐷 Savings rate: {:.2}%", stats.savings_rate);
    println!();

    Ok(())
}

pub fn cmd_report_categories(
    db: &Database,
    user_id: i64,
    period: &str,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let breakdown = AnalyticsService::new(db).compute_category_breakdown(user_id, period, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!();
    println!("📊 Spending by Category ({})", period);
    println!("   ─────────────────────────────────────────────────────────────");

    if breakdown.is_empty() {
        println!("   No expenses in this period.");
        return Ok(());
    }

    let total: Decimal = breakdown.iter().map(|row| row.amount).sum();
    for row in &breakdown {
        println!(
            "   {} {:<22} ${:>10.2}  {:>6.2}%  {}  ({} tx)",
            row.icon.as_deref().unwrap_or("  "),
            truncate(&row.category, 22),
            row.amount,
            row.percentage,
            bar(row.percentage, 20),
            row.transaction_count
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("      {:<22} ${:>10.2}", "Total", total);

    Ok(())
}

pub fn cmd_report_trends(
    db: &Database,
    user_id: i64,
    config: &AnalyticsConfig,
    months: Option<u32>,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let months = config.trend_months(months);
    let trends = AnalyticsService::new(db).compute_spending_trends(user_id, months, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&trends)?);
        return Ok(());
    }

    println!();
    println!("📈 Monthly Trends (last {} months)", months);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<8} {:>12} {:>12} {:>12}",
        "Month", "Income", "Expenses", "Net"
    );

    for trend in &trends {
        let net = if trend.net_savings < Decimal::ZERO {
            format!("\x1b[31m{:>12.2}\x1b[0m", trend.net_savings) // Red for deficit
        } else {
            format!("\x1b[32m{:>12.2}\x1b[0m", trend.net_savings)
        };
        println!(
            "   {:<8} {:>12.2} {:>12.2} {}",
            trend.month, trend.total_income, trend.total_expenses, net
        );
    }

    Ok(())
}
