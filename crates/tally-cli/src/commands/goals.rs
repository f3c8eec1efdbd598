//! Savings goal command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::analytics::goal_progress;
use tally_core::db::Database;
use tally_core::models::{GoalPriority, NewGoal};

use super::{parse_date, truncate};

pub fn cmd_goals_list(db: &Database, user_id: i64, today: NaiveDate) -> Result<()> {
    let goals = db.list_goals(user_id)?;

    if goals.is_empty() {
        println!("No goals yet. Create one with:");
        println!("  tally goals add \"Emergency fund\" 5000 --deadline 2025-12-31");
        return Ok(());
    }

    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    for goal in goals {
        let progress = goal_progress(&goal, today);
        let state = if progress.is_completed {
            "🏁 done".to_string()
        } else if progress.is_overdue {
            "⏰ overdue".to_string()
        } else {
            match progress.days_remaining {
                Some(days) => format!("{} days left", days),
                None => "no deadline".to_string(),
            }
        };

        println!(
            "   [{}] {:<24} ${:>9.2} / ${:<9.2} {:>6.2}%  {} ({})",
            goal.id,
            truncate(&goal.name, 24),
            goal.current_amount,
            goal.target_amount,
            progress.percentage,
            state,
            goal.priority.as_str()
        );
    }

    Ok(())
}

pub fn cmd_goals_add(
    db: &Database,
    user_id: i64,
    name: &str,
    target: Decimal,
    deadline: Option<&str>,
    priority: &str,
) -> Result<()> {
    let priority: GoalPriority = priority.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let deadline = deadline.map(|d| parse_date(d, "deadline")).transpose()?;

    let id = db
        .insert_goal(NewGoal {
            user_id,
            name: name.to_string(),
            target_amount: target,
            current_amount: Decimal::ZERO,
            deadline,
            priority,
        })
        .context("Failed to create goal")?;

    println!("✅ Created goal '{}' (id {}) targeting ${:.2}", name, id, target);

    Ok(())
}

pub fn cmd_goals_progress(
    db: &Database,
    user_id: i64,
    id: i64,
    amount: Decimal,
    today: NaiveDate,
) -> Result<()> {
    let goal = db
        .add_goal_progress(user_id, id, amount)
        .with_context(|| format!("Failed to update goal {}", id))?;
    let progress = goal_progress(&goal, today);

    println!(
        "💰 {}: ${:.2} of ${:.2} ({:.2}%)",
        goal.name, goal.current_amount, goal.target_amount, progress.percentage
    );
    if goal.is_completed {
        println!("🎉 Goal reached!");
    }

    Ok(())
}

pub fn cmd_goals_delete(db: &Database, user_id: i64, id: i64) -> Result<()> {
    if !db.delete_goal(user_id, id)? {
        anyhow::bail!("Goal {} not found", id);
    }

    println!("🗑️  Deleted goal {}", id);

    Ok(())
}
