//! Savings goal progress

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ratio::percentage;
use crate::models::{Goal, GoalProgress};

pub fn goal_progress(goal: &Goal, today: NaiveDate) -> GoalProgress {
    let is_completed = goal.is_completed || goal.current_amount >= goal.target_amount;
    let days_remaining = goal.deadline.map(|deadline| (deadline - today).num_days());

    // A reached target reports 100 without dividing.
    let reached = !goal.target_amount.is_zero() && goal.current_amount >= goal.target_amount;
    let progress = if reached {
        Decimal::ONE_HUNDRED
    } else {
        percentage(goal.current_amount, goal.target_amount)
            .map(|p| p.min(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    };

    GoalProgress {
        percentage: progress,
        remaining: goal
            .target_amount
            .checked_sub(goal.current_amount)
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO),
        is_completed,
        days_remaining,
        is_overdue: !is_completed && days_remaining.is_some_and(|days| days < 0),
    }
}
