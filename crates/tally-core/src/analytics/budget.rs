//! Budget evaluation: spent vs allotted over the budget's cycle from its start date

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::aggregate::{aggregate, AggregateFilter};
use super::period::budget_window;
use super::ratio::{raw_percentage, round2, sub};
use crate::error::Result;
use crate::models::{Budget, BudgetProgress, BudgetStatus, Transaction, TransactionType};

/// Evaluate a budget against a transaction snapshot
///
/// Only expenses inside the budget's cycle count, narrowed to the budget's
/// category when it has one. A cycle that starts after `today` reports zero
/// spend.
pub fn evaluate_budget(
    budget: &Budget,
    transactions: &[Transaction],
    today: NaiveDate,
) -> Result<BudgetProgress> {
    let window = budget_window(budget.period, budget.start_date)?;

    let spent = if window.start > today {
        Decimal::ZERO
    } else {
        let filter = AggregateFilter::new(window)
            .transaction_type(TransactionType::Expense)
            .category_id(budget.category_id);
        aggregate(transactions, &filter)?.total
    };

    let raw = raw_percentage(spent, budget.amount)?;

    Ok(BudgetProgress {
        spent,
        percentage: round2(raw),
        remaining: sub(budget.amount, spent)?,
        status: classify(raw, budget.alert_threshold),
        period_start: window.start,
        period_end: window.end,
    })
}

/// Status for an unrounded 0-100 percentage and a 0-1 alert threshold
pub fn classify(percentage: Decimal, alert_threshold: Decimal) -> BudgetStatus {
    if percentage >= Decimal::ONE_HUNDRED {
        BudgetStatus::OverBudget
    } else if percentage >= alert_threshold * Decimal::ONE_HUNDRED {
        BudgetStatus::Warning
    } else {
        BudgetStatus::OnTrack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetPeriod;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn budget(amount: Decimal, category_id: Option<i64>) -> Budget {
        Budget {
            id: 1,
            user_id: 1,
            name: "Groceries".to_string(),
            category_id,
            amount,
            period: BudgetPeriod::Monthly,
            start_date: d(2024, 3, 1),
            is_active: true,
            alert_threshold: dec!(0.8),
            created_at: Utc::now(),
        }
    }

    fn expense(amount: Decimal, category_id: Option<i64>, date: NaiveDate) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            amount,
            transaction_type: TransactionType::Expense,
            description: "spend".to_string(),
            category_id,
            date,
            is_fixed: false,
            tags: vec![],
            satisfaction_rating: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_warning_at_ninety_percent() {
        let txs = vec![expense(dec!(180), Some(1), d(2024, 3, 10))];
        let progress = evaluate_budget(&budget(dec!(200), Some(1)), &txs, d(2024, 3, 20)).unwrap();

        assert_eq!(progress.spent, dec!(180));
        assert_eq!(progress.percentage, dec!(90));
        assert_eq!(progress.remaining, dec!(20));
        assert_eq!(progress.status, BudgetStatus::Warning);
        assert_eq!(progress.period_start, d(2024, 3, 1));
        assert_eq!(progress.period_end, d(2024, 4, 1));
    }

    #[test]
    fn test_over_budget_has_negative_remaining() {
        let txs = vec![
            expense(dec!(200), Some(1), d(2024, 3, 10)),
            expense(dec!(20), Some(1), d(2024, 3, 11)),
        ];
        let progress = evaluate_budget(&budget(dec!(200), Some(1)), &txs, d(2024, 3, 20)).unwrap();

        assert_eq!(progress.status, BudgetStatus::OverBudget);
        assert_eq!(progress.remaining, dec!(-20));
        assert_eq!(progress.percentage, dec!(110));
    }

    #[test]
    fn test_category_and_window_narrowing() {
        let txs = vec![
            expense(dec!(50), Some(1), d(2024, 3, 10)),
            expense(dec!(70), Some(2), d(2024, 3, 10)),
            expense(dec!(90), Some(1), d(2024, 4, 1)),
        ];
        let progress = evaluate_budget(&budget(dec!(200), Some(1)), &txs, d(2024, 3, 20)).unwrap();
        assert_eq!(progress.spent, dec!(50));
        assert_eq!(progress.status, BudgetStatus::OnTrack);

        let all = evaluate_budget(&budget(dec!(200), None), &txs, d(2024, 3, 20)).unwrap();
        assert_eq!(all.spent, dec!(120));
    }

    #[test]
    fn test_zero_amount_budget() {
        let txs = vec![expense(dec!(5), None, d(2024, 3, 10))];
        let progress = evaluate_budget(&budget(Decimal::ZERO, None), &txs, d(2024, 3, 20)).unwrap();
        assert_eq!(progress.percentage, Decimal::ZERO);
        assert_eq!(progress.status, BudgetStatus::OnTrack);
    }

    #[test]
    fn test_future_budget_reports_no_spend() {
        let txs = vec![expense(dec!(5), None, d(2024, 3, 10))];
        let progress = evaluate_budget(&budget(dec!(100), None), &txs, d(2024, 2, 1)).unwrap();
        assert_eq!(progress.spent, Decimal::ZERO);
        assert_eq!(progress.remaining, dec!(100));
    }

    #[test]
    fn test_overflowing_spend_is_an_error() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let txs = vec![expense(huge, Some(1), d(2024, 3, 10))];
        let result = evaluate_budget(&budget(dec!(1), Some(1)), &txs, d(2024, 3, 20));
        assert!(matches!(result, Err(crate::Error::InvalidInput(_))));
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(dec!(100), dec!(0.8)), BudgetStatus::OverBudget);
        assert_eq!(classify(dec!(80), dec!(0.8)), BudgetStatus::Warning);
        assert_eq!(classify(dec!(79.999), dec!(0.8)), BudgetStatus::OnTrack);
        // Rounding would show 100.00 but the budget is not yet exhausted
        assert_eq!(classify(dec!(99.999), dec!(0.8)), BudgetStatus::Warning);
    }
}
