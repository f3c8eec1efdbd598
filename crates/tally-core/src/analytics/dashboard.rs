//! Dashboard statistics: this month against last month

use chrono::NaiveDate;

use super::aggregate::{aggregate, AggregateFilter};
use super::period::{DateWindow, Period};
use super::ratio::{percentage, round2, sub};
use crate::error::Result;
use crate::models::{DashboardStats, Transaction, TransactionType};

/// Compose the dashboard figures for the month containing `today`
pub fn compute_dashboard_stats(
    transactions: &[Transaction],
    today: NaiveDate,
) -> Result<DashboardStats> {
    let this_month = Period::ThisMonth.window(today)?;
    let last_month = Period::LastMonth.window(today)?;

    let sum = |window: DateWindow, transaction_type: TransactionType| {
        aggregate(
            transactions,
            &AggregateFilter::new(window).transaction_type(transaction_type),
        )
        .map(|agg| agg.total)
    };

    let this_expenses = sum(this_month, TransactionType::Expense)?;
    let this_income = sum(this_month, TransactionType::Income)?;
    let last_expenses = sum(last_month, TransactionType::Expense)?;
    let last_income = sum(last_month, TransactionType::Income)?;

    let net = sub(this_income, this_expenses)?;

    Ok(DashboardStats {
        total_balance: round2(net),
        this_month_expenses: round2(this_expenses),
        this_month_income: round2(this_income),
        expense_change: percentage(sub(this_expenses, last_expenses)?, last_expenses)?,
        income_change: percentage(sub(this_income, last_income)?, last_income)?,
        savings_rate: percentage(net, this_income)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn tx(amount: Decimal, transaction_type: TransactionType, date: NaiveDate) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            amount,
            transaction_type,
            description: "tx".to_string(),
            category_id: None,
            date,
            is_fixed: false,
            tags: vec![],
            satisfaction_rating: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_month_over_month_changes() {
        let txs = vec![
            tx(dec!(400), TransactionType::Expense, d(2024, 2, 10)),
            tx(dec!(2000), TransactionType::Income, d(2024, 2, 1)),
            tx(dec!(500), TransactionType::Expense, d(2024, 3, 10)),
            tx(dec!(2500), TransactionType::Income, d(2024, 3, 1)),
        ];

        let stats = compute_dashboard_stats(&txs, d(2024, 3, 15)).unwrap();
        assert_eq!(stats.this_month_expenses, dec!(500));
        assert_eq!(stats.this_month_income, dec!(2500));
        assert_eq!(stats.total_balance, dec!(2000));
        assert_eq!(stats.expense_change, dec!(25));
        assert_eq!(stats.income_change, dec!(25));
        assert_eq!(stats.savings_rate, dec!(80));
    }

    #[test]
    fn test_no_income_means_zero_savings_rate() {
        let txs = vec![tx(dec!(500), TransactionType::Expense, d(2024, 3, 10))];

        let stats = compute_dashboard_stats(&txs, d(2024, 3, 15)).unwrap();
        assert_eq!(stats.savings_rate, Decimal::ZERO);
        assert_eq!(stats.total_balance, dec!(-500));
        // Nothing last month
        assert_eq!(stats.expense_change, Decimal::ZERO);
        assert_eq!(stats.income_change, Decimal::ZERO);
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = compute_dashboard_stats(&[], d(2024, 3, 15)).unwrap();
        assert_eq!(stats.total_balance, Decimal::ZERO);
        assert_eq!(stats.savings_rate, Decimal::ZERO);
    }

    #[test]
    fn test_overspending_gives_negative_savings_rate() {
        let txs = vec![
            tx(dec!(1500), TransactionType::Expense, d(2024, 3, 10)),
            tx(dec!(1000), TransactionType::Income, d(2024, 3, 1)),
        ];
        let stats = compute_dashboard_stats(&txs, d(2024, 3, 15)).unwrap();
        assert_eq!(stats.savings_rate, dec!(-50));
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let txs = vec![
            tx(huge, TransactionType::Expense, d(2024, 3, 5)),
            tx(huge, TransactionType::Expense, d(2024, 3, 6)),
        ];
        assert!(compute_dashboard_stats(&txs, d(2024, 3, 22)).is_err());
    }
}
