//! Aggregation over transaction snapshots
//!
//! Filtered sums, spending grouped by category and month-by-month trends.
//! All functions are pure over borrowed slices.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::period::{add_months, month_start, DateWindow};
use super::ratio::{add, percentage, sub};
use crate::error::{Error, Result};
use crate::models::{Category, CategoryBreakdown, MonthlyTrend, Transaction, TransactionType};

/// Label for transactions whose category is missing or no longer exists
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Neutral gray used for the uncategorized row
pub const UNCATEGORIZED_COLOR: &str = "#9ca3af";

/// Conjunction of predicates selecting the transactions to sum
#[derive(Debug, Clone, Copy)]
pub struct AggregateFilter {
    pub window: DateWindow,
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<i64>,
    pub fixed_only: bool,
}

impl AggregateFilter {
    /// Match every transaction dated inside `window`
    pub fn new(window: DateWindow) -> Self {
        Self {
            window,
            transaction_type: None,
            category_id: None,
            fixed_only: false,
        }
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    /// Restrict to one category (None leaves the filter open)
    pub fn category_id(mut self, id: Option<i64>) -> Self {
        self.category_id = id;
        self
    }

    pub fn fixed_only(mut self, value: bool) -> Self {
        self.fixed_only = value;
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.window.contains(tx.date)
            && self
                .transaction_type
                .map_or(true, |t| tx.transaction_type == t)
            && self
                .category_id
                .map_or(true, |id| tx.category_id == Some(id))
            && (!self.fixed_only || tx.is_fixed)
    }
}

/// Sum and count of the transactions a filter selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub total: Decimal,
    pub count: i64,
}

/// Sum the transactions matching `filter`
pub fn aggregate(transactions: &[Transaction], filter: &AggregateFilter) -> Result<Aggregate> {
    transactions
        .iter()
        .filter(|tx| filter.matches(tx))
        .try_fold(Aggregate::default(), |mut acc, tx| {
            acc.total = add(acc.total, tx.amount)?;
            acc.count += 1;
            Ok(acc)
        })
}

/// Expense spending in `window` grouped by category
///
/// Transactions with no category, or a category id missing from
/// `categories`, are merged into a single "Uncategorized" row. Rows are
/// sorted by amount descending, then by name.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    window: DateWindow,
) -> Result<Vec<CategoryBreakdown>> {
    let by_id: HashMap<i64, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let filter = AggregateFilter::new(window).transaction_type(TransactionType::Expense);

    let mut groups: HashMap<Option<i64>, Aggregate> = HashMap::new();
    let mut total = Decimal::ZERO;

    for tx in transactions.iter().filter(|tx| filter.matches(tx)) {
        let key = tx.category_id.filter(|id| by_id.contains_key(id));
        let entry = groups.entry(key).or_default();
        entry.total = add(entry.total, tx.amount)?;
        entry.count += 1;
        total = add(total, tx.amount)?;
    }

    let mut rows = groups
        .into_iter()
        .map(|(key, agg)| {
            let category = key.and_then(|id| by_id.get(&id).copied());
            Ok(CategoryBreakdown {
                category_id: key,
                category: category
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
                icon: category.and_then(|c| c.icon.clone()),
                color: category
                    .and_then(|c| c.color.clone())
                    .unwrap_or_else(|| UNCATEGORIZED_COLOR.to_string()),
                amount: agg.total,
                percentage: percentage(agg.total, total)?,
                transaction_count: agg.count,
            })
        })
        .collect::<Result<Vec<CategoryBreakdown>>>()?;

    rows.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(rows)
}

/// Income and expense totals for the `months` calendar months ending with
/// the month containing `today`, oldest first
///
/// Months without activity are included with zero sums.
pub fn monthly_trends(
    transactions: &[Transaction],
    months: u32,
    today: NaiveDate,
) -> Result<Vec<MonthlyTrend>> {
    if months == 0 {
        return Ok(Vec::new());
    }

    let span = i32::try_from(months)
        .map_err(|_| Error::InvalidInput(format!("months out of range: {}", months)))?;
    let first = add_months(month_start(today), 1 - span)?;
    let first_index = month_index(first);

    let mut buckets: Vec<(Decimal, Decimal)> = vec![(Decimal::ZERO, Decimal::ZERO); months as usize];
    for tx in transactions {
        let offset = month_index(tx.date) - first_index;
        if offset < 0 || offset >= i64::from(months) {
            continue;
        }
        let bucket = &mut buckets[offset as usize];
        match tx.transaction_type {
            TransactionType::Expense => bucket.0 = add(bucket.0, tx.amount)?,
            TransactionType::Income => bucket.1 = add(bucket.1, tx.amount)?,
        }
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(i, (expenses, income))| {
            let month = add_months(first, i as i32)?;
            Ok(MonthlyTrend {
                month: month.format("%Y-%m").to_string(),
                total_expenses: expenses,
                total_income: income,
                net_savings: sub(income, expenses)?,
            })
        })
        .collect()
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}
