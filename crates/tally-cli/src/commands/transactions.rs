//! Transaction command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::analytics::resolve_period;
use tally_core::db::{Database, TransactionFilter};
use tally_core::models::{NewTransaction, TransactionType};

use super::{parse_date, truncate};

/// Arguments for `tally transactions add`
pub struct NewTransactionArgs {
    pub amount: Decimal,
    pub description: String,
    pub transaction_type: String,
    pub category: Option<i64>,
    pub date: Option<String>,
    pub fixed: bool,
    pub tags: Vec<String>,
}

fn parse_type(value: &str) -> Result<TransactionType> {
    value
        .parse::<TransactionType>()
        .map_err(|e: String| anyhow::anyhow!(e))
}

pub fn cmd_transactions_list(
    db: &Database,
    user_id: i64,
    limit: i64,
    period: Option<&str>,
    transaction_type: Option<&str>,
    search: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let date_range = period
        .map(|p| resolve_period(p, today))
        .transpose()?
        .map(|window| (window.start, window.last_day()));
    let transaction_type = transaction_type.map(parse_type).transpose()?;

    let filter = TransactionFilter::new()
        .date_range(date_range)
        .transaction_type(transaction_type)
        .search(search);
    let transactions = db.list_transactions(user_id, &filter, Some(limit.max(1)), 0)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  tally transactions add 12.50 \"Lunch\"");
        return Ok(());
    }

    let total = db.count_transactions(user_id, &filter)?;

    println!();
    println!("📝 Transactions ({} of {})", transactions.len(), total);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.transaction_type {
            TransactionType::Expense => format!("\x1b[31m-${:.2}\x1b[0m", tx.amount), // Red for expenses
            TransactionType::Income => format!("\x1b[32m+${:.2}\x1b[0m", tx.amount), // Green for income
        };
        let fixed = if tx.is_fixed { " 📌" } else { "" };

        println!(
            "   [{}] {} │ {:>10} │ {}{}",
            tx.id,
            tx.date,
            amount_str,
            truncate(&tx.description, 40),
            fixed
        );
    }

    Ok(())
}

pub fn cmd_transactions_add(
    db: &Database,
    user_id: i64,
    args: NewTransactionArgs,
    today: NaiveDate,
) -> Result<()> {
    let date = args
        .date
        .as_deref()
        .map(|d| parse_date(d, "date"))
        .transpose()?
        .unwrap_or(today);

    if let Some(category_id) = args.category {
        db.get_category(user_id, category_id)?
            .ok_or_else(|| anyhow::anyhow!("Category {} not found", category_id))?;
    }

    let id = db
        .insert_transaction(NewTransaction {
            user_id,
            amount: args.amount,
            transaction_type: parse_type(&args.transaction_type)?,
            description: args.description,
            category_id: args.category,
            date,
            is_fixed: args.fixed,
            tags: args.tags,
            satisfaction_rating: None,
        })
        .context("Failed to record transaction")?;

    println!("✅ Recorded transaction {} on {}", id, date);

    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, user_id: i64, id: i64) -> Result<()> {
    if !db.delete_transaction(user_id, id)? {
        anyhow::bail!("Transaction {} not found", id);
    }

    println!("🗑️  Deleted transaction {}", id);

    Ok(())
}
