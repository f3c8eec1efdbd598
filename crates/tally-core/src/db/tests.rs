//! Database tests

use super::*;
use crate::models::*;
use crate::store::FinanceStore;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn new_tx(user_id: i64, amount: Decimal, category_id: Option<i64>, date: NaiveDate) -> NewTransaction {
    NewTransaction {
        user_id,
        amount,
        transaction_type: TransactionType::Expense,
        description: "Groceries".to_string(),
        category_id,
        date,
        is_fixed: false,
        tags: vec!["weekly".to_string()],
        satisfaction_rating: Some(4),
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    let txs = db
        .list_transactions(1, &TransactionFilter::new(), None, 0)
        .unwrap();
    assert!(txs.is_empty());
}

#[test]
fn test_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'user_id', 'amount', 'type', 'category_id', 'date', 'is_fixed', 'tags')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 8, "transactions table should have 8 expected columns");

    for table in ["categories", "budgets", "goals"] {
        let exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(exists, 1, "{} table should exist", table);
    }
}

#[test]
fn test_transaction_roundtrip_keeps_decimal_precision() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_transaction(new_tx(1, dec!(19.99), Some(3), d(2024, 3, 5)))
        .unwrap();

    let tx = db.get_transaction(1, id).unwrap().unwrap();
    assert_eq!(tx.amount, dec!(19.99));
    assert_eq!(tx.category_id, Some(3));
    assert_eq!(tx.date, d(2024, 3, 5));
    assert_eq!(tx.tags, vec!["weekly".to_string()]);
    assert_eq!(tx.satisfaction_rating, Some(4));
    assert_eq!(tx.transaction_type, TransactionType::Expense);
}

#[test]
fn test_negative_amount_rejected() {
    let db = Database::in_memory().unwrap();
    let err = db
        .insert_transaction(new_tx(1, dec!(-5), None, d(2024, 3, 5)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_transactions_scoped_to_user() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_transaction(new_tx(1, dec!(10), None, d(2024, 3, 5)))
        .unwrap();
    db.insert_transaction(new_tx(2, dec!(20), None, d(2024, 3, 5)))
        .unwrap();

    assert!(db.get_transaction(2, id).unwrap().is_none());
    assert!(!db.delete_transaction(2, id).unwrap());
    assert_eq!(db.count_transactions(1, &TransactionFilter::new()).unwrap(), 1);
}

#[test]
fn test_filter_by_date_and_amount() {
    let db = Database::in_memory().unwrap();
    db.insert_transaction(new_tx(1, dec!(5), None, d(2024, 2, 28)))
        .unwrap();
    db.insert_transaction(new_tx(1, dec!(50), None, d(2024, 3, 1)))
        .unwrap();
    db.insert_transaction(new_tx(1, dec!(9.5), None, d(2024, 3, 31)))
        .unwrap();

    let march = TransactionFilter::new().date_range(Some((d(2024, 3, 1), d(2024, 3, 31))));
    let txs = db.list_transactions(1, &march, None, 0).unwrap();
    assert_eq!(txs.len(), 2);
    // Newest first
    assert_eq!(txs[0].date, d(2024, 3, 31));

    // 9.5 < 10 numerically even though "9.5" > "10" as text
    let big = march.clone().amount_range(Some(dec!(10)), None);
    let txs = db.list_transactions(1, &big, None, 0).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, dec!(50));
}

#[test]
fn test_list_pagination() {
    let db = Database::in_memory().unwrap();
    for day in 1..=5 {
        db.insert_transaction(new_tx(1, dec!(1), None, d(2024, 3, day)))
            .unwrap();
    }

    let page = db
        .list_transactions(1, &TransactionFilter::new(), Some(2), 2)
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].date, d(2024, 3, 3));
}

#[test]
fn test_update_transaction() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_transaction(new_tx(1, dec!(10), Some(1), d(2024, 3, 5)))
        .unwrap();

    let updated = db
        .update_transaction(
            1,
            id,
            &TransactionUpdate {
                amount: Some(dec!(12.345)),
                category_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.amount, dec!(12.35));
    assert_eq!(updated.category_id, None);

    let stored = db.get_transaction(1, id).unwrap().unwrap();
    assert_eq!(stored.amount, dec!(12.35));
    assert_eq!(stored.category_id, None);

    let missing = db.update_transaction(1, 999, &TransactionUpdate::default());
    assert!(matches!(missing, Err(Error::NotFound(_))));
}

#[test]
fn test_seed_default_categories_idempotent() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.seed_default_categories().unwrap(), DEFAULT_CATEGORIES.len());
    assert_eq!(db.seed_default_categories().unwrap(), 0);

    let categories = db.list_categories(1).unwrap();
    assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
    assert!(categories.iter().all(|c| c.user_id.is_none()));
}

#[test]
fn test_user_categories() {
    let db = Database::in_memory().unwrap();
    db.seed_default_categories().unwrap();

    let new = NewCategory {
        user_id: 1,
        name: "Coffee".to_string(),
        icon: Some("☕".to_string()),
        color: Some("#78350f".to_string()),
        category_type: TransactionType::Expense,
    };
    let id = db.insert_category(&new).unwrap();

    assert!(db.get_category(1, id).unwrap().is_some());
    assert!(db.get_category(2, id).unwrap().is_none());
    assert_eq!(db.list_categories(2).unwrap().len(), DEFAULT_CATEGORIES.len());

    // Same name twice is rejected
    assert!(matches!(
        db.insert_category(&new),
        Err(Error::InvalidInput(_))
    ));

    // System defaults are not deletable by users
    let system_id = db.list_categories(1).unwrap()[0].id;
    assert!(!db.delete_category(1, system_id).unwrap());
    assert!(db.delete_category(1, id).unwrap());
}

#[test]
fn test_budget_crud() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_budget(
            NewBudget {
                user_id: 1,
                name: "Food".to_string(),
                category_id: Some(1),
                amount: dec!(200),
                period: BudgetPeriod::Monthly,
                start_date: d(2024, 3, 1),
                alert_threshold: None,
            },
            DEFAULT_ALERT_THRESHOLD,
        )
        .unwrap();

    let budget = db.get_budget(1, id).unwrap().unwrap();
    assert_eq!(budget.amount, dec!(200));
    assert_eq!(budget.alert_threshold, dec!(0.80));
    assert_eq!(budget.period, BudgetPeriod::Monthly);
    assert!(budget.is_active);

    assert!(db.set_budget_active(1, id, false).unwrap());
    assert!(!db.get_budget(1, id).unwrap().unwrap().is_active);

    assert_eq!(db.fetch_budgets(1).unwrap().len(), 1);
    assert!(db.delete_budget(1, id).unwrap());
    assert!(db.list_budgets(1).unwrap().is_empty());
}

#[test]
fn test_goal_progress_marks_complete() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_goal(NewGoal {
            user_id: 1,
            name: "Vacation".to_string(),
            target_amount: dec!(1000),
            current_amount: dec!(0),
            deadline: Some(d(2024, 12, 31)),
            priority: GoalPriority::High,
        })
        .unwrap();

    let goal = db.add_goal_progress(1, id, dec!(600)).unwrap();
    assert_eq!(goal.current_amount, dec!(600));
    assert!(!goal.is_completed);

    let goal = db.add_goal_progress(1, id, dec!(400)).unwrap();
    assert!(goal.is_completed);
    assert!(db.get_goal(1, id).unwrap().unwrap().is_completed);

    assert!(db.add_goal_progress(1, id, dec!(-1)).is_err());
    assert!(matches!(
        db.add_goal_progress(2, id, dec!(1)),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_malformed_decimal_surfaces_error() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO transactions (user_id, amount, type, description, date) VALUES (1, 'abc', 'expense', 'bad', '2024-03-01')",
        [],
    )
    .unwrap();

    let result = db.list_transactions(1, &TransactionFilter::new(), None, 0);
    assert!(matches!(result, Err(Error::Database(_))));
}

#[test]
fn test_delete_user_data() {
    let db = Database::in_memory().unwrap();
    db.seed_default_categories().unwrap();
    db.insert_transaction(new_tx(1, dec!(10), None, d(2024, 3, 5)))
        .unwrap();
    db.insert_transaction(new_tx(2, dec!(10), None, d(2024, 3, 5)))
        .unwrap();

    db.delete_user_data(1).unwrap();

    assert_eq!(db.count_transactions(1, &TransactionFilter::new()).unwrap(), 0);
    assert_eq!(db.count_transactions(2, &TransactionFilter::new()).unwrap(), 1);
    // System categories survive
    assert_eq!(db.list_categories(1).unwrap().len(), DEFAULT_CATEGORIES.len());
}
