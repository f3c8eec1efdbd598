//! End-to-end analytics over the SQLite store

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tally_core::analytics::goal_progress;
use tally_core::models::{
    BudgetPeriod, BudgetStatus, NewBudget, NewCategory, NewGoal, NewTransaction, TransactionType,
    DEFAULT_ALERT_THRESHOLD,
};
use tally_core::{AnalyticsService, Database, Error};

const USER: i64 = 1;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn add(
    db: &Database,
    amount: Decimal,
    transaction_type: TransactionType,
    category_id: Option<i64>,
    date: NaiveDate,
) {
    db.insert_transaction(NewTransaction {
        user_id: USER,
        amount,
        transaction_type,
        description: format!("{} on {}", transaction_type, date),
        category_id,
        date,
        is_fixed: false,
        tags: vec![],
        satisfaction_rating: None,
    })
    .unwrap();
}

fn category(db: &Database, name: &str) -> i64 {
    db.insert_category(&NewCategory {
        user_id: USER,
        name: name.to_string(),
        icon: None,
        color: Some("#000000".to_string()),
        category_type: TransactionType::Expense,
    })
    .unwrap()
}

#[test]
fn test_category_breakdown_scenario() {
    let db = Database::in_memory().unwrap();
    let food = category(&db, "Food");
    let transport = category(&db, "Transport");

    add(&db, dec!(100), TransactionType::Expense, Some(food), d(2024, 3, 3));
    add(&db, dec!(50), TransactionType::Expense, Some(food), d(2024, 3, 12));
    add(&db, dec!(30), TransactionType::Expense, Some(transport), d(2024, 3, 20));
    // Last month and income are excluded
    add(&db, dec!(999), TransactionType::Expense, Some(food), d(2024, 2, 29));
    add(&db, dec!(2000), TransactionType::Income, None, d(2024, 3, 1));

    let rows = AnalyticsService::new(&db)
        .compute_category_breakdown(USER, "thisMonth", d(2024, 3, 25))
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].amount, dec!(150));
    assert_eq!(rows[0].percentage, dec!(83.33));
    assert_eq!(rows[1].category, "Transport");
    assert_eq!(rows[1].amount, dec!(30));
    assert_eq!(rows[1].percentage, dec!(16.67));
}

#[test]
fn test_deleted_category_becomes_uncategorized() {
    let db = Database::in_memory().unwrap();
    let food = category(&db, "Food");
    add(&db, dec!(40), TransactionType::Expense, Some(food), d(2024, 3, 3));
    add(&db, dec!(10), TransactionType::Expense, None, d(2024, 3, 4));

    assert!(db.delete_category(USER, food).unwrap());

    let rows = AnalyticsService::new(&db)
        .compute_category_breakdown(USER, "thisMonth", d(2024, 3, 25))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Uncategorized");
    assert_eq!(rows[0].amount, dec!(50));
    assert_eq!(rows[0].transaction_count, 2);
}

#[test]
fn test_invalid_period_propagates() {
    let db = Database::in_memory().unwrap();
    let err = AnalyticsService::new(&db)
        .compute_category_breakdown(USER, "lastWeek", d(2024, 3, 25))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPeriod(_)));
}

fn food_budget(db: &Database) -> i64 {
    let food = category(db, "Food");
    let budget_id = db
        .insert_budget(
            NewBudget {
                user_id: USER,
                name: "Food".to_string(),
                category_id: Some(food),
                amount: dec!(200),
                period: BudgetPeriod::Monthly,
                start_date: d(2024, 3, 1),
                alert_threshold: Some(dec!(0.8)),
            },
            DEFAULT_ALERT_THRESHOLD,
        )
        .unwrap();
    add(db, dec!(180), TransactionType::Expense, Some(food), d(2024, 3, 10));
    budget_id
}

#[test]
fn test_budget_warning_scenario() {
    let db = Database::in_memory().unwrap();
    let id = food_budget(&db);
    let budget = db.get_budget(USER, id).unwrap().unwrap();

    let progress = AnalyticsService::new(&db)
        .evaluate_budget(&budget, d(2024, 3, 20))
        .unwrap();
    assert_eq!(progress.spent, dec!(180));
    assert_eq!(progress.percentage, dec!(90));
    assert_eq!(progress.status, BudgetStatus::Warning);
}

#[test]
fn test_budget_over_scenario() {
    let db = Database::in_memory().unwrap();
    let id = food_budget(&db);
    let budget = db.get_budget(USER, id).unwrap().unwrap();
    add(&db, dec!(40), TransactionType::Expense, budget.category_id, d(2024, 3, 15));

    let progress = AnalyticsService::new(&db)
        .evaluate_budget(&budget, d(2024, 3, 20))
        .unwrap();
    assert_eq!(progress.spent, dec!(220));
    assert_eq!(progress.status, BudgetStatus::OverBudget);
    assert_eq!(progress.remaining, dec!(-20));
}

#[test]
fn test_budget_overview() {
    let db = Database::in_memory().unwrap();
    let id = food_budget(&db);

    let overview = AnalyticsService::new(&db)
        .budget_overview(USER, d(2024, 3, 20))
        .unwrap();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].budget.id, id);

    db.set_budget_active(USER, id, false).unwrap();
    let overview = AnalyticsService::new(&db)
        .budget_overview(USER, d(2024, 3, 20))
        .unwrap();
    assert!(overview.is_empty());
}

#[test]
fn test_zero_income_savings_rate() {
    let db = Database::in_memory().unwrap();
    add(&db, dec!(500), TransactionType::Expense, None, d(2024, 3, 10));

    let stats = AnalyticsService::new(&db)
        .compute_dashboard_stats(USER, d(2024, 3, 20))
        .unwrap();
    assert_eq!(stats.this_month_income, Decimal::ZERO);
    assert_eq!(stats.this_month_expenses, dec!(500));
    assert_eq!(stats.savings_rate, Decimal::ZERO);
    assert_eq!(stats.expense_change, Decimal::ZERO);
}

#[test]
fn test_dashboard_month_over_month() {
    let db = Database::in_memory().unwrap();
    add(&db, dec!(200), TransactionType::Expense, None, d(2024, 2, 10));
    add(&db, dec!(150), TransactionType::Expense, None, d(2024, 3, 10));
    add(&db, dec!(1000), TransactionType::Income, None, d(2024, 3, 1));
    // Two months back; outside both windows
    add(&db, dec!(5000), TransactionType::Income, None, d(2024, 1, 31));

    let stats = AnalyticsService::new(&db)
        .compute_dashboard_stats(USER, d(2024, 3, 20))
        .unwrap();
    assert_eq!(stats.expense_change, dec!(-25));
    assert_eq!(stats.income_change, Decimal::ZERO);
    assert_eq!(stats.total_balance, dec!(850));
    assert_eq!(stats.savings_rate, dec!(85));
}

#[test]
fn test_spending_trends_backfilled() {
    let db = Database::in_memory().unwrap();
    add(&db, dec!(100), TransactionType::Expense, None, d(2023, 11, 5));
    add(&db, dec!(300), TransactionType::Income, None, d(2024, 1, 5));

    let trends = AnalyticsService::new(&db)
        .compute_spending_trends(USER, 6, d(2024, 3, 20))
        .unwrap();

    let months: Vec<&str> = trends.iter().map(|t| t.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]
    );
    assert_eq!(trends[1].total_expenses, dec!(100));
    assert_eq!(trends[2].total_expenses, Decimal::ZERO);
    assert_eq!(trends[3].net_savings, dec!(300));
}

#[test]
fn test_goal_progress_from_store() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_goal(NewGoal {
            user_id: USER,
            name: "Laptop".to_string(),
            target_amount: dec!(1200),
            current_amount: dec!(300),
            deadline: Some(d(2024, 6, 1)),
            priority: Default::default(),
        })
        .unwrap();

    let goal = db.add_goal_progress(USER, id, dec!(300)).unwrap();
    let progress = goal_progress(&goal, d(2024, 3, 1));
    assert_eq!(progress.percentage, dec!(50));
    assert_eq!(progress.remaining, dec!(600));
    assert_eq!(progress.days_remaining, Some(92));
}
