//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Alert threshold applied to budgets created without one
pub const DEFAULT_ALERT_THRESHOLD: Decimal = dec!(0.80);

/// Round a money amount to cents and reject negatives
pub fn normalize_money(amount: Decimal, field: &str) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidInput(format!(
            "{} must not be negative (got {})",
            field, amount
        )));
    }
    Ok(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

// ========== Transactions ==========

/// Whether money left or entered the user's pocket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!(
                "Unknown transaction type: {} (valid: expense, income)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense or income
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    /// Always non-negative; direction comes from `transaction_type`
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub description: String,
    /// None (or an id that no longer resolves) means uncategorized
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    /// Recurring / non-discretionary
    pub is_fixed: bool,
    pub tags: Vec<String>,
    /// 1-5, how happy the user was with the spend
    pub satisfaction_rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

/// A transaction before insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: i64,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub description: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub satisfaction_rating: Option<u8>,
}

impl NewTransaction {
    /// Check invariants and round the amount to cents
    pub fn validate(mut self) -> Result<Self> {
        self.amount = normalize_money(self.amount, "amount")?;
        validate_rating(self.satisfaction_rating)?;
        if self.description.trim().is_empty() {
            return Err(Error::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

fn validate_rating(rating: Option<u8>) -> Result<()> {
    match rating {
        Some(r) if !(1..=5).contains(&r) => Err(Error::InvalidInput(format!(
            "satisfaction_rating must be between 1 and 5 (got {})",
            r
        ))),
        _ => Ok(()),
    }
}

/// Editable fields of an existing transaction
///
/// `category_id: Some(None)` clears the category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionUpdate {
    pub amount: Option<Decimal>,
    #[serde(default, with = "double_option")]
    pub category_id: Option<Option<i64>>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_fixed: Option<bool>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category_id.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.is_fixed.is_none()
    }
}

/// Distinguishes an absent field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

// ========== Categories ==========

/// A spending or income category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// None for system defaults shared by every user
    pub user_id: Option<i64>,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

/// A user-defined category before insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

// ========== Budgets ==========

/// Length of a budget cycle, counted from the budget's start date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(Error::InvalidPeriod(s.to_string())),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit for one category (or all of them) over a cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// None = applies to every category
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub is_active: bool,
    /// Fraction in [0, 1]
    pub alert_threshold: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A budget before insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudget {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub alert_threshold: Option<Decimal>,
}

impl NewBudget {
    /// Check invariants, round the amount and fill in the default threshold
    pub fn validate(mut self, default_threshold: Decimal) -> Result<Self> {
        self.amount = normalize_money(self.amount, "amount")?;
        let threshold = self.alert_threshold.unwrap_or(default_threshold);
        if threshold < Decimal::ZERO || threshold > Decimal::ONE {
            return Err(Error::InvalidInput(format!(
                "alert_threshold must be a fraction between 0 and 1 (got {})",
                threshold
            )));
        }
        self.alert_threshold = Some(threshold);
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("name must not be empty".to_string()));
        }
        Ok(self)
    }
}

/// Budget health, in precedence order over-budget > warning > on-track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on-track",
            Self::Warning => "warning",
            Self::OverBudget => "over-budget",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spent-vs-allotted evaluation of a budget's cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub spent: Decimal,
    /// 0-100+ (can exceed 100 when over budget)
    pub percentage: Decimal,
    /// May be negative
    pub remaining: Decimal,
    pub status: BudgetStatus,
    pub period_start: NaiveDate,
    /// Exclusive
    pub period_end: NaiveDate,
}

/// A budget together with its evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetWithProgress {
    #[serde(flatten)]
    pub budget: Budget,
    pub progress: BudgetProgress,
}

// ========== Goals ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    Medium,
    High,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Default for GoalPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::str::FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "Unknown priority: {} (valid: low, medium, high)",
                s
            )),
        }
    }
}

/// A savings goal; progress is recorded explicitly, never derived from transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub is_completed: bool,
    pub priority: GoalPriority,
    pub created_at: DateTime<Utc>,
}

/// A goal before insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: GoalPriority,
}

impl NewGoal {
    pub fn validate(mut self) -> Result<Self> {
        self.target_amount = normalize_money(self.target_amount, "target_amount")?;
        self.current_amount = normalize_money(self.current_amount, "current_amount")?;
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("name must not be empty".to_string()));
        }
        Ok(self)
    }
}

/// Derived progress of a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// 0-100, capped
    pub percentage: Decimal,
    /// Never negative
    pub remaining: Decimal,
    pub is_completed: bool,
    /// Days until the deadline (negative once it has passed)
    pub days_remaining: Option<i64>,
    pub is_overdue: bool,
}

/// A goal together with its progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

// ========== Analytics Models ==========

/// Current-month dashboard figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Current-month net (income - expenses), not a lifetime balance
    pub total_balance: Decimal,
    pub this_month_expenses: Decimal,
    pub this_month_income: Decimal,
    /// Percent change vs last month; 0 when last month was 0
    pub expense_change: Decimal,
    pub income_change: Decimal,
    /// Percent of income not spent; 0 when there was no income
    pub savings_rate: Decimal,
}

/// One row of a spending-by-category report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// None for the "Uncategorized" row
    pub category_id: Option<i64>,
    pub category: String,
    pub icon: Option<String>,
    pub color: String,
    pub amount: Decimal,
    /// Share of the window's expense total, 0-100
    pub percentage: Decimal,
    pub transaction_count: i64,
}

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// "YYYY-MM"
    pub month: String,
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub net_savings: Decimal,
}
