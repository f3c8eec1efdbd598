//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState, CurrentUser, SuccessResponse, MAX_PAGE_LIMIT};
use tally_core::analytics::resolve_period;
use tally_core::db::TransactionFilter;
use tally_core::models::{NewTransaction, Transaction, TransactionType, TransactionUpdate};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    /// Period token (thisMonth, lastMonth, thisYear)
    pub period: Option<String>,
    /// Custom start date (YYYY-MM-DD), used with `to`
    pub from: Option<NaiveDate>,
    /// Custom end date (YYYY-MM-DD, inclusive)
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    /// Only transactions without a category
    pub uncategorized: Option<bool>,
    /// expense or income
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub fixed_only: Option<bool>,
    /// Search query (filters by description)
    pub search: Option<String>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    /// Sort field (date or amount)
    pub sort: Option<String>,
    /// Sort direction (asc or desc)
    pub order: Option<String>,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transactions: Vec<Transaction>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/transactions - List transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionResponse>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let date_range = match (params.period.as_deref(), params.from, params.to) {
        (Some(period), _, _) => {
            let window = resolve_period(period, state.today()).map_err(AppError::from_core)?;
            Some((window.start, window.last_day()))
        }
        (None, Some(from), Some(to)) => Some((from, to)),
        (None, Some(_), None) | (None, None, Some(_)) => {
            return Err(AppError::bad_request("from and to must be given together"));
        }
        (None, None, None) => None,
    };

    let filter = TransactionFilter::new()
        .date_range(date_range)
        .category_id(params.category_id)
        .uncategorized(params.uncategorized.unwrap_or(false))
        .transaction_type(params.transaction_type)
        .fixed_only(params.fixed_only.unwrap_or(false))
        .search(params.search.as_deref())
        .amount_range(params.min_amount, params.max_amount)
        .sort_field(params.sort.as_deref())
        .sort_order(params.order.as_deref());

    let transactions = state
        .db
        .list_transactions(user_id, &filter, Some(limit), offset)?;
    let total = state.db.count_transactions(user_id, &filter)?;

    Ok(Json(TransactionResponse {
        transactions,
        total,
        limit,
        offset,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub description: String,
    pub category_id: Option<i64>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub satisfaction_rating: Option<u8>,
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let id = state
        .db
        .insert_transaction(NewTransaction {
            user_id,
            amount: body.amount,
            transaction_type: body.transaction_type,
            description: body.description,
            category_id: body.category_id,
            date: body.date.unwrap_or_else(|| state.today()),
            is_fixed: body.is_fixed,
            tags: body.tags,
            satisfaction_rating: body.satisfaction_rating,
        })
        .map_err(AppError::from_core)?;

    let transaction = state
        .db
        .get_transaction(user_id, id)?
        .ok_or_else(|| AppError::internal("Transaction vanished after insert"))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// PATCH /api/transactions/:id - Edit amount, category, date, description or fixed flag
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(update): Json<TransactionUpdate>,
) -> Result<Json<Transaction>, AppError> {
    if update.is_empty() {
        return Err(AppError::bad_request("No fields to update"));
    }

    let transaction = state
        .db
        .update_transaction(user_id, id, &update)
        .map_err(AppError::from_core)?;

    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_transaction(user_id, id)? {
        return Err(AppError::not_found("Transaction not found"));
    }

    Ok(Json(SuccessResponse { success: true }))
}
