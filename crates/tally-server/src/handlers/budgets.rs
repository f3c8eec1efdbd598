//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use tally_core::models::{Budget, BudgetPeriod, BudgetProgress, BudgetWithProgress, NewBudget};
use tally_core::AnalyticsService;

/// GET /api/budgets - Active budgets with their current progress
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<BudgetWithProgress>>, AppError> {
    let overview = AnalyticsService::new(&state.db)
        .budget_overview(user_id, state.today())
        .map_err(AppError::analytics)?;

    Ok(Json(overview))
}

#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub name: String,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    /// Defaults to today
    pub start_date: Option<NaiveDate>,
    /// Fraction in [0, 1]; defaults to the configured threshold
    pub alert_threshold: Option<Decimal>,
}

/// POST /api/budgets - Create a budget
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(body): Json<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    let id = state
        .db
        .insert_budget(
            NewBudget {
                user_id,
                name: body.name,
                category_id: body.category_id,
                amount: body.amount,
                period: body.period,
                start_date: body.start_date.unwrap_or_else(|| state.today()),
                alert_threshold: body.alert_threshold,
            },
            state.config.analytics.default_alert_threshold,
        )
        .map_err(AppError::from_core)?;

    let budget = state
        .db
        .get_budget(user_id, id)?
        .ok_or_else(|| AppError::internal("Budget vanished after insert"))?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /api/budgets/:id/progress - Evaluate one budget
pub async fn get_budget_progress(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<BudgetProgress>, AppError> {
    let budget = state
        .db
        .get_budget(user_id, id)?
        .ok_or_else(|| AppError::not_found("Budget not found"))?;

    let progress = AnalyticsService::new(&state.db)
        .evaluate_budget(&budget, state.today())
        .map_err(AppError::analytics)?;

    Ok(Json(progress))
}

/// DELETE /api/budgets/:id - Delete a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_budget(user_id, id)? {
        return Err(AppError::not_found("Budget not found"));
    }

    Ok(Json(SuccessResponse { success: true }))
}
