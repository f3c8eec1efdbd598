//! Dashboard and analytics handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser};
use tally_core::models::{CategoryBreakdown, DashboardStats, MonthlyTrend};
use tally_core::{AnalyticsService, Period};

/// GET /api/dashboard/stats - Current-month totals vs last month
pub async fn get_dashboard_stats(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = AnalyticsService::new(&state.db)
        .compute_dashboard_stats(user_id, state.today())
        .map_err(AppError::analytics)?;

    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct CategoryBreakdownQuery {
    /// Period token (thisMonth, lastMonth, thisYear); defaults to thisMonth
    pub period: Option<String>,
}

/// GET /api/analytics/categories - Expense breakdown by category
pub async fn get_category_breakdown(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Query(params): Query<CategoryBreakdownQuery>,
) -> Result<Json<Vec<CategoryBreakdown>>, AppError> {
    let period = params
        .period
        .as_deref()
        .unwrap_or(Period::ThisMonth.as_str());

    let breakdown = AnalyticsService::new(&state.db)
        .compute_category_breakdown(user_id, period, state.today())
        .map_err(AppError::analytics)?;

    Ok(Json(breakdown))
}

#[derive(Debug, Deserialize)]
pub struct SpendingTrendsQuery {
    /// Trailing months including the current one
    pub months: Option<u32>,
}

/// GET /api/analytics/trends - Monthly income/expense totals
pub async fn get_spending_trends(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Query(params): Query<SpendingTrendsQuery>,
) -> Result<Json<Vec<MonthlyTrend>>, AppError> {
    let analytics = &state.config.analytics;
    let months = params.months.unwrap_or(analytics.default_trend_months);
    if months == 0 || months > analytics.max_trend_months {
        return Err(AppError::bad_request(&format!(
            "months must be between 1 and {}",
            analytics.max_trend_months
        )));
    }

    let trends = AnalyticsService::new(&state.db)
        .compute_spending_trends(user_id, months, state.today())
        .map_err(AppError::analytics)?;

    Ok(Json(trends))
}
