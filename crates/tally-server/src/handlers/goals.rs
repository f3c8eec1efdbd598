//! Savings goal handlers

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
use tally_core::analytics::goal_progress;
use tally_core::models::{GoalPriority, GoalWithProgress, NewGoal};

/// GET /api/goals - Goals with their progress
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<GoalWithProgress>>, AppError> {
    let today = state.today();
    let goals = state
        .db
        .list_goals(user_id)?
        .into_iter()
        .map(|goal| GoalWithProgress {
            progress: goal_progress(&goal, today),
            goal,
        })
        .collect();

    Ok(Json(goals))
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: GoalPriority,
}

/// POST /api/goals - Create a savings goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(body): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalWithProgress>), AppError> {
    let id = state
        .db
        .insert_goal(NewGoal {
            user_id,
            name: body.name,
            target_amount: body.target_amount,
            current_amount: body.current_amount,
            deadline: body.deadline,
            priority: body.priority,
        })
        .map_err(AppError::from_core)?;

    let goal = state
        .db
        .get_goal(user_id, id)?
        .ok_or_else(|| AppError::internal("Goal vanished after insert"))?;

    Ok((
        StatusCode::CREATED,
        Json(GoalWithProgress {
            progress: goal_progress(&goal, state.today()),
            goal,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct GoalProgressRequest {
    pub amount: Decimal,
}

/// POST /api/goals/:id/progress - Add a contribution to a goal
pub async fn add_goal_progress(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<GoalProgressRequest>,
) -> Result<Json<GoalWithProgress>, AppError> {
    let goal = state
        .db
        .add_goal_progress(user_id, id, body.amount)
        .map_err(AppError::from_core)?;

    Ok(Json(GoalWithProgress {
        progress: goal_progress(&goal, state.today()),
        goal,
    }))
}

/// DELETE /api/goals/:id - Delete a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_goal(user_id, id)? {
        return Err(AppError::not_found("Goal not found"));
    }

    Ok(Json(SuccessResponse { success: true }))
}
