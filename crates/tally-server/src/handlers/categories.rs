//! Category handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, CurrentUser, SuccessResponse};
use tally_core::models::{Category, NewCategory, TransactionType};

/// GET /api/categories - System defaults plus the caller's own categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.db.list_categories(user_id)?;
    Ok(Json(categories))
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

/// POST /api/categories - Create a user-defined category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let id = state
        .db
        .insert_category(&NewCategory {
            user_id,
            name: body.name,
            icon: body.icon,
            color: body.color,
            category_type: body.category_type,
        })
        .map_err(AppError::from_core)?;

    let category = state
        .db
        .get_category(user_id, id)?
        .ok_or_else(|| AppError::internal("Category vanished after insert"))?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/categories/:id - Delete one of the caller's categories
///
/// Transactions in the category are kept and reported as uncategorized.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_category(user_id, id)? {
        return Err(AppError::not_found("Category not found"));
    }

    Ok(Json(SuccessResponse { success: true }))
}
