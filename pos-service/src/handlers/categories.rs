//! Category handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use pos_core::{AppError, ValidatedJson};

use crate::dtos::catalog::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::Category;
use crate::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.db.list_categories().await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, AppError> {
    let category = state
        .db
        .get_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Category {} not found", id)))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state.db.create_category(&req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateCategoryRequest>,
) -> Result<StatusCode, AppError> {
    state.db.update_category(id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a category along with every product assigned to it.
///
/// DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
