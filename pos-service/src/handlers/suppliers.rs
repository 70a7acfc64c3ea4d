//! Supplier handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use pos_core::{AppError, ValidatedJson};

use crate::dtos::catalog::{CreateSupplierRequest, UpdateSupplierRequest};
use crate::models::Supplier;
use crate::AppState;

/// GET /api/suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    let suppliers = state.db.list_suppliers().await?;
    Ok(Json(suppliers))
}

/// GET /api/suppliers/:id
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Supplier>, AppError> {
    let supplier = state
        .db
        .get_supplier(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Supplier {} not found", id)))?;
    Ok(Json(supplier))
}

/// POST /api/suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<Supplier>), AppError> {
    let supplier = state.db.create_supplier(&req).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// PUT /api/suppliers/:id
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateSupplierRequest>,
) -> Result<StatusCode, AppError> {
    state.db.update_supplier(id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a supplier; products that referenced it keep existing unlinked.
///
/// DELETE /api/suppliers/:id
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_supplier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
