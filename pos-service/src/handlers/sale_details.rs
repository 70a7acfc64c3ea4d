//! Sale detail handlers.
//!
//! Maintenance CRUD over individual line items; none of these routes adjust
//! product stock.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use pos_core::{AppError, ValidatedJson};

use crate::dtos::sales::{CreateSaleDetailRequest, UpdateSaleDetailRequest};
use crate::models::SaleDetail;
use crate::AppState;

/// GET /api/sale-details
pub async fn list_sale_details(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleDetail>>, AppError> {
    let details = state.db.list_sale_details().await?;
    Ok(Json(details))
}

/// GET /api/sale-details/:id
pub async fn get_sale_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SaleDetail>, AppError> {
    let detail = state
        .db
        .get_sale_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sale detail {} not found", id)))?;
    Ok(Json(detail))
}

/// POST /api/sale-details
pub async fn create_sale_detail(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSaleDetailRequest>,
) -> Result<(StatusCode, Json<SaleDetail>), AppError> {
    let detail = state.db.create_sale_detail(&req).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /api/sale-details/:id
pub async fn update_sale_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateSaleDetailRequest>,
) -> Result<StatusCode, AppError> {
    state.db.update_sale_detail(id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/sale-details/:id
pub async fn delete_sale_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_sale_detail(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
