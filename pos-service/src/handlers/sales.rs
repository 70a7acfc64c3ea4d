//! Sale handlers.
//!
//! Every route in this group sits behind the auth middleware.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use pos_core::{AppError, Page, PageParams, ValidatedJson};

use crate::dtos::sales::{
    CompleteSaleRequest, CompletedSaleResponse, CreateSaleRequest, SaleListFilter,
    UpdateSaleRequest,
};
use crate::models::Sale;
use crate::AppState;

/// List sales with pagination, total bounds and ordering.
///
/// GET /api/sales
pub async fn list_sales(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filter): Query<SaleListFilter>,
) -> Result<Json<Page<Sale>>, AppError> {
    page.ensure_valid()?;
    let sales = state.db.list_sales(&filter, &page).await?;
    Ok(Json(sales))
}

/// GET /api/sales/:id
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Sale>, AppError> {
    let sale = state
        .db
        .get_sale(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sale {} not found", id)))?;
    Ok(Json(sale))
}

/// Create a bare sale header without touching stock.
///
/// POST /api/sales
pub async fn create_sale(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSaleRequest>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    let sale = state.db.create_sale(&req).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Record a complete sale: header, line items, stock deduction and audit
/// record in one transaction.
///
/// POST /api/sales/complete
pub async fn complete_sale(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CompleteSaleRequest>,
) -> Result<(StatusCode, Json<CompletedSaleResponse>), AppError> {
    let input = req.into_domain();
    let (sale, line_items) = state.db.complete_sale(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CompletedSaleResponse { sale, line_items }),
    ))
}

/// Adjust the discount on an existing sale.
///
/// PUT /api/sales/:id
pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateSaleRequest>,
) -> Result<StatusCode, AppError> {
    state.db.update_sale(id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a sale along with its details and audit records.
///
/// DELETE /api/sales/:id
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_sale(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
