//! Product catalog handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use pos_core::{AppError, ValidatedJson};

use crate::dtos::catalog::{CreateProductRequest, UpdateProductRequest};
use crate::models::{Product, UserRole};
use crate::AppState;

/// List the whole catalog.
///
/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.db.list_products().await?;
    Ok(Json(products))
}

/// Fetch one product; restricted to managers.
///
/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Product>, AppError> {
    let claims = state.jwt.authenticate(&headers)?;
    if claims.role != UserRole::Jefe.as_str() {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Only managers may look up individual products"
        )));
    }

    let product = state
        .db
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product {} not found", id)))?;

    Ok(Json(product))
}

/// Add a product to the catalog.
///
/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.db.create_product(&req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product; omitted fields keep their current values.
///
/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateProductRequest>,
) -> Result<StatusCode, AppError> {
    state.db.update_product(id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
