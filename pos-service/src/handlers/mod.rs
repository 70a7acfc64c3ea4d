//! HTTP handlers for pos-service.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

pub mod audit_logs;
pub mod auth;
pub mod categories;
pub mod products;
pub mod sale_details;
pub mod sales;
pub mod suppliers;
pub mod users;

/// Liveness probe that also pings the database.
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": state.config.service_name,
                "version": state.config.service_version,
            })),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        ),
    }
}
