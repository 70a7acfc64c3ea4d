//! Audit log handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use pos_core::{AppError, ValidatedJson};

use crate::dtos::sales::{CreateAuditLogRequest, UpdateAuditLogRequest};
use crate::models::AuditLog;
use crate::AppState;

/// GET /api/audit-logs
pub async fn list_audit_logs(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuditLog>>, AppError> {
    let logs = state.db.list_audit_logs().await?;
    Ok(Json(logs))
}

/// GET /api/audit-logs/:id
pub async fn get_audit_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AuditLog>, AppError> {
    let log = state
        .db
        .get_audit_log(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Audit log {} not found", id)))?;
    Ok(Json(log))
}

/// Record an audit entry; the timestamp is always server-assigned.
///
/// POST /api/audit-logs
pub async fn create_audit_log(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAuditLogRequest>,
) -> Result<(StatusCode, Json<AuditLog>), AppError> {
    let log = state.db.create_audit_log(&req).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// PUT /api/audit-logs/:id
pub async fn update_audit_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAuditLogRequest>,
) -> Result<StatusCode, AppError> {
    state.db.update_audit_log(id, &req).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/audit-logs/:id
pub async fn delete_audit_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_audit_log(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
