use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Action string written by the sale completion workflow.
pub const SALE_COMPLETED_ACTION: &str = "Venta completa registrada y stock actualizado";

/// Audit trail row tied to a sale.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: i64,
    pub sale_id: i64,
    pub employee_id: i64,
    pub recorded_at: DateTime<Utc>,
    pub action: String,
}
