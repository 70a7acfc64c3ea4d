//! Sale header and line item rows.

use chrono::{DateTime, Utc};
use pos_core::Money;
use serde::Serialize;
use sqlx::FromRow;

/// Payment method recorded when a request does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "Efectivo";

/// Sale header row.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total: Money,
    pub discount: Money,
    pub payment_method: String,
    pub employee_id: i64,
}

/// One product line inside a sale.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
}

/// Fully defaulted input for the atomic sale completion workflow.
#[derive(Debug, Clone)]
pub struct CompleteSale {
    pub employee_id: i64,
    pub total: Money,
    pub discount: Money,
    pub payment_method: String,
    pub line_items: Vec<SaleLine>,
}

/// One requested line of a completion, before any stock checks.
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
}
