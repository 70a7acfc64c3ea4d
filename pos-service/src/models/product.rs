use pos_core::Money;
use serde::Serialize;
use sqlx::FromRow;

/// Catalog product with its live stock count.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: i64,
    pub category_id: i64,
    pub supplier_id: Option<i64>,
}
