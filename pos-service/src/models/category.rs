use serde::Serialize;
use sqlx::FromRow;

/// Product category. Deleting a category cascades to its products.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
}
