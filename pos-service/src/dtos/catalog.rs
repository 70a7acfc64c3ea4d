use pos_core::money::{validate_positive_amount, Money};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[validate(custom(function = "validate_positive_amount"))]
    pub price: Money,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    #[serde(default)]
    pub stock: i64,

    pub category_id: i64,

    #[serde(default)]
    pub supplier_id: Option<i64>,
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_positive_amount"))]
    pub price: Option<Money>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: Option<i64>,

    #[serde(default)]
    pub category_id: Option<i64>,

    #[serde(default)]
    pub supplier_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "Contact must be at most 150 characters"))]
    pub contact: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "Contact must be at most 150 characters"))]
    pub contact: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}
