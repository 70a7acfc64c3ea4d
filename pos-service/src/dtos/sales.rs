use pos_core::money::{validate_non_negative_amount, validate_positive_amount, Money};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{CompleteSale, Sale, SaleDetail, SaleLine, DEFAULT_PAYMENT_METHOD};

/// Header-only sale insert, without any stock movement.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    #[validate(range(min = 1, message = "employeeId must be a valid user id"))]
    pub employee_id: i64,

    #[validate(custom(function = "validate_positive_amount"))]
    pub total: Money,

    #[serde(default)]
    #[validate(custom(function = "validate_non_negative_amount"))]
    pub discount: Option<Money>,

    #[serde(default)]
    #[validate(length(max = 50, message = "paymentMethod must be at most 50 characters"))]
    pub payment_method: Option<String>,
}

/// The only field a sale update may touch is the discount.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_non_negative_amount"))]
    pub discount: Option<Money>,
}

/// Optional filters and ordering for the paginated sale listing.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleListFilter {
    pub min_total: Option<Money>,
    pub max_total: Option<Money>,
    pub order_by: Option<String>,
}

/// Atomic completion request: header plus the lines to deduct from stock.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSaleRequest {
    #[validate(range(min = 1, message = "employeeId must be a valid user id"))]
    pub employee_id: i64,

    #[validate(custom(function = "validate_positive_amount"))]
    pub total: Money,

    #[serde(default)]
    #[validate(custom(function = "validate_non_negative_amount"))]
    pub discount: Option<Money>,

    #[serde(default)]
    #[validate(length(max = 50, message = "paymentMethod must be at most 50 characters"))]
    pub payment_method: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub line_items: Vec<SaleLineRequest>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub product_id: i64,

    #[validate(range(min = 1, message = "quantity must be greater than zero"))]
    pub quantity: i64,

    #[validate(custom(function = "validate_positive_amount"))]
    pub unit_price: Money,
}

impl CompleteSaleRequest {
    /// Applies the documented defaults before the workflow runs.
    pub fn into_domain(self) -> CompleteSale {
        let payment_method = match self.payment_method {
            Some(method) if !method.trim().is_empty() => method,
            _ => DEFAULT_PAYMENT_METHOD.to_string(),
        };

        CompleteSale {
            employee_id: self.employee_id,
            total: self.total,
            discount: self.discount.unwrap_or_default(),
            payment_method,
            line_items: self
                .line_items
                .into_iter()
                .map(|line| SaleLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
        }
    }
}

/// Completed sale as returned to the caller: the persisted header plus
/// every persisted line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSaleResponse {
    #[serde(flatten)]
    pub sale: Sale,
    pub line_items: Vec<SaleDetail>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleDetailRequest {
    pub sale_id: i64,

    pub product_id: i64,

    #[validate(range(min = 1, message = "quantity must be greater than zero"))]
    pub quantity: i64,

    #[validate(custom(function = "validate_positive_amount"))]
    pub unit_price: Money,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleDetailRequest {
    #[serde(default)]
    #[validate(range(min = 1, message = "quantity must be greater than zero"))]
    pub quantity: Option<i64>,

    #[serde(default)]
    #[validate(custom(function = "validate_positive_amount"))]
    pub unit_price: Option<Money>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuditLogRequest {
    pub sale_id: i64,

    pub employee_id: i64,

    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuditLogRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: Option<String>,
}
