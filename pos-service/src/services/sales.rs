//! Atomic sale completion.
//!
//! A completed sale writes the header, one detail row per line item, the
//! stock deductions and a single audit record inside one transaction, so a
//! failure at any point leaves the catalog untouched.

use chrono::Utc;
use pos_core::error::AppError;
use thiserror::Error;
use tracing::{info, instrument};

use crate::models::{CompleteSale, Product, Sale, SaleDetail, SALE_COMPLETED_ACTION};
use crate::services::database::{is_foreign_key_violation, Database};

/// Failures specific to the sale completion workflow.
#[derive(Debug, Error)]
pub enum SaleError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Product {product_id} was not found")]
    ProductNotFound { product_id: i64 },

    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("Sale could not be persisted: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl From<sqlx::Error> for SaleError {
    fn from(err: sqlx::Error) -> Self {
        SaleError::Persistence(anyhow::Error::new(err))
    }
}

impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        let message = err.to_string();
        match err {
            SaleError::InvalidRequest(_) => AppError::BadRequest(anyhow::anyhow!(message)),
            SaleError::ProductNotFound { .. } => AppError::NotFound(anyhow::anyhow!(message)),
            SaleError::InsufficientStock { .. } => AppError::Conflict(anyhow::anyhow!(message)),
            SaleError::Persistence(_) => AppError::DatabaseError(anyhow::anyhow!(message)),
        }
    }
}

/// Stock left on a product after taking `requested` units, or `None` when
/// the request cannot be satisfied in full.
pub fn remaining_stock(available: i64, requested: i64) -> Option<i64> {
    if requested > 0 && requested <= available {
        Some(available - requested)
    } else {
        None
    }
}

impl Database {
    /// Record a complete sale: header, details, stock deductions and audit
    /// record, all or nothing.
    #[instrument(
        skip(self, input),
        fields(employee_id = input.employee_id, line_count = input.line_items.len())
    )]
    pub async fn complete_sale(
        &self,
        input: &CompleteSale,
    ) -> Result<(Sale, Vec<SaleDetail>), SaleError> {
        if input.line_items.is_empty() {
            return Err(SaleError::InvalidRequest(
                "A sale must contain at least one line item".to_string(),
            ));
        }

        let mut tx = self.pool().begin().await?;

        // The header insert is deliberately the first statement: it takes the
        // write lock up front, so no other completion can read product rows
        // between this transaction's checks and its decrements.
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (created_at, total, discount, payment_method, employee_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, created_at, total, discount, payment_method, employee_id
            "#,
        )
        .bind(Utc::now())
        .bind(input.total)
        .bind(input.discount)
        .bind(&input.payment_method)
        .bind(input.employee_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                SaleError::InvalidRequest(format!(
                    "Employee {} does not exist",
                    input.employee_id
                ))
            } else {
                SaleError::from(e)
            }
        })?;

        let mut details = Vec::with_capacity(input.line_items.len());

        for line in &input.line_items {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, name, description, price, stock, category_id, supplier_id
                FROM products
                WHERE id = ?
                "#,
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let product = match product {
                Some(product) => product,
                None => {
                    tx.rollback().await.ok();
                    return Err(SaleError::ProductNotFound {
                        product_id: line.product_id,
                    });
                }
            };

            if remaining_stock(product.stock, line.quantity).is_none() {
                tx.rollback().await.ok();
                return Err(SaleError::InsufficientStock {
                    product_id: product.id,
                    available: product.stock,
                    requested: line.quantity,
                });
            }

            // Guarded decrement; the CHECK constraint on stock backs it up.
            let updated = sqlx::query(
                "UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?",
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                tx.rollback().await.ok();
                return Err(SaleError::InsufficientStock {
                    product_id: product.id,
                    available: product.stock,
                    requested: line.quantity,
                });
            }

            let detail = sqlx::query_as::<_, SaleDetail>(
                r#"
                INSERT INTO sale_details (sale_id, product_id, quantity, unit_price)
                VALUES (?, ?, ?, ?)
                RETURNING id, sale_id, product_id, quantity, unit_price
                "#,
            )
            .bind(sale.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .fetch_one(&mut *tx)
            .await?;

            details.push(detail);
        }

        // One audit record per completed sale, regardless of line count.
        sqlx::query(
            "INSERT INTO audit_logs (sale_id, employee_id, recorded_at, action) VALUES (?, ?, ?, ?)",
        )
        .bind(sale.id)
        .bind(input.employee_id)
        .bind(Utc::now())
        .bind(SALE_COMPLETED_ACTION)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            sale_id = sale.id,
            line_count = details.len(),
            total = %sale.total,
            "Sale completed"
        );

        Ok((sale, details))
    }
}
