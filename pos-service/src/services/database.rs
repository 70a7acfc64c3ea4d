//! Database service for pos-service.

use std::str::FromStr;
use std::time::Duration;

use pos_core::error::AppError;
use pos_core::pagination::{Page, PageParams};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::{info, instrument};

use crate::config::DatabaseConfig;
use crate::dtos::catalog::{
    CreateCategoryRequest, CreateProductRequest, CreateSupplierRequest, UpdateCategoryRequest,
    UpdateProductRequest, UpdateSupplierRequest,
};
use crate::dtos::sales::{
    CreateAuditLogRequest, CreateSaleDetailRequest, CreateSaleRequest, SaleListFilter,
    UpdateAuditLogRequest, UpdateSaleDetailRequest, UpdateSaleRequest,
};
use crate::dtos::users::{UpdateUserRequest, UserListFilter};
use crate::models::{
    AuditLog, Category, NewUser, Product, Sale, SaleDetail, Supplier, User,
    DEFAULT_PAYMENT_METHOD,
};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

/// SQLite reports FK failures as a generic database error, so the message
/// text is the only reliable discriminator.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().contains("FOREIGN KEY constraint failed")
    )
}

impl Database {
    /// Create a new connection pool in WAL mode with foreign keys enforced.
    #[instrument(skip(config), fields(service = "pos-service"))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to SQLite"
        );

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Invalid database url: {}", e))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("SQLite connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // User Operations
    // -------------------------------------------------------------------------

    /// Insert a user whose password has already been hashed.
    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: &NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, first_name, last_name, email, password_hash, role, refresh_token, refresh_token_expiry
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "A user with email '{}' already exists",
                    input.email
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create user: {}", e)),
        })?;

        info!(user_id = user.id, role = %user.role, "User created");

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, refresh_token, refresh_token_expiry
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get user: {}", e)))
    }

    #[instrument(skip(self, email))]
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, refresh_token, refresh_token_expiry
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find user: {}", e)))
    }

    #[instrument(skip(self, token))]
    pub async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, refresh_token, refresh_token_expiry
            FROM users
            WHERE refresh_token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to look up refresh token: {}", e))
        })
    }

    /// Overwrite the stored refresh token, which invalidates the previous one.
    #[instrument(skip(self, token, expiry))]
    pub async fn store_refresh_token(
        &self,
        user_id: i64,
        token: &str,
        expiry: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET refresh_token = ?, refresh_token_expiry = ? WHERE id = ?")
            .bind(token)
            .bind(expiry)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to store refresh token: {}", e))
            })?;
        Ok(())
    }

    /// Paginated listing with email substring and exact role filters.
    #[instrument(skip(self, filter, page))]
    pub async fn list_users(
        &self,
        filter: &UserListFilter,
        page: &PageParams,
    ) -> Result<Page<User>, AppError> {
        let total_records: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE (? IS NULL OR email LIKE '%' || ? || '%')
              AND (? IS NULL OR role = ?)
            "#,
        )
        .bind(&filter.email)
        .bind(&filter.email)
        .bind(&filter.role)
        .bind(&filter.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count users: {}", e)))?;

        let order_column = match filter.order_by.as_deref().map(str::to_lowercase).as_deref() {
            Some("email") => "email",
            Some("role") => "role",
            _ => "id",
        };

        let sql = format!(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, refresh_token, refresh_token_expiry
            FROM users
            WHERE (? IS NULL OR email LIKE '%' || ? || '%')
              AND (? IS NULL OR role = ?)
            ORDER BY {}
            LIMIT ? OFFSET ?
            "#,
            order_column
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(&filter.email)
            .bind(&filter.email)
            .bind(&filter.role)
            .bind(&filter.role)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list users: {}", e)))?;

        Ok(Page::new(page, total_records, users))
    }

    /// Full replacement of the mutable user columns.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        id: i64,
        input: &UpdateUserRequest,
        password_hash: Option<&str>,
    ) -> Result<User, AppError> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User {} not found", id)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, email = ?, password_hash = ?, role = ?
            WHERE id = ?
            RETURNING id, first_name, last_name, email, password_hash, role, refresh_token, refresh_token_expiry
            "#,
        )
        .bind(input.first_name.as_deref().unwrap_or(&existing.first_name))
        .bind(input.last_name.as_deref().unwrap_or(&existing.last_name))
        .bind(&input.email)
        .bind(password_hash.unwrap_or(&existing.password_hash))
        .bind(&input.role)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "A user with email '{}' already exists",
                    input.email
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update user: {}", e)),
        })?;

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(anyhow::anyhow!(
                        "User {} is referenced by recorded sales",
                        id
                    ))
                } else {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to delete user: {}", e))
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("User {} not found", id)));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Product Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock, category_id, supplier_id
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list products: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, stock, category_id, supplier_id
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get product: {}", e)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &CreateProductRequest) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, stock, category_id, supplier_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, description, price, stock, category_id, supplier_id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .bind(input.supplier_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "A product named '{}' already exists",
                    input.name
                ))
            }
            ref other if is_foreign_key_violation(other) => AppError::BadRequest(anyhow::anyhow!(
                "Referenced category or supplier does not exist"
            )),
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create product: {}", e)),
        })?;

        info!(product_id = product.id, stock = product.stock, "Product created");

        Ok(product)
    }

    /// Partial update: only the fields present in the request change.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: i64,
        input: &UpdateProductRequest,
    ) -> Result<Product, AppError> {
        let existing = self
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product {} not found", id)))?;

        let description = match &input.description {
            Some(description) => Some(description.clone()),
            None => existing.description.clone(),
        };

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, stock = ?, category_id = ?, supplier_id = ?
            WHERE id = ?
            RETURNING id, name, description, price, stock, category_id, supplier_id
            "#,
        )
        .bind(&input.name)
        .bind(description)
        .bind(input.price.unwrap_or(existing.price))
        .bind(input.stock.unwrap_or(existing.stock))
        .bind(input.category_id.unwrap_or(existing.category_id))
        .bind(input.supplier_id.or(existing.supplier_id))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "A product named '{}' already exists",
                    input.name
                ))
            }
            ref other if is_foreign_key_violation(other) => AppError::BadRequest(anyhow::anyhow!(
                "Referenced category or supplier does not exist"
            )),
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update product: {}", e)),
        })?;

        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(anyhow::anyhow!(
                        "Product {} is referenced by recorded sales",
                        id
                    ))
                } else {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to delete product: {}", e))
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Product {} not found",
                id
            )));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Category Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list categories: {}", e))
            })
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get category: {}", e)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(
        &self,
        input: &CreateCategoryRequest,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create category: {}", e)))
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: i64,
        input: &UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = ? WHERE id = ? RETURNING id, name",
        )
        .bind(&input.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update category: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Category {} not found", id)))
    }

    /// Deleting a category cascades to every product in it.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete category: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Category {} not found",
                id
            )));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Supplier Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, phone FROM suppliers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list suppliers: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: i64) -> Result<Option<Supplier>, AppError> {
        sqlx::query_as::<_, Supplier>(
            "SELECT id, name, contact, phone FROM suppliers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get supplier: {}", e)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_supplier(
        &self,
        input: &CreateSupplierRequest,
    ) -> Result<Supplier, AppError> {
        sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, contact, phone)
            VALUES (?, ?, ?)
            RETURNING id, name, contact, phone
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create supplier: {}", e)))
    }

    #[instrument(skip(self, input))]
    pub async fn update_supplier(
        &self,
        id: i64,
        input: &UpdateSupplierRequest,
    ) -> Result<Supplier, AppError> {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = ?, contact = ?, phone = ?
            WHERE id = ?
            RETURNING id, name, contact, phone
            "#,
        )
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.phone)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update supplier: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Supplier {} not found", id)))
    }

    /// Products pointing at the supplier keep existing with a cleared link.
    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete supplier: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Supplier {} not found",
                id
            )));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sale Operations
    // -------------------------------------------------------------------------

    /// Paginated listing with total bounds and ordering.
    #[instrument(skip(self, filter, page))]
    pub async fn list_sales(
        &self,
        filter: &SaleListFilter,
        page: &PageParams,
    ) -> Result<Page<Sale>, AppError> {
        let total_records: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sales
            WHERE (? IS NULL OR total >= ?)
              AND (? IS NULL OR total <= ?)
            "#,
        )
        .bind(filter.min_total)
        .bind(filter.min_total)
        .bind(filter.max_total)
        .bind(filter.max_total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count sales: {}", e)))?;

        let order_column = match filter.order_by.as_deref().map(str::to_lowercase).as_deref() {
            Some("total") => "total",
            Some("discount") => "discount",
            _ => "created_at",
        };

        let sql = format!(
            r#"
            SELECT id, created_at, total, discount, payment_method, employee_id
            FROM sales
            WHERE (? IS NULL OR total >= ?)
              AND (? IS NULL OR total <= ?)
            ORDER BY {}
            LIMIT ? OFFSET ?
            "#,
            order_column
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(filter.min_total)
            .bind(filter.min_total)
            .bind(filter.max_total)
            .bind(filter.max_total)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list sales: {}", e)))?;

        Ok(Page::new(page, total_records, sales))
    }

    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: i64) -> Result<Option<Sale>, AppError> {
        sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, created_at, total, discount, payment_method, employee_id
            FROM sales
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get sale: {}", e)))
    }

    /// Header-only insert used by the plain create endpoint; stock is not
    /// touched here.
    #[instrument(skip(self, input), fields(employee_id = input.employee_id))]
    pub async fn create_sale(&self, input: &CreateSaleRequest) -> Result<Sale, AppError> {
        let payment_method = match input.payment_method.as_deref() {
            Some(method) if !method.trim().is_empty() => method,
            _ => DEFAULT_PAYMENT_METHOD,
        };

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (created_at, total, discount, payment_method, employee_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, created_at, total, discount, payment_method, employee_id
            "#,
        )
        .bind(chrono::Utc::now())
        .bind(input.total)
        .bind(input.discount.unwrap_or_default())
        .bind(payment_method)
        .bind(input.employee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::BadRequest(anyhow::anyhow!(
                    "Employee {} does not exist",
                    input.employee_id
                ))
            } else {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create sale: {}", e))
            }
        })?;

        info!(sale_id = sale.id, "Sale header created");

        Ok(sale)
    }

    /// Updates the discount when one is supplied; other columns are fixed
    /// once the sale exists.
    #[instrument(skip(self, input))]
    pub async fn update_sale(&self, id: i64, input: &UpdateSaleRequest) -> Result<(), AppError> {
        let existing = self
            .get_sale(id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sale {} not found", id)))?;

        if let Some(discount) = input.discount {
            sqlx::query("UPDATE sales SET discount = ? WHERE id = ?")
                .bind(discount)
                .bind(existing.id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to update sale: {}", e))
                })?;
        }

        Ok(())
    }

    /// Deleting a sale cascades to its details and audit records.
    #[instrument(skip(self))]
    pub async fn delete_sale(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete sale: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("Sale {} not found", id)));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sale Detail Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_sale_details(&self) -> Result<Vec<SaleDetail>, AppError> {
        sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price
            FROM sale_details
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list sale details: {}", e))
        })
    }

    #[instrument(skip(self))]
    pub async fn get_sale_detail(&self, id: i64) -> Result<Option<SaleDetail>, AppError> {
        sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price
            FROM sale_details
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get sale detail: {}", e)))
    }

    /// Maintenance insert that does not adjust any stock.
    #[instrument(skip(self, input), fields(sale_id = input.sale_id, product_id = input.product_id))]
    pub async fn create_sale_detail(
        &self,
        input: &CreateSaleDetailRequest,
    ) -> Result<SaleDetail, AppError> {
        sqlx::query_as::<_, SaleDetail>(
            r#"
            INSERT INTO sale_details (sale_id, product_id, quantity, unit_price)
            VALUES (?, ?, ?, ?)
            RETURNING id, sale_id, product_id, quantity, unit_price
            "#,
        )
        .bind(input.sale_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::BadRequest(anyhow::anyhow!(
                    "Referenced sale or product does not exist"
                ))
            } else {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create sale detail: {}", e))
            }
        })
    }

    /// Partial update restricted to quantity and unit price.
    #[instrument(skip(self, input))]
    pub async fn update_sale_detail(
        &self,
        id: i64,
        input: &UpdateSaleDetailRequest,
    ) -> Result<SaleDetail, AppError> {
        let existing = self
            .get_sale_detail(id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Sale detail {} not found", id)))?;

        sqlx::query_as::<_, SaleDetail>(
            r#"
            UPDATE sale_details
            SET quantity = ?, unit_price = ?
            WHERE id = ?
            RETURNING id, sale_id, product_id, quantity, unit_price
            "#,
        )
        .bind(input.quantity.unwrap_or(existing.quantity))
        .bind(input.unit_price.unwrap_or(existing.unit_price))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update sale detail: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn delete_sale_detail(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sale_details WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete sale detail: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Sale detail {} not found",
                id
            )));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Audit Log Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_audit_logs(&self) -> Result<Vec<AuditLog>, AppError> {
        sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT id, sale_id, employee_id, recorded_at, action
            FROM audit_logs
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list audit logs: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn get_audit_log(&self, id: i64) -> Result<Option<AuditLog>, AppError> {
        sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT id, sale_id, employee_id, recorded_at, action
            FROM audit_logs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get audit log: {}", e)))
    }

    /// The timestamp is always server-assigned.
    #[instrument(skip(self, input), fields(sale_id = input.sale_id))]
    pub async fn create_audit_log(
        &self,
        input: &CreateAuditLogRequest,
    ) -> Result<AuditLog, AppError> {
        sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (sale_id, employee_id, recorded_at, action)
            VALUES (?, ?, ?, ?)
            RETURNING id, sale_id, employee_id, recorded_at, action
            "#,
        )
        .bind(input.sale_id)
        .bind(input.employee_id)
        .bind(chrono::Utc::now())
        .bind(&input.action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::BadRequest(anyhow::anyhow!("Referenced sale does not exist"))
            } else {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create audit log: {}", e))
            }
        })
    }

    /// Only the action text may change after the fact.
    #[instrument(skip(self, input))]
    pub async fn update_audit_log(
        &self,
        id: i64,
        input: &UpdateAuditLogRequest,
    ) -> Result<AuditLog, AppError> {
        let existing = self
            .get_audit_log(id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Audit log {} not found", id)))?;

        sqlx::query_as::<_, AuditLog>(
            r#"
            UPDATE audit_logs
            SET action = ?
            WHERE id = ?
            RETURNING id, sale_id, employee_id, recorded_at, action
            "#,
        )
        .bind(input.action.as_deref().unwrap_or(&existing.action))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update audit log: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn delete_audit_log(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM audit_logs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete audit log: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Audit log {} not found",
                id
            )));
        }
        Ok(())
    }
}
