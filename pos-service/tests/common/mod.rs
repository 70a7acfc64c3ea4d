//! Test helper module for pos-service integration tests.
//!
//! Every test spawns the full application against its own temporary SQLite
//! file, so tests are hermetic and safe to run in parallel.

#![allow(dead_code)]

use std::sync::Once;

use pos_service::config::{Config, DatabaseConfig, Environment, JwtConfig};
use pos_service::services::Database;
use pos_service::startup::Application;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

static TRACING: Once = Once::new();

/// Opt into test logs with TEST_LOG=1.
fn init_tracing() {
    TRACING.call_once(|| {
        if std::env::var("TEST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_env_filter("info,pos_service=debug,sqlx=warn")
                .with_test_writer()
                .init();
        }
    });
}

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub db: Database,
    _db_file: NamedTempFile,
}

impl TestApp {
    /// Spawn a new test application on a random port with a fresh database.
    pub async fn spawn() -> Self {
        init_tracing();

        let db_file = NamedTempFile::new().expect("Failed to create temp database file");
        let db_path = db_file
            .path()
            .to_str()
            .expect("temp database path is not valid utf-8")
            .to_string();

        let config = Config {
            environment: Environment::Dev,
            service_name: "pos-service-test".to_string(),
            service_version: "0.1.0".to_string(),
            log_level: "warn".to_string(),
            port: 0, // Random port
            database: DatabaseConfig {
                url: format!("sqlite://{}", db_path),
                max_connections: 5,
                min_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-only-jwt-secret-with-enough-length".to_string(),
                access_token_expiry_minutes: 15,
                refresh_token_expiry_days: 7,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let db = app.state().db;

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let address = format!("http://127.0.0.1:{}", port);

        // Wait for the server to be ready by polling the health endpoint
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            db,
            _db_file: db_file,
        }
    }
}

/// Register a user through the API and return (user_id, access_token).
pub async fn register_user(app: &TestApp, email: &str, role: &str) -> (i64, String) {
    let response = app
        .client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "email": email,
            "password": "secreta1",
            "firstName": "Test",
            "lastName": "User",
            "role": role,
        }))
        .send()
        .await
        .expect("Failed to execute register request");

    assert_eq!(response.status().as_u16(), 201, "register should succeed");

    let body: Value = response
        .json()
        .await
        .expect("Failed to parse register response");
    let user_id = body["user"]["id"]
        .as_i64()
        .expect("register response carries the user id");
    let token = body["accessToken"]
        .as_str()
        .expect("register response carries an access token")
        .to_string();

    (user_id, token)
}

/// Create a category through the API and return its id.
pub async fn seed_category(app: &TestApp, name: &str) -> i64 {
    let response = app
        .client
        .post(format!("{}/api/categories", app.address))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to execute category request");

    assert_eq!(response.status().as_u16(), 201, "category should be created");

    let body: Value = response
        .json()
        .await
        .expect("Failed to parse category response");
    body["id"].as_i64().expect("category response carries an id")
}

/// Create a product through the API and return its id.
pub async fn seed_product(
    app: &TestApp,
    name: &str,
    price: f64,
    stock: i64,
    category_id: i64,
) -> i64 {
    let response = app
        .client
        .post(format!("{}/api/products", app.address))
        .json(&json!({
            "name": name,
            "price": price,
            "stock": stock,
            "categoryId": category_id,
        }))
        .send()
        .await
        .expect("Failed to execute product request");

    assert_eq!(response.status().as_u16(), 201, "product should be created");

    let body: Value = response
        .json()
        .await
        .expect("Failed to parse product response");
    body["id"].as_i64().expect("product response carries an id")
}

/// Read the current stock of a product straight from the database.
pub async fn product_stock(app: &TestApp, product_id: i64) -> i64 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(app.db.pool())
        .await
        .expect("Failed to read product stock")
}

/// Count the rows of a table.
pub async fn count_rows(app: &TestApp, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(app.db.pool())
        .await
        .expect("Failed to count rows")
}
