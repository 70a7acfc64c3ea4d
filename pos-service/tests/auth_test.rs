//! Registration, login and refresh token integration tests.

mod common;

use common::{register_user, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn register_returns_user_and_tokens() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "email": "ana@tienda.mx",
            "password": "secreta1",
            "firstName": "Ana",
            "lastName": "García",
            "role": "Empleado",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["user"]["email"], "ana@tienda.mx");
    assert_eq!(body["user"]["firstName"], "Ana");
    assert_eq!(body["user"]["role"], "Empleado");
    assert!(body["user"]["id"].as_i64().is_some());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(!body["accessToken"].as_str().unwrap_or_default().is_empty());
    assert!(!body["refreshToken"].as_str().unwrap_or_default().is_empty());
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 900);
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = TestApp::spawn().await;
    register_user(&app, "dup@tienda.mx", "Empleado").await;

    let response = app
        .client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "email": "dup@tienda.mx",
            "password": "secreta1",
            "role": "Empleado",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn register_rejects_unknown_roles() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "email": "role@tienda.mx",
            "password": "secreta1",
            "role": "Gerente",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn register_rejects_short_passwords() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "email": "corta@tienda.mx",
            "password": "abc",
            "role": "Empleado",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn login_returns_tokens_for_valid_credentials() {
    let app = TestApp::spawn().await;
    register_user(&app, "caja@tienda.mx", "Empleado").await;

    let response = app
        .client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({
            "email": "caja@tienda.mx",
            "password": "secreta1",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(!body["accessToken"].as_str().unwrap_or_default().is_empty());
    assert!(!body["refreshToken"].as_str().unwrap_or_default().is_empty());
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 900);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::spawn().await;
    register_user(&app, "jefa@tienda.mx", "Jefe").await;

    let response = app
        .client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({
            "email": "jefa@tienda.mx",
            "password": "equivocada",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({
            "email": "nadie@tienda.mx",
            "password": "secreta1",
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn refresh_rotates_the_stored_token() {
    let app = TestApp::spawn().await;

    let register: Value = app
        .client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "email": "rotar@tienda.mx",
            "password": "secreta1",
            "role": "Empleado",
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let first_token = register["refreshToken"]
        .as_str()
        .expect("register returns a refresh token")
        .to_string();

    // Exchange the first token for a new pair
    let response = app
        .client
        .post(format!("{}/api/auth/refresh-token", app.address))
        .json(&json!({ "refreshToken": first_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    let second_token = body["refreshToken"]
        .as_str()
        .expect("refresh returns a new refresh token")
        .to_string();
    assert_ne!(first_token, second_token);

    // The first token was rotated away and no longer works
    let replay = app
        .client
        .post(format!("{}/api/auth/refresh-token", app.address))
        .json(&json!({ "refreshToken": first_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(replay.status().as_u16(), 401);

    // The second token does work
    let rotate_again = app
        .client
        .post(format!("{}/api/auth/refresh-token", app.address))
        .json(&json!({ "refreshToken": second_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(rotate_again.status().as_u16(), 200);
}

#[tokio::test]
async fn refresh_rejects_unknown_tokens() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/refresh-token", app.address))
        .json(&json!({ "refreshToken": "no-such-token" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}
