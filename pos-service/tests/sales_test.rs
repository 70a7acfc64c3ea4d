//! Sale header CRUD, listing and the auth gate on the whole group.

mod common;

use common::{register_user, seed_category, seed_product, TestApp};
use serde_json::{json, Value};

async fn create_sale(app: &TestApp, token: &str, employee_id: i64, total: f64) -> i64 {
    let response = app
        .client
        .post(format!("{}/api/sales", app.address))
        .bearer_auth(token)
        .json(&json!({ "employeeId": employee_id, "total": total }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["id"].as_i64().expect("sale has an id")
}

#[tokio::test]
async fn sale_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let list = app
        .client
        .get(format!("{}/api/sales", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(list.status().as_u16(), 401);

    let create = app
        .client
        .post(format!("{}/api/sales", app.address))
        .json(&json!({ "employeeId": 1, "total": 10.0 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(create.status().as_u16(), 401);

    let complete = app
        .client
        .post(format!("{}/api/sales/complete", app.address))
        .json(&json!({ "employeeId": 1, "total": 10.0, "lineItems": [] }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(complete.status().as_u16(), 401);
}

#[tokio::test]
async fn create_sale_applies_defaults() {
    let app = TestApp::spawn().await;
    let (employee_id, token) = register_user(&app, "caja@tienda.mx", "Empleado").await;

    let response = app
        .client
        .post(format!("{}/api/sales", app.address))
        .bearer_auth(&token)
        .json(&json!({ "employeeId": employee_id, "total": 120.0 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["total"], 120.0);
    assert_eq!(body["discount"], 0.0);
    assert_eq!(body["paymentMethod"], "Efectivo");
    assert_eq!(body["employeeId"], employee_id);
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn create_sale_rejects_unknown_employees() {
    let app = TestApp::spawn().await;
    let (_, token) = register_user(&app, "caja@tienda.mx", "Empleado").await;

    let response = app
        .client
        .post(format!("{}/api/sales", app.address))
        .bearer_auth(&token)
        .json(&json!({ "employeeId": 9999, "total": 50.0 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn list_sales_paginates_and_filters_on_total() {
    let app = TestApp::spawn().await;
    let (employee_id, token) = register_user(&app, "caja@tienda.mx", "Empleado").await;
    create_sale(&app, &token, employee_id, 50.0).await;
    create_sale(&app, &token, employee_id, 150.0).await;
    create_sale(&app, &token, employee_id, 250.0).await;

    let all: Value = app
        .client
        .get(format!("{}/api/sales?pageSize=2", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(all["totalRecords"], 3);
    assert_eq!(all["items"].as_array().map(Vec::len), Some(2));

    let bounded: Value = app
        .client
        .get(format!(
            "{}/api/sales?minTotal=100&maxTotal=200",
            app.address
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(bounded["totalRecords"], 1);
    assert_eq!(bounded["items"][0]["total"], 150.0);
}

#[tokio::test]
async fn list_sales_orders_by_total_when_asked() {
    let app = TestApp::spawn().await;
    let (employee_id, token) = register_user(&app, "caja@tienda.mx", "Empleado").await;
    create_sale(&app, &token, employee_id, 300.0).await;
    create_sale(&app, &token, employee_id, 100.0).await;
    create_sale(&app, &token, employee_id, 200.0).await;

    let body: Value = app
        .client
        .get(format!("{}/api/sales?orderBy=total", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["items"][0]["total"], 100.0);
    assert_eq!(body["items"][1]["total"], 200.0);
    assert_eq!(body["items"][2]["total"], 300.0);
}

#[tokio::test]
async fn list_sales_rejects_zero_page_parameters() {
    let app = TestApp::spawn().await;
    let (_, token) = register_user(&app, "caja@tienda.mx", "Empleado").await;

    let response = app
        .client
        .get(format!("{}/api/sales?pageNumber=0", app.address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn update_sale_changes_the_discount() {
    let app = TestApp::spawn().await;
    let (employee_id, token) = register_user(&app, "caja@tienda.mx", "Empleado").await;
    let sale_id = create_sale(&app, &token, employee_id, 80.0).await;

    let response = app
        .client
        .put(format!("{}/api/sales/{}", app.address, sale_id))
        .bearer_auth(&token)
        .json(&json!({ "discount": 5.5 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 204);

    let body: Value = app
        .client
        .get(format!("{}/api/sales/{}", app.address, sale_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(body["discount"], 5.5);
    assert_eq!(body["total"], 80.0);
}

#[tokio::test]
async fn delete_sale_cascades_to_details_and_audit_records() {
    let app = TestApp::spawn().await;
    let (employee_id, token) = register_user(&app, "caja@tienda.mx", "Empleado").await;
    let category_id = seed_category(&app, "Bebidas").await;
    let product_id = seed_product(&app, "Refresco", 18.0, 10, category_id).await;

    let completed: Value = app
        .client
        .post(format!("{}/api/sales/complete", app.address))
        .bearer_auth(&token)
        .json(&json!({
            "employeeId": employee_id,
            "total": 36.0,
            "lineItems": [{ "productId": product_id, "quantity": 2, "unitPrice": 18.0 }],
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let sale_id = completed["id"].as_i64().expect("completed sale has an id");

    assert_eq!(common::count_rows(&app, "sale_details").await, 1);
    assert_eq!(common::count_rows(&app, "audit_logs").await, 1);

    let response = app
        .client
        .delete(format!("{}/api/sales/{}", app.address, sale_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 204);

    assert_eq!(common::count_rows(&app, "sales").await, 0);
    assert_eq!(common::count_rows(&app, "sale_details").await, 0);
    assert_eq!(common::count_rows(&app, "audit_logs").await, 0);
}
