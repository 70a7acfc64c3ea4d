pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use services::{AuthService, Database, JwtService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub jwt: JwtService,
    pub auth: AuthService,
}

/// Build the full API router on top of the shared state.
pub fn build_router(state: AppState) -> Router {
    // Sale routes require a valid access token as a group
    let sale_routes = Router::new()
        .route(
            "/api/sales",
            get(handlers::sales::list_sales).post(handlers::sales::create_sale),
        )
        .route("/api/sales/complete", post(handlers::sales::complete_sale))
        .route(
            "/api/sales/:id",
            get(handlers::sales::get_sale)
                .put(handlers::sales::update_sale)
                .delete(handlers::sales::delete_sale),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        // Authentication routes
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh-token", post(handlers::auth::refresh))
        // User management
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/:id",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        // Catalog
        .route(
            "/api/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/api/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/api/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/api/categories/:id",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route(
            "/api/suppliers",
            get(handlers::suppliers::list_suppliers).post(handlers::suppliers::create_supplier),
        )
        .route(
            "/api/suppliers/:id",
            get(handlers::suppliers::get_supplier)
                .put(handlers::suppliers::update_supplier)
                .delete(handlers::suppliers::delete_supplier),
        )
        .merge(sale_routes)
        // Maintenance surface over sale line items and audit records
        .route(
            "/api/sale-details",
            get(handlers::sale_details::list_sale_details)
                .post(handlers::sale_details::create_sale_detail),
        )
        .route(
            "/api/sale-details/:id",
            get(handlers::sale_details::get_sale_detail)
                .put(handlers::sale_details::update_sale_detail)
                .delete(handlers::sale_details::delete_sale_detail),
        )
        .route(
            "/api/audit-logs",
            get(handlers::audit_logs::list_audit_logs)
                .post(handlers::audit_logs::create_audit_log),
        )
        .route(
            "/api/audit-logs/:id",
            get(handlers::audit_logs::get_audit_log)
                .put(handlers::audit_logs::update_audit_log)
                .delete(handlers::audit_logs::delete_audit_log),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(
                    |request: &axum::http::Request<_>| {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            uri = %request.uri(),
                            version = ?request.version(),
                        )
                    },
                ))
                .layer(CorsLayer::permissive()),
        )
}
