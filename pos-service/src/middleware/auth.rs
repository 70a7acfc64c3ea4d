use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use pos_core::error::AppError;

use crate::AppState;

/// Middleware to require authentication
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state.jwt.authenticate(req.headers())?;

    // Store claims in request extensions so handlers can access them
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
