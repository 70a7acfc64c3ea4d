//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use pos_core::{AppError, ValidatedJson};

use crate::dtos::auth::{LoginRequest, RefreshTokenRequest, RegisterRequest, RegisterResponse};
use crate::services::TokenResponse;
use crate::AppState;

/// Register a new user.
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let response = state.auth.register(&req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email and password.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = state.auth.login(&req).await?;
    Ok(Json(tokens))
}

/// Rotate a refresh token into a new token pair.
///
/// POST /api/auth/refresh-token
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}
