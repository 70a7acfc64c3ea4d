//! User management handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use pos_core::{AppError, Page, PageParams, ValidatedJson};

use crate::dtos::users::{CreateUserRequest, UpdateUserRequest, UserListFilter};
use crate::models::{NewUser, User};
use crate::utils::password::hash_password;
use crate::AppState;

/// List users with pagination and optional email and role filters.
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
    Query(filter): Query<UserListFilter>,
) -> Result<Json<Page<User>>, AppError> {
    page.ensure_valid()?;
    let users = state.db.list_users(&filter, &page).await?;
    Ok(Json(users))
}

/// Fetch a single user.
///
/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User {} not found", id)))?;
    Ok(Json(user))
}

/// Create a user; the password is hashed before it reaches the database.
///
/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let password_hash = hash_password(&req.password)?;

    let user = state
        .db
        .create_user(&NewUser {
            first_name: req.first_name.clone().unwrap_or_default(),
            last_name: req.last_name.clone().unwrap_or_default(),
            email: req.email.clone(),
            password_hash,
            role: req.role.clone(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Replace a user's profile; the password only changes when one is supplied.
///
/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<StatusCode, AppError> {
    let password_hash = match &req.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    state
        .db
        .update_user(id, &req, password_hash.as_deref())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.db.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
