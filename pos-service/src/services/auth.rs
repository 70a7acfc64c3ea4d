//! Authentication workflows: registration, login and refresh rotation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use pos_core::error::AppError;
use rand::RngCore;
use tracing::{info, instrument};

use crate::dtos::auth::{LoginRequest, RegisterRequest, RegisterResponse, UserProfile};
use crate::models::NewUser;
use crate::services::database::Database;
use crate::services::jwt::{JwtService, TokenResponse};
use crate::utils::password::{hash_password, verify_password};

/// Coordinates the database and token services behind the auth endpoints.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt: JwtService,
    refresh_token_expiry_days: i64,
}

impl AuthService {
    pub fn new(db: Database, jwt: JwtService, refresh_token_expiry_days: i64) -> Self {
        Self {
            db,
            jwt,
            refresh_token_expiry_days,
        }
    }

    /// Create an account and sign the new user in.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AppError> {
        if self.db.find_user_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "A user with email '{}' already exists",
                request.email
            )));
        }

        let password_hash = hash_password(&request.password)?;

        let user = self
            .db
            .create_user(&NewUser {
                first_name: request.first_name.clone().unwrap_or_default(),
                last_name: request.last_name.clone().unwrap_or_default(),
                email: request.email.clone(),
                password_hash,
                role: request.role.clone(),
            })
            .await?;

        let tokens = self.issue_tokens(user.id, &user.role).await?;

        info!(user_id = user.id, role = %user.role, "User registered");

        Ok(RegisterResponse {
            user: UserProfile::from(&user),
            tokens,
        })
    }

    /// Verify credentials and issue a fresh token pair.
    ///
    /// Unknown email and wrong password produce the same response so the
    /// endpoint cannot be used to probe which accounts exist.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, AppError> {
        let user = self
            .db
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let tokens = self.issue_tokens(user.id, &user.role).await?;

        info!(user_id = user.id, "User logged in");

        Ok(tokens)
    }

    /// Exchange a refresh token for a new pair; the presented token stops
    /// working as part of the exchange.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let user = self
            .db
            .find_user_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Invalid refresh token")))?;

        let still_valid = user
            .refresh_token_expiry
            .map(|expiry| expiry > Utc::now())
            .unwrap_or(false);
        if !still_valid {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "Refresh token has expired"
            )));
        }

        let tokens = self.issue_tokens(user.id, &user.role).await?;

        info!(user_id = user.id, "Tokens refreshed");

        Ok(tokens)
    }

    /// Mint an access token and rotate the stored refresh token.
    async fn issue_tokens(&self, user_id: i64, role: &str) -> Result<TokenResponse, AppError> {
        let access_token = self.jwt.generate_access_token(user_id, role)?;

        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let refresh_token = URL_SAFE_NO_PAD.encode(bytes);

        let expiry = Utc::now() + Duration::days(self.refresh_token_expiry_days);
        self.db
            .store_refresh_token(user_id, &refresh_token, expiry)
            .await?;

        Ok(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_seconds(),
        })
    }
}
