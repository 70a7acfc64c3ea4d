use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pos_core::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Issues and validates the signed access tokens carried on API requests.
///
/// Refresh tokens are deliberately not JWTs; they are opaque values stored
/// against the user row and rotated on every use.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
}

/// Claims for access tokens (short-lived)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Role used for endpoint authorization
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

/// Token pair returned to the client after register, login and refresh.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        if config.secret.is_empty() {
            return Err(anyhow::anyhow!("JWT secret must not be empty"));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
        })
    }

    /// Generate a signed access token for a user
    pub fn generate_access_token(&self, user_id: i64, role: &str) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))?;

        Ok(token)
    }

    /// Validate and decode an access token
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Resolve the bearer token on a request into verified claims.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AccessTokenClaims, AppError> {
        let token = bearer_token(headers).ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("missing or malformed Authorization header"))
        })?;

        self.validate_access_token(token)
            .map_err(|_| AppError::Unauthorized(anyhow::anyhow!("invalid or expired access token")))
    }

    /// Get access token expiry in seconds (for client info)
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_round_trip() -> Result<(), anyhow::Error> {
        let service = JwtService::new(&test_config("a-long-enough-test-secret"))?;

        let token = service.generate_access_token(42, "Jefe")?;
        assert!(!token.is_empty());

        let claims = service.validate_access_token(&token)?;
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "Jefe");
        assert!(!claims.jti.is_empty());

        Ok(())
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() -> Result<(), anyhow::Error> {
        let issuer = JwtService::new(&test_config("secret-number-one"))?;
        let verifier = JwtService::new(&test_config("secret-number-two"))?;

        let token = issuer.generate_access_token(1, "Empleado")?;
        assert!(verifier.validate_access_token(&token).is_err());

        Ok(())
    }

    #[test]
    fn expired_tokens_are_rejected() -> Result<(), anyhow::Error> {
        // Negative expiry puts `exp` far enough in the past to beat the
        // default validation leeway.
        let config = JwtConfig {
            secret: "a-long-enough-test-secret".to_string(),
            access_token_expiry_minutes: -5,
            refresh_token_expiry_days: 7,
        };
        let service = JwtService::new(&config)?;

        let token = service.generate_access_token(7, "Empleado")?;
        assert!(service.validate_access_token(&token).is_err());

        Ok(())
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(JwtService::new(&test_config("")).is_err());
    }

    #[test]
    fn authenticate_requires_a_bearer_header() -> Result<(), anyhow::Error> {
        let service = JwtService::new(&test_config("a-long-enough-test-secret"))?;

        let empty = HeaderMap::new();
        assert!(service.authenticate(&empty).is_err());

        let mut basic = HeaderMap::new();
        basic.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse()?);
        assert!(service.authenticate(&basic).is_err());

        let token = service.generate_access_token(9, "Empleado")?;
        let mut bearer = HeaderMap::new();
        bearer.insert(header::AUTHORIZATION, format!("Bearer {}", token).parse()?);
        let claims = service.authenticate(&bearer)?;
        assert_eq!(claims.sub, "9");

        Ok(())
    }
}
