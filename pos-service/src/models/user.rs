//! User accounts and the roles that gate privileged endpoints.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use validator::ValidationError;

/// Role attached to every user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Empleado,
    Jefe,
}

impl UserRole {
    /// String representation stored in the database and carried in tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empleado => "Empleado",
            Self::Jefe => "Jefe",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Empleado" => Ok(Self::Empleado),
            "Jefe" => Ok(Self::Jefe),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Field validator for role values arriving over the wire.
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    if UserRole::from_str(role).is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("role");
        err.message = Some("role must be 'Empleado' or 'Jefe'".into());
        Err(err)
    }
}

/// User row. Credential and session columns never leave the service.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token_expiry: Option<DateTime<Utc>>,
}

/// Insert payload once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(UserRole::from_str("Jefe").unwrap(), UserRole::Jefe);
        assert_eq!(UserRole::Empleado.as_str(), "Empleado");
    }

    #[test]
    fn unknown_roles_are_rejected() {
        assert!(UserRole::from_str("Gerente").is_err());
        assert!(validate_role("Gerente").is_err());
        assert!(validate_role("Empleado").is_ok());
    }
}
