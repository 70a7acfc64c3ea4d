pub mod auth;
pub mod database;
pub mod jwt;
pub mod sales;

pub use auth::AuthService;
pub use database::Database;
pub use jwt::{AccessTokenClaims, JwtService, TokenResponse};
pub use sales::{remaining_stock, SaleError};
