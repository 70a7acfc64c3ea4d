pub mod auth;
pub mod catalog;
pub mod sales;
pub mod users;
