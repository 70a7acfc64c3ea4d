pub mod audit;
pub mod category;
pub mod product;
pub mod sale;
pub mod supplier;
pub mod user;

pub use audit::{AuditLog, SALE_COMPLETED_ACTION};
pub use category::Category;
pub use product::Product;
pub use sale::{CompleteSale, Sale, SaleDetail, SaleLine, DEFAULT_PAYMENT_METHOD};
pub use supplier::Supplier;
pub use user::{validate_role, NewUser, User, UserRole};
