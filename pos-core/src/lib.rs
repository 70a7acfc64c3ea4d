//! pos-core: Shared infrastructure for the point-of-sale backend.
pub mod error;
pub mod money;
pub mod pagination;
pub mod validation;

pub use error::{AppError, ErrorResponse};
pub use money::Money;
pub use pagination::{Page, PageParams};
pub use validation::ValidatedJson;
