//! Page-number pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Query-string parameters accepted by paginated endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageParams {
    pub page_number: i64,
    pub page_size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Rejects non-positive page coordinates before any query runs.
    pub fn ensure_valid(&self) -> Result<(), AppError> {
        if self.page_number <= 0 || self.page_size <= 0 {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "pageNumber and pageSize must be greater than zero"
            )));
        }
        Ok(())
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page_number - 1) * self.page_size
    }
}

/// One page of results plus the total row count for the filter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_records: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(params: &PageParams, total_records: i64, items: Vec<T>) -> Self {
        Self {
            total_records,
            page_number: params.page_number,
            page_size: params.page_size,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size, 5);
    }

    #[test]
    fn accepts_camel_case_keys() {
        let params: PageParams = serde_json::from_str(r#"{"pageNumber": 3, "pageSize": 10}"#).unwrap();
        assert_eq!(params.page_number, 3);
        assert_eq!(params.page_size, 10);
    }

    #[test]
    fn rejects_non_positive_coordinates() {
        let params = PageParams { page_number: 0, page_size: 5 };
        assert!(params.ensure_valid().is_err());

        let params = PageParams { page_number: 1, page_size: -2 };
        assert!(params.ensure_valid().is_err());

        let params = PageParams { page_number: 1, page_size: 5 };
        assert!(params.ensure_valid().is_ok());
    }

    #[test]
    fn offset_skips_earlier_pages() {
        let params = PageParams { page_number: 3, page_size: 10 };
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 10);
    }
}
