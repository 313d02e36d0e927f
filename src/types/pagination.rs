//! Offset pagination for list endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::{DEFAULT_PAGE_SIZE, DEFAULT_SKIP, MAX_PAGE_SIZE};

/// `?skip=&limit=` query parameters shared by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Rows to skip
    #[serde(default = "default_skip")]
    #[param(default = 0, minimum = 0)]
    pub skip: u64,
    /// Maximum rows to return (capped)
    #[serde(default = "default_limit")]
    #[param(default = 100, minimum = 1)]
    pub limit: u64,
}

fn default_skip() -> u64 {
    DEFAULT_SKIP
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// Rows to skip in the query
    pub fn offset(&self) -> u64 {
        self.skip
    }

    /// Limit capped at `MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `?limit=` for ranked listings such as recent posts or popular categories
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// How many rows to return; the endpoint picks a default when absent
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 100);
    }

    #[test]
    fn test_limit_is_capped() {
        let params = PaginationParams::new(10, 10_000);
        assert_eq!(params.offset(), 10);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }
}
