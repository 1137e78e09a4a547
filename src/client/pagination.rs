//! Pagination helpers for API requests
//!
//! dbt Cloud list endpoints are offset based: `offset` and `limit` query
//! parameters, with the total reported under `extra.pagination`.

use serde::{Deserialize, Serialize};

/// Maximum page size accepted by dbt Cloud list endpoints.
pub const MAX_PAGE_SIZE: usize = 100;

/// Pagination parameters for API requests.
///
/// # Example
/// ```ignore
/// let params = PaginationParams::new().limit(50).offset(100);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PaginationParams {
    /// Number of items to skip
    pub offset: Option<usize>,
    /// Number of items per page (default and max: 100)
    pub limit: Option<usize>,
}

impl PaginationParams {
    /// Create new pagination params with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the page size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Convert to query string parameters.
    ///
    /// `limit` is always sent, clamped to [`MAX_PAGE_SIZE`].
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let limit = self.limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let mut params = vec![("limit", limit.to_string())];

        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }

        params
    }
}

/// Pagination block under `extra` in list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Items in this page
    #[serde(default)]
    pub count: Option<usize>,

    /// Items across all pages
    #[serde(default)]
    pub total_count: Option<usize>,
}

/// `extra` block of a dbt Cloud response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseExtra {
    #[serde(default)]
    pub pagination: Option<PageInfo>,
}

/// A page of results with the total needed to walk the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    /// The data items for this page
    pub data: Vec<T>,

    #[serde(default)]
    pub extra: Option<ResponseExtra>,
}

impl<T> PagedResponse<T> {
    /// Total item count, when the endpoint reports one.
    pub fn total_count(&self) -> Option<usize> {
        self.extra
            .as_ref()
            .and_then(|e| e.pagination.as_ref())
            .and_then(|p| p.total_count)
    }

    /// Offset of the next page after this one, or `None` when this was the last.
    pub fn next_offset(&self, offset: usize) -> Option<usize> {
        if self.data.is_empty() {
            return None;
        }

        let next = offset + self.data.len();
        match self.total_count() {
            Some(total) if next < total => Some(next),
            _ => None,
        }
    }
}
