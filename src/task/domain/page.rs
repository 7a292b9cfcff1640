//! Pagination request and result values.

use super::TaskDomainError;
use crate::config::PaginationConfig;
use serde::Serialize;

/// Validated one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Creates a page request, bounding `limit` by `config.max_limit`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPage`] for a page below one and
    /// [`TaskDomainError::InvalidLimit`] for a limit outside
    /// `1..=config.max_limit`.
    pub fn new(page: i64, limit: i64, config: &PaginationConfig) -> Result<Self, TaskDomainError> {
        let valid_page = u32::try_from(page)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or(TaskDomainError::InvalidPage(page))?;
        let valid_limit = u32::try_from(limit)
            .ok()
            .filter(|value| (1..=config.max_limit).contains(value))
            .ok_or(TaskDomainError::InvalidLimit {
                limit,
                max: config.max_limit,
            })?;
        Ok(Self {
            page: valid_page,
            limit: valid_limit,
        })
    }

    /// Builds a page request from optional query values, falling back to
    /// page one and the configured default limit.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`PageRequest::new`].
    pub fn from_query(
        page: Option<i64>,
        limit: Option<i64>,
        config: &PaginationConfig,
    ) -> Result<Self, TaskDomainError> {
        Self::new(
            page.unwrap_or(1),
            limit.unwrap_or_else(|| i64::from(config.default_limit)),
            config,
        )
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns the number of items preceding this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: PaginationConfig::default().default_limit,
        }
    }
}

/// One page of results with the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of matching items across all pages.
    pub total: u64,
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl<T> Page<T> {
    /// Creates a page for `request`.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
        }
    }
}
