//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The requested page number is not positive.
    #[error("invalid page {0}, expected a positive integer")]
    InvalidPage(i64),

    /// The requested page size is not positive or exceeds the maximum.
    #[error("invalid page limit {limit}, expected 1..={max}")]
    InvalidLimit {
        /// Requested limit.
        limit: i64,
        /// Largest accepted limit.
        max: u32,
    },
}

/// Error returned while parsing activity actions from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown activity action: {0}")]
pub struct ParseActivityActionError(pub String);
