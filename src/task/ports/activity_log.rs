//! Append-only activity log port.

use crate::identity::domain::UserId;
use crate::task::domain::{ActivityEntry, NewActivityEntry, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for activity log operations.
pub type ActivityLogResult<T> = Result<T, ActivityLogError>;

/// Activity log persistence contract.
///
/// `append` is the only write. Implementations assign strictly increasing
/// entry identifiers and never mutate or remove stored entries, including
/// entries whose task has since been deleted.
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Appends an entry and returns it with its assigned identifier.
    async fn append(&self, entry: NewActivityEntry) -> ActivityLogResult<ActivityEntry>;

    /// Returns every entry recorded for `task_id`, in any order.
    async fn list_by_task(&self, task_id: TaskId) -> ActivityLogResult<Vec<ActivityEntry>>;

    /// Returns every entry performed by `user_id`, in any order.
    async fn list_by_user(&self, user_id: UserId) -> ActivityLogResult<Vec<ActivityEntry>>;
}

/// Errors returned by activity log implementations.
#[derive(Debug, Clone, Error)]
pub enum ActivityLogError {
    /// Persistence-layer failure.
    #[error("activity log persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActivityLogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
