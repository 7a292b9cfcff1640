//! Port for applying a task write and its activity entry as one unit.

use super::{ActivityLogError, TaskRepositoryError};
use crate::task::domain::{ActivityEntry, NewActivityEntry, Task, TaskId};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for unit-of-work commits.
pub type UnitOfWorkResult<T> = Result<T, UnitOfWorkError>;

/// Task store write paired with an activity entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskWrite {
    /// Store a new task.
    Insert(Task),
    /// Persist changes to an existing task.
    Update(Task),
    /// Remove a task.
    Delete(TaskId),
}

/// Transactional write contract.
///
/// Either the task write and the appended entry are both stored, or neither
/// is.
#[async_trait]
pub trait TaskUnitOfWork: Send + Sync {
    /// Applies `write`, appends `entry`, and returns the stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError::Tasks`] when the task write fails and
    /// [`UnitOfWorkError::ActivityLog`] when the append fails. In both cases
    /// nothing was stored.
    async fn commit(
        &self,
        write: TaskWrite,
        entry: NewActivityEntry,
    ) -> UnitOfWorkResult<ActivityEntry>;
}

/// Errors returned by unit-of-work implementations.
#[derive(Debug, Clone, Error)]
pub enum UnitOfWorkError {
    /// The task write failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// The activity append failed.
    #[error(transparent)]
    ActivityLog(#[from] ActivityLogError),
}
