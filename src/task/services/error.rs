//! Caller-facing error kinds for task lifecycle operations.

use crate::identity::{domain::UserId, ports::IdentityError};
use crate::task::{
    domain::{ActivityAction, TaskDomainError, TaskId},
    policy::Operation,
    ports::{ActivityLogError, TaskRepositoryError, UnitOfWorkError},
};
use thiserror::Error;

/// Collaborator that failed while serving a request.
#[derive(Debug, Clone, Error)]
pub enum StoreFailure {
    /// The task store failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// The activity log failed.
    #[error(transparent)]
    ActivityLog(#[from] ActivityLogError),
    /// The identity provider failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The task does not exist, or the actor may not know that it does.
    #[error("task {0} not found or not permitted")]
    NotFound(TaskId),

    /// The actor can see the task but lacks the rights for the operation.
    #[error("not permitted to {operation} this task")]
    Unauthorized {
        /// Refused operation.
        operation: Operation,
    },

    /// The assignment target is not a registered user.
    #[error("assignee not found: {0}")]
    AssigneeNotFound(UserId),

    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// A collaborator failed; nothing was retried.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreFailure),

    /// The mutation was applied but its activity entry was not recorded.
    ///
    /// Only raised when the service writes without a unit of work.
    #[error("task {task_id} was {action} but the activity entry was not recorded: {source}")]
    PartialFailure {
        /// Mutated task.
        task_id: TaskId,
        /// Action whose entry is missing.
        action: ActivityAction,
        /// Append failure.
        #[source]
        source: ActivityLogError,
    },
}

/// Discriminant of [`TaskLifecycleError`] for exhaustive matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`TaskLifecycleError::NotFound`].
    NotFound,
    /// See [`TaskLifecycleError::Unauthorized`].
    Unauthorized,
    /// See [`TaskLifecycleError::AssigneeNotFound`].
    AssigneeNotFound,
    /// See [`TaskLifecycleError::Validation`].
    Validation,
    /// See [`TaskLifecycleError::StoreUnavailable`].
    StoreUnavailable,
    /// See [`TaskLifecycleError::PartialFailure`].
    PartialFailure,
}

impl TaskLifecycleError {
    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::AssigneeNotFound(_) => ErrorKind::AssigneeNotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Self::PartialFailure { .. } => ErrorKind::PartialFailure,
        }
    }
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::StoreUnavailable(StoreFailure::Tasks(other)),
        }
    }
}

impl From<ActivityLogError> for TaskLifecycleError {
    fn from(err: ActivityLogError) -> Self {
        Self::StoreUnavailable(StoreFailure::ActivityLog(err))
    }
}

impl From<UnitOfWorkError> for TaskLifecycleError {
    fn from(err: UnitOfWorkError) -> Self {
        match err {
            UnitOfWorkError::Tasks(source) => source.into(),
            UnitOfWorkError::ActivityLog(source) => source.into(),
        }
    }
}

impl From<IdentityError> for TaskLifecycleError {
    fn from(err: IdentityError) -> Self {
        Self::StoreUnavailable(StoreFailure::Identity(err))
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;
