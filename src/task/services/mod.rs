//! Application services for task lifecycle orchestration.

mod error;
mod lifecycle;

pub use error::{ErrorKind, StoreFailure, TaskLifecycleError, TaskLifecycleResult};
pub use lifecycle::{CreateTaskRequest, TaskLifecycleService, UpdateTaskRequest};
