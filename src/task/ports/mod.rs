//! Port contracts for task storage and the activity log.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod activity_log;
pub mod repository;
pub mod unit_of_work;

pub use activity_log::{ActivityLogError, ActivityLogRepository, ActivityLogResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use unit_of_work::{TaskUnitOfWork, TaskWrite, UnitOfWorkError, UnitOfWorkResult};
