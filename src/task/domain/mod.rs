//! Domain model for task ownership, assignment, and auditing.
//!
//! The task domain models the task aggregate, its validated fields, the
//! activity entries recorded for every mutation, and pagination values,
//! while keeping all infrastructure concerns outside of the domain boundary.

mod activity;
mod error;
mod ids;
mod page;
mod task;

pub use activity::{ActivityAction, ActivityEntry, NewActivityEntry};
pub use error::{ParseActivityActionError, TaskDomainError};
pub use ids::{ActivityEntryId, TaskId};
pub use page::{Page, PageRequest};
pub use task::{PersistedTaskData, Task, TaskPatch, TaskTitle};
