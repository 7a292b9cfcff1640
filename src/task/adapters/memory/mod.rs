//! In-memory adapters for task storage and the activity log.

mod activity_log;
mod task;

pub use activity_log::InMemoryActivityLog;
pub use task::InMemoryTaskRepository;
