//! `PostgreSQL` adapters for task and activity log persistence.

mod activity_log;
mod blocking;
mod models;
mod repository;
mod schema;
mod unit_of_work;

pub use activity_log::PostgresActivityLog;
pub use blocking::TaskPgPool;
pub use repository::PostgresTaskRepository;
pub use unit_of_work::PostgresTaskUnitOfWork;
