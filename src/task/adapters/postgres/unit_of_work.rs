//! Transactional task write plus activity append for `PostgreSQL`.

use super::{
    activity_log::append_entry,
    blocking::{BlockingFailure, TaskPgPool, run_blocking},
    models::{NewTaskRow, TaskChangeset},
    repository::{delete_task, insert_task, to_changeset, to_new_row, update_task},
};
use crate::task::{
    domain::{ActivityEntry, NewActivityEntry, TaskId},
    ports::{TaskRepositoryError, TaskUnitOfWork, TaskWrite, UnitOfWorkError, UnitOfWorkResult},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

/// Runs the task statement and the activity insert in one `PostgreSQL`
/// transaction.
#[derive(Debug, Clone)]
pub struct PostgresTaskUnitOfWork {
    pool: TaskPgPool,
}

impl PostgresTaskUnitOfWork {
    /// Creates a unit of work from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

/// Row-level form of a [`TaskWrite`], ready for the blocking pool.
enum PendingWrite {
    Insert(TaskId, NewTaskRow),
    Update(TaskId, TaskChangeset),
    Delete(TaskId),
}

impl From<TaskWrite> for PendingWrite {
    fn from(write: TaskWrite) -> Self {
        match write {
            TaskWrite::Insert(task) => Self::Insert(task.id(), to_new_row(&task)),
            TaskWrite::Update(task) => Self::Update(task.id(), to_changeset(&task)),
            TaskWrite::Delete(id) => Self::Delete(id),
        }
    }
}

impl From<DieselError> for UnitOfWorkError {
    fn from(err: DieselError) -> Self {
        Self::Tasks(TaskRepositoryError::persistence(err))
    }
}

fn blocking_error(failure: BlockingFailure) -> UnitOfWorkError {
    UnitOfWorkError::Tasks(TaskRepositoryError::persistence(failure))
}

#[async_trait]
impl TaskUnitOfWork for PostgresTaskUnitOfWork {
    async fn commit(
        &self,
        write: TaskWrite,
        entry: NewActivityEntry,
    ) -> UnitOfWorkResult<ActivityEntry> {
        let pending = PendingWrite::from(write);

        run_blocking(
            &self.pool,
            move |connection| {
                connection.transaction::<_, UnitOfWorkError, _>(|tx_conn| {
                    match pending {
                        PendingWrite::Insert(id, row) => insert_task(tx_conn, id, &row)?,
                        PendingWrite::Update(id, changeset) => {
                            update_task(tx_conn, id, &changeset)?;
                        }
                        PendingWrite::Delete(id) => delete_task(tx_conn, id)?,
                    }
                    Ok(append_entry(tx_conn, entry)?)
                })
            },
            blocking_error,
        )
        .await
    }
}
