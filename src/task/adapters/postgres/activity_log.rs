//! `PostgreSQL` implementation of the append-only activity log.

use super::{
    blocking::{BlockingFailure, TaskPgPool, run_blocking},
    models::{ActivityRow, NewActivityRow},
    schema::activity_log,
};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{ActivityAction, ActivityEntry, ActivityEntryId, NewActivityEntry, TaskId},
    ports::{ActivityLogError, ActivityLogRepository, ActivityLogResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed activity log. Identifiers come from a `BIGSERIAL`
/// sequence.
#[derive(Debug, Clone)]
pub struct PostgresActivityLog {
    pool: TaskPgPool,
}

impl PostgresActivityLog {
    /// Creates a new activity log from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> ActivityLogResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ActivityLogResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, f, blocking_error).await
    }
}

fn blocking_error(failure: BlockingFailure) -> ActivityLogError {
    ActivityLogError::persistence(failure)
}

#[async_trait]
impl ActivityLogRepository for PostgresActivityLog {
    async fn append(&self, entry: NewActivityEntry) -> ActivityLogResult<ActivityEntry> {
        self.run(move |connection| append_entry(connection, entry)).await
    }

    async fn list_by_task(&self, task_id: TaskId) -> ActivityLogResult<Vec<ActivityEntry>> {
        self.run(move |connection| {
            let rows = activity_log::table
                .filter(activity_log::task_id.eq(task_id.into_inner()))
                .order((activity_log::recorded_at.asc(), activity_log::id.asc()))
                .select(ActivityRow::as_select())
                .load::<ActivityRow>(connection)
                .map_err(ActivityLogError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }

    async fn list_by_user(&self, user_id: UserId) -> ActivityLogResult<Vec<ActivityEntry>> {
        self.run(move |connection| {
            let rows = activity_log::table
                .filter(activity_log::user_id.eq(user_id.into_inner()))
                .order((activity_log::recorded_at.desc(), activity_log::id.desc()))
                .select(ActivityRow::as_select())
                .load::<ActivityRow>(connection)
                .map_err(ActivityLogError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }
}

pub(super) fn append_entry(
    connection: &mut PgConnection,
    entry: NewActivityEntry,
) -> ActivityLogResult<ActivityEntry> {
    let new_row = NewActivityRow {
        task_id: entry.task_id.into_inner(),
        user_id: entry.user_id.into_inner(),
        action: entry.action.as_str().to_owned(),
        details: entry.details.clone(),
        subject_user: entry.subject_user.map(UserId::into_inner),
        recorded_at: entry.timestamp,
    };
    let row = diesel::insert_into(activity_log::table)
        .values(&new_row)
        .returning(ActivityRow::as_returning())
        .get_result::<ActivityRow>(connection)
        .map_err(ActivityLogError::persistence)?;
    Ok(entry.into_entry(ActivityEntryId::new(row.id)))
}

fn row_to_entry(row: ActivityRow) -> ActivityLogResult<ActivityEntry> {
    let ActivityRow {
        id,
        task_id,
        user_id,
        action,
        details,
        subject_user,
        recorded_at,
    } = row;

    let persisted_action =
        ActivityAction::try_from(action.as_str()).map_err(ActivityLogError::persistence)?;
    let entry = NewActivityEntry {
        task_id: TaskId::from_uuid(task_id),
        user_id: UserId::from_uuid(user_id),
        action: persisted_action,
        details,
        subject_user: subject_user.map(UserId::from_uuid),
        timestamp: recorded_at,
    };
    Ok(entry.into_entry(ActivityEntryId::new(id)))
}
