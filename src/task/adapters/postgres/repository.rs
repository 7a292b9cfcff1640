//! `PostgreSQL` repository implementation for task storage.

use super::{
    blocking::{BlockingFailure, TaskPgPool, run_blocking},
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{Page, PageRequest, PersistedTaskData, Task, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

/// Column a listing filters on.
#[derive(Debug, Clone, Copy)]
enum ListFilter {
    Owner(uuid::Uuid),
    Assignee(uuid::Uuid),
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, f, blocking_error).await
    }

    async fn list(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        let offset = i64::try_from(page.offset()).map_err(TaskRepositoryError::persistence)?;
        let limit = i64::from(page.limit());
        self.run(move |connection| {
            let total: i64 = filtered(filter)
                .count()
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let rows = filtered(filter)
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .offset(offset)
                .limit(limit)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            let total_count = u64::try_from(total).map_err(TaskRepositoryError::persistence)?;
            Ok(Page::new(items, total_count, page))
        })
        .await
    }
}

fn blocking_error(failure: BlockingFailure) -> TaskRepositoryError {
    TaskRepositoryError::persistence(failure)
}

fn filtered(filter: ListFilter) -> tasks::BoxedQuery<'static, Pg> {
    let query = tasks::table.into_boxed();
    match filter {
        ListFilter::Owner(owner) => query.filter(tasks::owner_id.eq(owner)),
        ListFilter::Assignee(assignee) => query.filter(tasks::assigned_to.eq(assignee)),
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run(move |connection| insert_task(connection, task_id, &new_row)).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);

        self.run(move |connection| update_task(connection, task_id, &changeset)).await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run(move |connection| delete_task(connection, id)).await
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        self.list(ListFilter::Owner(owner.into_inner()), page).await
    }

    async fn list_by_assignee(
        &self,
        assignee: UserId,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        self.list(ListFilter::Assignee(assignee.into_inner()), page)
            .await
    }
}

pub(super) fn insert_task(
    connection: &mut PgConnection,
    task_id: TaskId,
    new_row: &NewTaskRow,
) -> TaskRepositoryResult<()> {
    diesel::insert_into(tasks::table)
        .values(new_row)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                TaskRepositoryError::DuplicateTask(task_id)
            }
            _ => TaskRepositoryError::persistence(err),
        })?;
    Ok(())
}

pub(super) fn update_task(
    connection: &mut PgConnection,
    task_id: TaskId,
    changeset: &TaskChangeset,
) -> TaskRepositoryResult<()> {
    let affected = diesel::update(tasks::table.find(task_id.into_inner()))
        .set(changeset)
        .execute(connection)
        .map_err(TaskRepositoryError::persistence)?;
    if affected == 0 {
        return Err(TaskRepositoryError::NotFound(task_id));
    }
    Ok(())
}

pub(super) fn delete_task(connection: &mut PgConnection, id: TaskId) -> TaskRepositoryResult<()> {
    let affected = diesel::delete(tasks::table.find(id.into_inner()))
        .execute(connection)
        .map_err(TaskRepositoryError::persistence)?;
    if affected == 0 {
        return Err(TaskRepositoryError::NotFound(id));
    }
    Ok(())
}

pub(super) fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        completed: task.is_completed(),
        owner_id: task.owner_id().into_inner(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

pub(super) fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        completed: task.is_completed(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        completed,
        owner_id,
        assigned_to,
        created_at,
        updated_at,
    } = row;

    let persisted_title = TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: persisted_title,
        description,
        completed,
        owner_id: UserId::from_uuid(owner_id),
        assigned_to: assigned_to.map(UserId::from_uuid),
        created_at,
        updated_at,
    }))
}
