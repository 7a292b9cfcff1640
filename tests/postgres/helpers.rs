//! Shared helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::{WrapErr, eyre};
use pg_embedded_setup_unpriv::TestCluster;
use taskward::identity::domain::UserId;
use taskward::task::{
    adapters::postgres::{
        PostgresActivityLog, PostgresTaskRepository, PostgresTaskUnitOfWork, TaskPgPool,
    },
    domain::{PersistedTaskData, Task, TaskId, TaskTitle},
};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// SQL creating the task and activity log tables.
pub const CREATE_TABLES_SQL: &str =
    include_str!("../../migrations/2026-01-05-000000_create_tasks_and_activity_log/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskward_test_template";

/// Creates a runtime for driving the async adapters from sync tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> Result<Runtime, eyre::Report> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build test runtime")
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), eyre::Report> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre!("{e}"))?;
            conn.batch_execute(CREATE_TABLES_SQL)
                .map_err(|e| eyre!("{e}"))?;
            Ok(())
        })
        .map_err(|e| eyre!("template setup failed: {e}"))
}

/// Drops a per-test database when the test ends, even on panic.
struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.db_name));
    }
}

/// Per-test database cloned from the template.
///
/// The pool is declared before the guard so its connections close before
/// the database is dropped.
pub struct TestDatabase {
    pool: TaskPgPool,
    url: String,
    _cleanup: CleanupGuard,
}

impl TestDatabase {
    /// Creates a fresh database from the migrated template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template, the database, or the pool cannot be
    /// created.
    pub fn create(cluster: &'static TestCluster, prefix: &str) -> Result<Self, eyre::Report> {
        ensure_template(cluster)?;
        let db_name = format!("{prefix}_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(&db_name, TEMPLATE_DB)
            .map_err(|e| eyre!("create {db_name}: {e}"))?;
        let cleanup = CleanupGuard {
            cluster,
            db_name: db_name.clone(),
        };

        let url = cluster.connection().database_url(&db_name);
        let manager = ConnectionManager::<PgConnection>::new(url.clone());
        let pool = Pool::builder()
            .max_size(2)
            .build(manager)
            .wrap_err("build connection pool")?;
        Ok(Self {
            pool,
            url,
            _cleanup: cleanup,
        })
    }

    /// Returns a task repository on this database.
    #[must_use]
    pub fn tasks(&self) -> PostgresTaskRepository {
        PostgresTaskRepository::new(self.pool.clone())
    }

    /// Returns an activity log on this database.
    #[must_use]
    pub fn activity_log(&self) -> PostgresActivityLog {
        PostgresActivityLog::new(self.pool.clone())
    }

    /// Returns a transactional unit of work on this database.
    #[must_use]
    pub fn unit_of_work(&self) -> PostgresTaskUnitOfWork {
        PostgresTaskUnitOfWork::new(self.pool.clone())
    }

    /// Opens a connection outside the pool for raw SQL.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn raw_connection(&self) -> Result<PgConnection, eyre::Report> {
        PgConnection::establish(&self.url).wrap_err("connect for raw SQL")
    }
}

/// Fixed reference time for persisted rows.
#[must_use]
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Builds a task created `minutes` after [`reference_time`].
///
/// # Errors
///
/// Returns an error if `title` is blank.
pub fn task_created_at(owner: UserId, title: &str, minutes: i64) -> Result<Task, eyre::Report> {
    let created_at = reference_time() + Duration::minutes(minutes);
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: TaskTitle::new(title)?,
        description: None,
        completed: false,
        owner_id: owner,
        assigned_to: None,
        created_at,
        updated_at: created_at,
    }))
}
