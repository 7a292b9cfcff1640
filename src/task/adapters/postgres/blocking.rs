//! Offloads synchronous Diesel work from the async executor.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Infrastructure failure raised outside the caller's closure.
#[derive(Debug, thiserror::Error)]
pub(super) enum BlockingFailure {
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// Pool checkout failures and join errors are converted with `map_err`.
pub(super) async fn run_blocking<F, T, E>(
    pool: &TaskPgPool,
    f: F,
    map_err: fn(BlockingFailure) -> E,
) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool
            .get()
            .map_err(|err| map_err(BlockingFailure::Pool(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| map_err(BlockingFailure::Join(err)))?
}
