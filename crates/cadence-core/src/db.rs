use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::RetryPolicy;

// Re-export the pool for use in other parts of the core crate
pub use sqlx::SqlitePool as DbPool;

/// Busy timeout applied to every pooled connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn connect_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(DEFAULT_BUSY_TIMEOUT)
}

/// Establishes a connection pool to the SQLite database and runs migrations.
///
/// The parent directory and the database file are created when missing.
pub async fn establish_connection(db_path: impl AsRef<Path>) -> Result<DbPool, CoreError> {
    let db_path = db_path.as_ref();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options(db_path))
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!(path = %db_path.display(), "database ready");
    Ok(pool)
}

/// Runs `op` until it succeeds, fails with a non-transient error, or the
/// policy's attempts are used up. Each attempt must be a complete unit of
/// work (its own transaction); the delay doubles after every failure.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = Duration::from_millis(policy.base_delay_ms);
    let mut attempt = 1;

    loop {
        match op().await {
            Err(e) if e.is_transient() && attempt < max_attempts => {
                tracing::warn!(attempt, max_attempts, error = %e, "transient storage failure, retrying");
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            result => return result,
        }
    }
}
