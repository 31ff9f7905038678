use thiserror::Error;

/// SQLite primary/extended result codes that signal lock contention
/// rather than a broken statement: BUSY, LOCKED, BUSY_RECOVERY,
/// LOCKED_SHAREDCACHE, BUSY_SNAPSHOT.
const CONTENTION_CODES: &[&str] = &["5", "6", "261", "262", "517"];

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[source] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// Another writer held the task's rows. Never shown to callers; the
    /// unit of work is re-run from a fresh transaction instead.
    #[error("Storage contention: {0}")]
    Conflict(String),
}

impl CoreError {
    pub fn not_found(what: &str) -> Self {
        CoreError::NotFound(format!("{what} not found"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    /// Whether re-running the same unit of work may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CoreError::Conflict(_) | CoreError::Io(_) => true,
            CoreError::Database(e) => matches!(e, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                if CONTENTION_CODES.iter().any(|c| *c == code) {
                    return CoreError::Conflict(db_err.message().to_string());
                }
            }
        }
        CoreError::Database(err)
    }
}
