use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }
}

/// Boxed error returned by external data sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Failures that abort a championship computation.
///
/// Per-session fetch failures are not represented here: they are logged and
/// the session is skipped.
#[derive(Debug, Error)]
pub enum ChampionshipError {
    #[error("Failed to fetch season sessions: {0}")]
    Sessions(#[source] SourceError),

    #[error("Failed to fetch league roster: {0}")]
    Roster(#[source] SourceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
