use crate::connection::FailedAttempt;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Could not connect to any of the {} configured database endpoints", .failed.len())]
    Bootstrap { failed: Vec<FailedAttempt> },

    #[error("Lost contact with the database: {0}")]
    Connectivity(#[source] sqlx::Error),

    #[error("Database query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Stored data could not be read back: {0}")]
    Decode(String),

    #[error("Unsupported database backend: {0}")]
    UnsupportedBackend(String),
}

impl DbError {
    /// True for failures caused by the service being unreachable rather than by
    /// the statement itself.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, DbError::Connectivity(_) | DbError::Bootstrap { .. })
    }
}

/// Splits sqlx failures into transport problems and statement problems.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DbError::Connectivity(err),
            other => DbError::Query(other),
        }
    }
}
