use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::any::install_default_drivers;
use sqlx::AnyConnection;
use sqlx::Connection;
use std::time::Duration;

const MYSQL_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        section VARCHAR(50),
        math DOUBLE DEFAULT 0,
        science DOUBLE DEFAULT 0,
        english DOUBLE DEFAULT 0,
        average DOUBLE DEFAULT 0,
        remarks VARCHAR(50),
        created_at DATETIME,
        updated_at DATETIME
    )
"#;

// AUTOINCREMENT keeps SQLite from handing out the id of a deleted row again.
const SQLITE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(100) NOT NULL,
        section VARCHAR(50),
        math DOUBLE DEFAULT 0,
        science DOUBLE DEFAULT 0,
        english DOUBLE DEFAULT 0,
        average DOUBLE DEFAULT 0,
        remarks VARCHAR(50),
        created_at DATETIME,
        updated_at DATETIME
    )
"#;

/// A candidate endpoint that refused, failed or timed out during bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedAttempt {
    /// Password-free description of the endpoint.
    pub endpoint: String,
    pub reason: String,
}

/// The outcome of a successful bootstrap.
pub struct Bootstrapped {
    pub connection: AnyConnection,
    /// The endpoint that accepted the connection.
    pub endpoint: String,
    /// The candidates tried (and rejected) before it.
    pub failed: Vec<FailedAttempt>,
}

/// Establishes the session's database connection.
///
/// The configured candidates are tried strictly in order, each bounded by the
/// connect timeout, with no backoff between them. The first endpoint that
/// accepts a connection wins and gets the `students` table created if it is
/// missing. When every candidate fails the result is `DbError::Bootstrap`,
/// which the application treats as fatal.
pub async fn connect(settings: &DatabaseSettings) -> Result<Bootstrapped, DbError> {
    install_default_drivers();

    let timeout = settings.connect_timeout();
    let mut failed = Vec::new();

    for endpoint in &settings.candidates {
        let description = endpoint.describe();
        tracing::info!(endpoint = %description, "Trying database endpoint.");

        let attempt = match endpoint.url() {
            Ok(url) => open(&url, timeout).await,
            Err(e) => Err(e.to_string()),
        };
        match attempt {
            Ok(mut connection) => {
                ensure_schema(&mut connection).await?;
                tracing::info!(
                    endpoint = %description,
                    backend = connection.backend_name(),
                    "Connected to database."
                );
                return Ok(Bootstrapped {
                    connection,
                    endpoint: description,
                    failed,
                });
            }
            Err(reason) => {
                tracing::warn!(endpoint = %description, %reason, "Connection attempt failed.");
                failed.push(FailedAttempt {
                    endpoint: description,
                    reason,
                });
            }
        }
    }

    tracing::error!(attempted = failed.len(), "No database endpoint accepted a connection.");
    Err(DbError::Bootstrap { failed })
}

/// Connects to a single URL and ensures the schema exists.
pub async fn connect_url(url: &str) -> Result<AnyConnection, DbError> {
    install_default_drivers();
    let mut connection = AnyConnection::connect(url).await?;
    ensure_schema(&mut connection).await?;
    Ok(connection)
}

/// Creates the `students` table if it does not exist yet, using the DDL
/// dialect of the connected backend.
pub async fn ensure_schema(connection: &mut AnyConnection) -> Result<(), DbError> {
    let ddl = match connection.backend_name() {
        "MySQL" => MYSQL_SCHEMA,
        "SQLite" => SQLITE_SCHEMA,
        other => return Err(DbError::UnsupportedBackend(other.to_string())),
    };
    sqlx::query(ddl).execute(&mut *connection).await?;
    tracing::debug!("Table 'students' ready.");
    Ok(())
}

async fn open(url: &str, timeout: Duration) -> Result<AnyConnection, String> {
    match tokio::time::timeout(timeout, AnyConnection::connect(url)).await {
        Ok(Ok(connection)) => Ok(connection),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("timed out after {}s", timeout.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::Endpoint;

    fn url(url: &str) -> Endpoint {
        Endpoint::Url {
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn first_reachable_candidate_wins() {
        let settings = DatabaseSettings {
            candidates: vec![
                url("sqlite:///nonexistent-dir/for-sure/grades.db"),
                url("sqlite::memory:"),
            ],
            connect_timeout_secs: 5,
        };

        let bootstrapped = connect(&settings).await.unwrap();

        assert_eq!(bootstrapped.endpoint, "sqlite::memory:");
        assert_eq!(bootstrapped.failed.len(), 1);
        assert_eq!(
            bootstrapped.failed[0].endpoint,
            "sqlite:///nonexistent-dir/for-sure/grades.db"
        );
    }

    #[tokio::test]
    async fn all_candidates_failing_is_a_bootstrap_error() {
        let settings = DatabaseSettings {
            candidates: vec![
                url("sqlite:///nonexistent-dir/a.db"),
                url("sqlite:///nonexistent-dir/b.db"),
            ],
            connect_timeout_secs: 5,
        };

        match connect(&settings).await {
            Err(DbError::Bootstrap { failed }) => assert_eq!(failed.len(), 2),
            Err(other) => panic!("expected bootstrap failure, got {other:?}"),
            Ok(_) => panic!("expected bootstrap failure, got a connection"),
        }
    }

    #[tokio::test]
    async fn schema_creation_is_idempotent() {
        let mut connection = connect_url("sqlite::memory:").await.unwrap();
        ensure_schema(&mut connection).await.unwrap();
        ensure_schema(&mut connection).await.unwrap();
    }
}
