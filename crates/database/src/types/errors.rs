//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    /// A unique constraint rejected the write. Holds the offending column.
    #[error("Duplicate value for column: {0}")]
    Duplicate(String),

    #[error("Invalid data in column {column}: {message}")]
    InvalidData { column: String, message: String },
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DatabaseError::Duplicate(unique_column(db_err.message()));
            }
        }
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionError(err.to_string())
            }
            other => DatabaseError::QueryError(other.to_string()),
        }
    }
}

/// Extract the column from a SQLite message such as
/// `UNIQUE constraint failed: users.email`.
fn unique_column(message: &str) -> String {
    message
        .rsplit(':')
        .next()
        .map(str::trim)
        .and_then(|target| target.split(',').next())
        .map(|target| target.rsplit('.').next().unwrap_or(target).trim().to_string())
        .unwrap_or_default()
}
