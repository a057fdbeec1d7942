use std::time::Duration;

use redis::RedisError;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors raised by `LinkStore` backends
#[derive(Error, Debug)]
pub enum StoreError {
    /// Postgres connection or query errors
    #[error("Database error: {0}")]
    Database(SqlxError),

    /// Redis connection or command errors
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    /// A stored record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No record under the requested short id
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The short id is already taken
    #[error("Conflict error: {0}")]
    Conflict(String),

    /// The record violates a storage constraint
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The backend did not answer in time
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => Self::NotFound("Resource not found".to_string()),
            SqlxError::Database(db_err) => {
                // PostgreSQL error codes for common constraints
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        // Unique violation
                        "23505" => return Self::Conflict("Short id already exists".to_string()),
                        // Foreign key violation
                        "23503" => {
                            return Self::InvalidData(
                                "Referenced resource does not exist".to_string(),
                            )
                        }
                        // Check constraint violation
                        "23514" => {
                            return Self::InvalidData("Data violates constraints".to_string())
                        }
                        _ => {}
                    }
                }
                Self::Database(SqlxError::Database(db_err))
            }
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = StoreError::from(SqlxError::RowNotFound);
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn other_sqlx_errors_stay_database_errors() {
        let err = StoreError::from(SqlxError::PoolTimedOut);
        assert!(matches!(err, StoreError::Database(_)));
    }
}
