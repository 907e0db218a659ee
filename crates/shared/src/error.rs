//! Error types for the post store

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Post not found")]
    NotFound,
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => {
                match db_err.code().as_deref() {
                    // PostgreSQL check_violation / not_null_violation
                    Some("23514") | Some("23502") => {
                        StoreError::ValidationFailed(db_err.message().to_string())
                    }
                    _ => StoreError::Unavailable(db_err.to_string()),
                }
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_pool_errors_map_to_unavailable() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err: StoreError = sqlx::Error::PoolClosed.into();
        assert!(err.to_string().starts_with("Store unavailable"));
    }
}
