//! Client event error types
//!
//! Errors raised while handling a client event never reach the client. The
//! WebSocket dispatcher logs them and moves on.

use postboard_shared::StoreError;

/// Failure while handling a single client event
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EventError {
    /// Rejections caused by the client rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EventError::Validation(_) | EventError::Store(StoreError::ValidationFailed(_))
        )
    }
}

/// Result type alias for client event handlers
pub type EventResult<T> = Result<T, EventError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(EventError::Validation("author is required".into()).is_client_error());
        assert!(EventError::Store(StoreError::ValidationFailed("empty".into())).is_client_error());
        assert!(!EventError::Store(StoreError::Unavailable("down".into())).is_client_error());
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: EventError = StoreError::Unavailable("connection refused".into()).into();
        assert_eq!(err.to_string(), "Store unavailable: connection refused");
    }
}
