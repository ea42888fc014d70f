//! Error types for mcws-state

use std::fmt;

/// Result type for mcws-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while keeping state in sync
#[derive(Debug)]
pub enum StateError {
    /// Error from the media server
    Api(mcws_api::ApiError),

    /// Invalid coordinator configuration
    Config(String),

    /// The coordinator has been shut down
    ShutDown,
}

impl StateError {
    /// True when the underlying cause is a connectivity or credential failure
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, StateError::Api(err) if err.is_connection_failure())
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Api(err) => write!(f, "API error: {}", err),
            StateError::Config(msg) => write!(f, "Configuration error: {}", msg),
            StateError::ShutDown => write!(f, "Coordinator has been shut down"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<mcws_api::ApiError> for StateError {
    fn from(err: mcws_api::ApiError) -> Self {
        StateError::Api(err)
    }
}
