use thiserror::Error;

/// Errors raised by a [`MediaServer`](crate::MediaServer) implementation
///
/// The two connection failures (`Connectivity` and `Auth`) are the ones the
/// coordinator and command dispatcher absorb. The remaining variants describe
/// a request the server refused or answered with something unreadable, and are
/// surfaced to the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure
    ///
    /// The server is unreachable, the socket was reset, or the request timed
    /// out inside the client.
    #[error("Cannot connect to media server: {0}")]
    Connectivity(String),

    /// The server rejected the configured credentials
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// The server refused a request parameter
    ///
    /// Covers unknown zones, browse node ids that no longer exist and
    /// out-of-range command codes.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The server answered but the response could not be interpreted
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ApiError {
    /// True for the failures that mean "the server cannot be talked to right now"
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, ApiError::Connectivity(_) | ApiError::Auth(_))
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
