use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("State management error: {0}")]
    State(#[from] mcws_state::StateError),

    #[error("API error: {0}")]
    Api(#[from] mcws_api::ApiError),

    /// A browse cursor that does not resolve to anything
    #[error("Media not found: {content_type} / {content_id}")]
    BrowseNotFound {
        content_type: String,
        content_id: String,
    },

    #[error("Invalid media content id: {0}")]
    InvalidContentId(String),

    #[error("Invalid service call: {0}")]
    InvalidServiceCall(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Host already configured: {0}")]
    AlreadyConfigured(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SdkError {
    pub fn browse_not_found(content_type: impl Into<String>, content_id: impl Into<String>) -> Self {
        SdkError::BrowseNotFound {
            content_type: content_type.into(),
            content_id: content_id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
