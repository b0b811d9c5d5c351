use thiserror::Error;

use crate::transport::TransportError;

/// Maximum number of body bytes kept in a [`VipsptError::Decode`] snippet.
pub(crate) const SNIPPET_LIMIT: usize = 256;

#[derive(Error, Debug)]
pub enum VipsptError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Decode failed: {message} (body: {snippet})")]
    Decode { message: String, snippet: String },

    #[error("Signature verification failed: {0}")]
    Signature(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl VipsptError {
    /// Build a decode error carrying a truncated, lossy copy of the body.
    pub(crate) fn decode(message: impl Into<String>, body: &[u8]) -> Self {
        let end = body.len().min(SNIPPET_LIMIT);
        VipsptError::Decode {
            message: message.into(),
            snippet: String::from_utf8_lossy(&body[..end]).into_owned(),
        }
    }
}
