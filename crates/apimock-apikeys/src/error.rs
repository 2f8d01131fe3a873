//! Errors surfaced by the API key views.

use apimock_core::RequestError;

#[derive(Debug, thiserror::Error)]
pub enum ApiKeysError {
    /// The request failed; passed through unchanged.
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("API key {0} is not listed")]
    UnknownKey(u64),
    #[error("no API key removal is awaiting confirmation")]
    NothingToConfirm,
}

impl ApiKeysError {
    /// Underlying request error, if any.
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            ApiKeysError::Request(e) => Some(e),
            _ => None,
        }
    }
}
