//! Errors raised by the mock client.

use crate::matching::PatternError;
use crate::types::method::HttpMethod;
use serde_json::Value;

/// Errors returned from a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// No registered descriptor matched; the test is missing a fixture.
    #[error("no mock registered for {method} {url}")]
    NoMockRegistered { method: HttpMethod, url: String },
    /// The matched descriptor carries a non-success status.
    #[error("{method} {url} failed with status {status}")]
    Status {
        method: HttpMethod,
        url: String,
        status: u16,
        body: Value,
    },
    /// The request was cancelled before it resolved.
    #[error("{method} {url} was cancelled")]
    Cancelled { method: HttpMethod, url: String },
    /// The response body did not have the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// Status code, when the request reached a descriptor.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of a failed request.
    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, RequestError::NoMockRegistered { .. })
    }
}

/// Malformed descriptor rejected by `add_mock_response`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("mock response for '{url}' has no method")]
    MissingMethod { url: String },
    #[error("mock response has no url")]
    MissingUrl,
    #[error("mock response url '{url}' must be a path starting with '/' and without a query string")]
    InvalidUrl { url: String },
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),
    #[error("mock response for {method} {url} has invalid status {status}")]
    InvalidStatus {
        method: HttpMethod,
        url: String,
        status: u16,
    },
    #[error("invalid expression '{expression}' for {method} {url}: {reason}")]
    InvalidExpression {
        method: HttpMethod,
        url: String,
        expression: String,
        reason: String,
    },
}

/// Requests that reached the client without a matching descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} unmatched request(s): {}", .requests.len(), .requests.join(", "))]
pub struct VerifyError {
    /// `METHOD url` of each unmatched request, in issue order
    pub requests: Vec<String>,
}
