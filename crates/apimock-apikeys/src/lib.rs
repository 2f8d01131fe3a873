//! Organization API key views.
//!
//! [`ApiKeysView`] lists, creates and removes keys; [`ApiKeyDetailsView`]
//! shows and edits one key. Both issue their requests through an
//! [`ApiClient`](apimock_core::ApiClient), so tests drive them with a
//! [`MockClient`](apimock_core::MockClient) instead of a live backend.

pub mod details;
pub mod endpoints;
pub mod error;
pub mod list;
pub mod model;

#[cfg(test)]
mod fixtures;

pub use details::ApiKeyDetailsView;
pub use error::ApiKeysError;
pub use list::ApiKeysView;
pub use model::{ApiKey, ApiKeyStatus, ApiKeyUpdate, DEFAULT_SCOPES};
