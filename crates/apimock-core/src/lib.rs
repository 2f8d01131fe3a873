//! Mock HTTP client for deterministic, network-free tests.
//!
//! Application code issues requests through the [`ApiClient`] contract. In
//! tests it is handed a [`MockClient`] whose registry of [`MockResponse`]
//! descriptors answers every request, or fails it loudly when no descriptor
//! matches.
//!
//! ```ignore
//! let client = MockClient::new();
//! client.add_mock_response(
//!     MockResponse::get("/organizations/org-slug/api-keys/").with_body(json!([])),
//! )?;
//! let response = client
//!     .request(HttpMethod::Get, "/organizations/org-slug/api-keys/", RequestOptions::new())
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod expression;
pub mod matching;
pub mod mocks;
pub mod types;

pub use error::{RegistrationError, RequestError, VerifyError};
pub use mocks::client::{ApiClient, Latency, MockClient, MockClientConfig};
pub use mocks::registry::MockRegistry;
pub use types::descriptor::{MockResponse, PayloadOrExpression, QueryOrExpression};
pub use types::method::HttpMethod;
pub use types::request::{CancelToken, Request, RequestOptions, Response};
