//! Mock client answering requests from a per-test registry.
//!
//! This module provides the `ApiClient` request contract consumed by
//! application code, and `MockClient`, its test-time implementation backed
//! by a `MockRegistry`.

use crate::error::{RegistrationError, RequestError, VerifyError};
use crate::matching::{canonical_path, request_query};
use crate::mocks::registry::MockRegistry;
use crate::types::descriptor::MockResponse;
use crate::types::method::HttpMethod;
use crate::types::request::{CancelToken, Request, RequestOptions, Response};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Request-issuing contract shared by real and mock clients.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, RequestError>;
}

/// When a matched response is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latency {
    /// Resolve without suspending
    Immediate,
    /// Resolve after yielding once to the scheduler
    #[default]
    NextTick,
    /// Resolve after sleeping for the given duration
    Delay(Duration),
}

/// Mock client settings.
#[derive(Debug, Clone, Default)]
pub struct MockClientConfig {
    pub latency: Latency,
}

#[derive(Debug, Default)]
struct State {
    registry: MockRegistry,
    history: Vec<Request>,
    unmatched: Vec<String>,
}

/// Test-time substitute for the network client.
///
/// Clones share the same registry, so a test can keep a handle for setup and
/// assertions while the code under test owns another. Create one per test.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<State>>,
    config: MockClientConfig,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MockClientConfig) -> Self {
        Self {
            state: Arc::default(),
            config,
        }
    }

    /// Empty the descriptor table, call history and unmatched-request log.
    pub fn clear_mock_responses(&self) {
        let mut state = self.state.lock();
        state.registry.clear();
        state.history.clear();
        state.unmatched.clear();
    }

    /// Register a descriptor, replacing any earlier one with the same method, url and matchers.
    pub fn add_mock_response(&self, mock: MockResponse) -> Result<(), RegistrationError> {
        self.state.lock().registry.add(mock)
    }

    pub fn add_mock_responses(
        &self,
        mocks: impl IntoIterator<Item = MockResponse>,
    ) -> Result<(), RegistrationError> {
        self.state.lock().registry.add_all(mocks)
    }

    pub fn mock_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    /// Every request issued since the last clear, in issue order.
    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().history.clone()
    }

    /// Number of requests issued with `method` to a url equal to `url`
    /// after trailing slashes and query strings are stripped and
    /// percent-escapes decoded.
    pub fn calls_to(&self, method: HttpMethod, url: &str) -> usize {
        let target = canonical_path(url);
        self.state
            .lock()
            .history
            .iter()
            .filter(|r| r.method == method && canonical_path(&r.url) == target)
            .count()
    }

    /// Fail if any request went unmatched since the last clear.
    ///
    /// Catches missing fixtures even when the code under test swallowed the
    /// request error.
    pub fn verify(&self) -> Result<(), VerifyError> {
        let state = self.state.lock();
        if state.unmatched.is_empty() {
            Ok(())
        } else {
            Err(VerifyError {
                requests: state.unmatched.clone(),
            })
        }
    }

    /// Resolve a request synchronously against the registry.
    fn respond(&self, request: Request) -> Result<Response, RequestError> {
        let mut state = self.state.lock();
        let matched = state.registry.find(&request).map(|m| m.mock.clone());
        let method = request.method;
        let url = request.url.clone();
        state.history.push(request);

        let Some(mock) = matched else {
            error!(%method, %url, "no mock registered");
            state.unmatched.push(format!("{method} {url}"));
            return Err(RequestError::NoMockRegistered { method, url });
        };

        let status = mock.status();
        debug!(%method, %url, status, "mock response matched");
        if status >= 400 {
            return Err(RequestError::Status {
                method,
                url,
                status,
                body: mock.body,
            });
        }

        Ok(Response {
            status,
            headers: mock.headers.unwrap_or_default(),
            body: mock.body,
        })
    }

    /// Wait out the configured latency, returning early once `cancel` fires.
    async fn wait(&self, cancel: Option<&CancelToken>) {
        let latency = async {
            match self.config.latency {
                Latency::Immediate => {}
                Latency::NextTick => tokio::task::yield_now().await,
                Latency::Delay(duration) => tokio::time::sleep(duration).await,
            }
        };
        match cancel {
            Some(token) => tokio::select! {
                _ = latency => {}
                _ = token.cancelled() => {}
            },
            None => latency.await,
        }
    }
}

#[async_trait]
impl ApiClient for MockClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, RequestError> {
        let RequestOptions {
            query,
            data,
            headers,
            cancel,
        } = options;

        let request = Request {
            method,
            url: path.to_string(),
            query: request_query(path, query.as_ref()),
            payload: data,
            headers: headers.unwrap_or_default(),
        };

        let result = self.respond(request);
        self.wait(cancel.as_ref()).await;

        if cancel.is_some_and(|token| token.is_cancelled()) {
            debug!(%method, url = path, "mock request cancelled");
            return Err(RequestError::Cancelled {
                method,
                url: path.to_string(),
            });
        }
        result
    }
}
