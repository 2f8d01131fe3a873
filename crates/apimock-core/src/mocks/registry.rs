//! Registry of mock response descriptors.
//!
//! This module provides `MockRegistry` which validates and stores descriptors
//! and resolves requests against them. It is owned by `MockClient` and lives
//! for the duration of one test.

use crate::error::RegistrationError;
use crate::expression::validate_expression;
use crate::matching::{payload_matches, query_matches, UrlPattern};
use crate::types::descriptor::{MockResponse, PayloadOrExpression, QueryOrExpression};
use crate::types::method::HttpMethod;
use crate::types::request::Request;
use tracing::debug;

/// Descriptor that passed validation, with its url pattern compiled.
#[derive(Debug, Clone)]
pub struct RegisteredMock {
    /// Method the descriptor answers to
    pub method: HttpMethod,
    /// Compiled url pattern
    pub pattern: UrlPattern,
    /// Descriptor as registered
    pub mock: MockResponse,
}

impl RegisteredMock {
    fn validate(mock: MockResponse) -> Result<Self, RegistrationError> {
        let url = mock.url.trim();
        if url.is_empty() {
            return Err(RegistrationError::MissingUrl);
        }
        if !url.starts_with('/') || url.contains(['?', '#']) {
            return Err(RegistrationError::InvalidUrl {
                url: url.to_string(),
            });
        }
        let method = mock.method.ok_or_else(|| RegistrationError::MissingMethod {
            url: url.to_string(),
        })?;
        let pattern = UrlPattern::compile(url)?;

        if let Some(status) = mock.status {
            if !(100..=599).contains(&status) {
                return Err(RegistrationError::InvalidStatus {
                    method,
                    url: url.to_string(),
                    status,
                });
            }
        }

        let expressions = [
            match &mock.query {
                Some(QueryOrExpression::Expression(expr)) => Some(expr),
                _ => None,
            },
            match &mock.payload {
                Some(PayloadOrExpression::Expression(expr)) => Some(expr),
                _ => None,
            },
        ];
        for expression in expressions.into_iter().flatten() {
            validate_expression(expression).map_err(|reason| {
                RegistrationError::InvalidExpression {
                    method,
                    url: url.to_string(),
                    expression: expression.clone(),
                    reason,
                }
            })?;
        }

        Ok(Self {
            method,
            pattern,
            mock,
        })
    }

    /// Same method, normalized url and request matchers.
    fn same_key(&self, other: &RegisteredMock) -> bool {
        self.method == other.method
            && self.pattern.as_str() == other.pattern.as_str()
            && self.mock.params == other.mock.params
            && self.mock.query == other.mock.query
            && self.mock.payload == other.mock.payload
    }

    /// Check if this descriptor answers `request`.
    ///
    /// Matching is performed in order: method, url, path params, query, payload.
    pub fn matches(&self, request: &Request) -> bool {
        if self.method != request.method {
            return false;
        }

        let Some(params) = self.pattern.captures(&request.url) else {
            return false;
        };

        if let Some(expected) = &self.mock.params {
            let params_match = expected
                .iter()
                .all(|(name, value)| params.get(name) == Some(value));
            if !params_match {
                return false;
            }
        }

        query_matches(self.mock.query.as_ref(), &request.query)
            && payload_matches(self.mock.payload.as_ref(), request.payload.as_ref())
    }
}

/// Ordered table of descriptors.
///
/// `MockRegistry` is responsible for:
/// - Validating descriptors at registration time
/// - Replacing a descriptor registered again with the same method, url and matchers
/// - Resolving requests in registration order, first match wins
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    mocks: Vec<RegisteredMock>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every descriptor.
    pub fn clear(&mut self) {
        self.mocks.clear();
    }

    /// Validate and register a descriptor.
    ///
    /// A descriptor with the same method, normalized url and `params`,
    /// `query` and `payload` matchers replaces the earlier one in place,
    /// keeping its position in the lookup order.
    pub fn add(&mut self, mock: MockResponse) -> Result<(), RegistrationError> {
        let registered = RegisteredMock::validate(mock)?;
        debug!(
            method = %registered.method,
            url = registered.pattern.as_str(),
            status = registered.mock.status(),
            "registered mock response"
        );

        match self.mocks.iter_mut().find(|m| m.same_key(&registered)) {
            Some(existing) => *existing = registered,
            None => self.mocks.push(registered),
        }
        Ok(())
    }

    /// Register several descriptors, stopping at the first invalid one.
    pub fn add_all(
        &mut self,
        mocks: impl IntoIterator<Item = MockResponse>,
    ) -> Result<(), RegistrationError> {
        for mock in mocks {
            self.add(mock)?;
        }
        Ok(())
    }

    /// Find the first descriptor that answers `request`.
    pub fn find(&self, request: &Request) -> Option<&RegisteredMock> {
        self.mocks.iter().find(|m| m.matches(request))
    }

    pub fn mocks(&self) -> &[RegisteredMock] {
        &self.mocks
    }

    pub fn len(&self) -> usize {
        self.mocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mocks.is_empty()
    }
}
