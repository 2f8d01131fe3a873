//! Mock client module.
//!
//! This module provides functionality for answering requests from fixtures:
//! - [`MockRegistry`](registry::MockRegistry): Validates descriptors and resolves requests against them
//! - [`MockClient`](client::MockClient): Shared per-test handle implementing the [`ApiClient`](client::ApiClient) contract

pub mod client;
pub mod registry;
