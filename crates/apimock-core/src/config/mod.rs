//! Fixture files: parsing YAML/JSON/JSONC descriptor lists and loading them
//! into a [`MockClient`](crate::mocks::client::MockClient).

pub mod error;
pub mod loader;
pub mod parser;
