//! Loading descriptors from fixture files.

use crate::config::error::ConfigError;
use crate::config::parser::parse_config;
use crate::mocks::client::MockClient;
use crate::types::descriptor::MockResponse;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read one fixture file holding a list of descriptors.
pub async fn load_fixture_file(path: impl AsRef<Path>) -> Result<Vec<MockResponse>, ConfigError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let mocks: Vec<MockResponse> = parse_config(&content, path)?;
    debug!(path = %path.display(), count = mocks.len(), "loaded fixture file");
    Ok(mocks)
}

/// Paths matching a glob pattern, in sorted order.
pub fn fixture_paths(pattern: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let mut paths = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => {
                let path = e.path().to_path_buf();
                return Err(ConfigError::Io {
                    path,
                    source: e.into_error(),
                });
            }
        }
    }
    paths.sort();
    Ok(paths)
}

impl MockClient {
    /// Register every descriptor found in files matching `pattern`.
    ///
    /// Files are registered in sorted path order, so a later file overrides
    /// an earlier one for the same (method, url). Returns the number of
    /// descriptors registered.
    pub async fn load_fixtures(&self, pattern: &str) -> Result<usize, ConfigError> {
        let mut count = 0;
        for path in fixture_paths(pattern)? {
            let mocks = load_fixture_file(&path).await?;
            count += mocks.len();
            self.add_mock_responses(mocks)
                .map_err(|source| ConfigError::Registration { path, source })?;
        }
        Ok(count)
    }
}
