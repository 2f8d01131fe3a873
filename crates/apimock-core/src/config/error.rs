//! Error types for fixture file loading.

use crate::error::RegistrationError;
use std::fmt;
use std::path::PathBuf;

/// Fixture loading error
#[derive(Debug)]
pub enum ConfigError {
    /// JSON parsing error
    Json(serde_json::Error),
    /// YAML parsing error
    Yaml(serde_yaml::Error),
    /// Unknown file type
    UnknownFileType(String),
    /// Fixture file could not be read
    Io { path: PathBuf, source: std::io::Error },
    /// Glob pattern is malformed
    Pattern(glob::PatternError),
    /// A loaded descriptor failed validation
    Registration { path: PathBuf, source: RegistrationError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "JSON parsing error: {}", e),
            ConfigError::Yaml(e) => write!(f, "YAML parsing error: {}", e),
            ConfigError::UnknownFileType(path) => write!(f, "Unknown file type: {}", path),
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            ConfigError::Pattern(e) => write!(f, "Invalid fixture pattern: {}", e),
            ConfigError::Registration { path, source } => {
                write!(f, "Invalid fixture in {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Yaml(e) => Some(e),
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Pattern(e) => Some(e),
            ConfigError::Registration { source, .. } => Some(source),
            ConfigError::UnknownFileType(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

impl From<glob::PatternError> for ConfigError {
    fn from(err: glob::PatternError) -> Self {
        ConfigError::Pattern(err)
    }
}
