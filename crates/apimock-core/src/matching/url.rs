//! URL pattern matching with path parameters.

use regex::Regex;
use std::collections::HashMap;

/// Why a URL pattern was rejected at compile time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unterminated placeholder in '{0}'")]
    Unterminated(String),
    #[error("empty placeholder name in '{0}'")]
    EmptyName(String),
    #[error("placeholder '{name}' used twice in '{pattern}'")]
    DuplicateName { pattern: String, name: String },
    #[error("invalid pattern '{pattern}': {reason}")]
    Regex { pattern: String, reason: String },
}

/// Path pattern compiled once at registration.
///
/// Patterns without `{name}` segments are compared literally. Trailing slashes
/// and query strings are ignored and percent-escapes are decoded on both sides,
/// so an escaped `/` in a request path acts as a separator.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    normalized: String,
    regex: Option<Regex>,
    param_names: Vec<String>,
}

impl UrlPattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let normalized = canonical_path(pattern);
        if !normalized.contains(['{', '}']) {
            return Ok(Self {
                normalized,
                regex: None,
                param_names: Vec::new(),
            });
        }

        let mut param_names: Vec<String> = Vec::new();
        let mut regex_str = String::from("^");
        let mut chars = normalized.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed || name.contains('{') {
                        return Err(PatternError::Unterminated(pattern.to_string()));
                    }
                    let name = name.trim().to_string();
                    if name.is_empty() {
                        return Err(PatternError::EmptyName(pattern.to_string()));
                    }
                    if param_names.contains(&name) {
                        return Err(PatternError::DuplicateName {
                            pattern: pattern.to_string(),
                            name,
                        });
                    }
                    param_names.push(name);
                    regex_str.push_str("([^/]+)");
                }
                '}' => return Err(PatternError::Unterminated(pattern.to_string())),
                c => regex_str.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            }
        }
        regex_str.push('$');

        let regex = Regex::new(&regex_str).map_err(|e| PatternError::Regex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            normalized,
            regex: Some(regex),
            param_names,
        })
    }

    /// Normalized form, used as the registry key.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Match `url` and return the captured path parameters.
    pub fn captures(&self, url: &str) -> Option<HashMap<String, String>> {
        let path = canonical_path(url);
        let Some(regex) = &self.regex else {
            return (path == self.normalized).then(HashMap::new);
        };

        let caps = regex.captures(&path)?;
        Some(
            self.param_names
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    caps.get(i + 1)
                        .map(|m| (name.clone(), m.as_str().to_owned()))
                })
                .collect(),
        )
    }
}

/// Normalized path with percent-escapes decoded; kept undecoded when the escapes are not UTF-8.
pub fn canonical_path(url: &str) -> String {
    let path = normalize_path(url);
    urlencoding::decode(&path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.clone())
}

/// Strip the query string and trailing slashes; an empty path becomes `/`.
pub fn normalize_path(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or("");
    let trimmed = without_query.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".into()
    } else {
        trimmed.into()
    }
}
