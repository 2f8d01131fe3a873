//! Fixture file parsing (YAML/JSON/JSONC).

use crate::config::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Fixture file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileType {
    Yaml,
    Json,
    Jsonc,
    Unknown,
}

/// Get fixture file type from path extension
pub fn get_file_type(path: &Path) -> ConfigFileType {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "yaml" | "yml" => ConfigFileType::Yaml,
        "json" => ConfigFileType::Json,
        "jsonc" => ConfigFileType::Jsonc,
        _ => ConfigFileType::Unknown,
    }
}

/// Strip `//` line and `/* */` block comments outside of strings.
///
/// Line breaks that end a line comment are kept so error positions still
/// point at the right line.
pub fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' || c == '\r' {
                        result.push(c);
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                result.push(' ');
            }
            _ => result.push(c),
        }
    }

    result
}

/// Parse JSON content
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(ConfigError::from)
}

/// Parse JSONC content (JSON with comments)
pub fn parse_jsonc<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    parse_json(&strip_json_comments(content))
}

/// Parse YAML content
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(ConfigError::from)
}

/// Parse fixture content based on the file type of `path`
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, ConfigError> {
    match get_file_type(path) {
        ConfigFileType::Yaml => parse_yaml(content),
        ConfigFileType::Json => parse_json(content),
        ConfigFileType::Jsonc => parse_jsonc(content),
        ConfigFileType::Unknown => Err(ConfigError::UnknownFileType(
            path.display().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::descriptor::MockResponse;
    use crate::types::method::HttpMethod;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case("api-keys.yaml", ConfigFileType::Yaml)]
    #[case("api-keys.YML", ConfigFileType::Yaml)]
    #[case("api-keys.json", ConfigFileType::Json)]
    #[case("api-keys.jsonc", ConfigFileType::Jsonc)]
    #[case("api-keys.JSONC", ConfigFileType::Jsonc)]
    #[case("api-keys.txt", ConfigFileType::Unknown)]
    #[case("api-keys", ConfigFileType::Unknown)]
    #[case("", ConfigFileType::Unknown)]
    fn test_get_file_type(#[case] path: &str, #[case] expected: ConfigFileType) {
        assert_eq!(get_file_type(Path::new(path)), expected);
    }

    #[rstest]
    #[case("[1, 2] // trailing", "[1, 2] ")]
    #[case("[1, /* two */ 2]", "[1,   2]")]
    #[case("// head\n[1]", "\n[1]")]
    #[case("[\"a // b\"]", "[\"a // b\"]")]
    #[case("[\"a /* b */\"]", "[\"a /* b */\"]")]
    #[case("[\"q \\\" // x\"] // y", "[\"q \\\" // x\"] ")]
    #[case("[1] /* unterminated", "[1]  ")]
    fn test_strip_json_comments(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_json_comments(input), expected);
    }

    #[rstest]
    fn test_parse_jsonc_descriptors() {
        let content = r#"
            // list view fixtures
            [
              {"url": "/organizations/org-slug/api-keys/", "method": "GET", "body": []},
              /* detail */
              {"url": "/organizations/org-slug/api-keys/1/", "method": "GET", "body": {"id": 1}}
            ]
        "#;
        let mocks: Vec<MockResponse> = parse_config(content, Path::new("api-keys.jsonc")).unwrap();
        assert_eq!(mocks.len(), 2);
        assert_eq!(mocks[1].body["id"], 1);
    }

    #[rstest]
    fn test_parse_yaml_descriptors() {
        let content = "
- url: /organizations/org-slug/api-keys/1/
  method: DELETE
  status: 202
  body:
    id: 1
- url: /organizations/org-slug/api-keys/
  method: GET
  query: \"${status == '0'}\"
";
        let mocks: Vec<MockResponse> = parse_config(content, Path::new("api-keys.yml")).unwrap();
        assert_eq!(mocks[0].method, Some(HttpMethod::Delete));
        assert_eq!(mocks[0].status(), 202);
        assert!(mocks[1].query.is_some());
    }

    #[rstest]
    fn test_parse_errors_keep_format() {
        let json: Result<Value, _> = parse_config("[", Path::new("a.json"));
        assert!(matches!(json.unwrap_err(), ConfigError::Json(_)));

        let yaml: Result<Value, _> = parse_config("invalid: yaml: [", Path::new("a.yaml"));
        assert!(matches!(yaml.unwrap_err(), ConfigError::Yaml(_)));

        let unknown: Result<Value, _> = parse_config("[]", Path::new("a.txt"));
        assert!(matches!(unknown.unwrap_err(), ConfigError::UnknownFileType(p) if p == "a.txt"));
    }
}
