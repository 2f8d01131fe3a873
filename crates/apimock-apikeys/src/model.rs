//! Organization API key resources.

use serde::{Deserialize, Serialize};

/// Scopes granted to a newly created key.
pub const DEFAULT_SCOPES: [&str; 5] = [
    "project:read",
    "event:read",
    "team:read",
    "org:read",
    "member:read",
];

/// Key status, transmitted as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ApiKeyStatus {
    #[default]
    Active,
    Inactive,
}

impl TryFrom<u8> for ApiKeyStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ApiKeyStatus::Active),
            1 => Ok(ApiKeyStatus::Inactive),
            other => Err(format!("unknown API key status {other}")),
        }
    }
}

impl From<ApiKeyStatus> for u8 {
    fn from(status: ApiKeyStatus) -> Self {
        match status {
            ApiKeyStatus::Active => 0,
            ApiKeyStatus::Inactive => 1,
        }
    }
}

/// An organization API key as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: u64,
    pub label: String,
    pub key: String,
    #[serde(default)]
    pub scope_list: Vec<String>,
    #[serde(default)]
    pub status: ApiKeyStatus,
    /// Newline separated origins, empty when unrestricted
    #[serde(default)]
    pub allowed_origins: String,
}

impl ApiKey {
    pub fn is_active(&self) -> bool {
        self.status == ApiKeyStatus::Active
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope_list.iter().any(|s| s == scope)
    }

    pub fn allowed_origins(&self) -> impl Iterator<Item = &str> {
        self.allowed_origins
            .lines()
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }
}

/// Partial update sent with `PUT`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiKeyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_list: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<String>,
}
