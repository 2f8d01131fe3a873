//! Test stubs shared by the view tests.

use crate::endpoints;
use crate::model::{ApiKey, ApiKeyStatus, DEFAULT_SCOPES};
use apimock_core::{MockClient, MockResponse};
use serde_json::{json, Value};

pub const ORG_SLUG: &str = "org-slug";

pub fn api_key() -> ApiKey {
    ApiKey {
        id: 1,
        label: "Default".to_string(),
        key: "aa624bcc12024702a202cd90be5feda0".to_string(),
        scope_list: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        status: ApiKeyStatus::Active,
        allowed_origins: String::new(),
    }
}

pub fn api_key_json() -> Value {
    json!({
        "id": 1,
        "label": "Default",
        "key": "aa624bcc12024702a202cd90be5feda0",
        "scope_list": DEFAULT_SCOPES,
        "status": 0,
        "allowed_origins": ""
    })
}

/// Fresh client with the list and detail `GET` fixtures registered.
pub fn client() -> MockClient {
    let client = MockClient::new();
    client.clear_mock_responses();
    client
        .add_mock_response(
            MockResponse::get(endpoints::api_keys_path(ORG_SLUG)).with_body(json!([api_key_json()])),
        )
        .unwrap();
    client
        .add_mock_response(MockResponse::get(endpoints::api_key_path(ORG_SLUG, 1)).with_body(api_key_json()))
        .unwrap();
    client
}
