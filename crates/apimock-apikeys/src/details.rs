//! Single API key detail view.

use crate::endpoints::api_key_path;
use crate::error::ApiKeysError;
use crate::model::{ApiKey, ApiKeyUpdate};
use apimock_core::{ApiClient, HttpMethod, RequestError, RequestOptions};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ApiKeyDetailsView {
    client: Arc<dyn ApiClient>,
    org_slug: String,
    key_id: u64,
    loading: bool,
    error: Option<String>,
    key: Option<ApiKey>,
}

impl ApiKeyDetailsView {
    pub fn new(client: Arc<dyn ApiClient>, org_slug: impl Into<String>, key_id: u64) -> Self {
        Self {
            client,
            org_slug: org_slug.into(),
            key_id,
            loading: true,
            error: None,
            key: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn key(&self) -> Option<&ApiKey> {
        self.key.as_ref()
    }

    fn path(&self) -> String {
        api_key_path(&self.org_slug, self.key_id)
    }

    pub async fn fetch_data(&mut self) -> Result<(), ApiKeysError> {
        self.loading = true;
        self.error = None;

        let result = self.send(HttpMethod::Get, RequestOptions::new()).await;
        self.loading = false;
        let key = result.map_err(|e| self.fail("load API key", e))?;
        debug!(org = %self.org_slug, key_id = self.key_id, "loaded API key");
        self.key = Some(key);
        Ok(())
    }

    /// Save changed fields and replace the shown key with the server's copy.
    pub async fn update(&mut self, update: &ApiKeyUpdate) -> Result<&ApiKey, ApiKeysError> {
        let options = RequestOptions::new()
            .with_json(update)
            .map_err(ApiKeysError::Encode)?;

        let key = self
            .send(HttpMethod::Put, options)
            .await
            .map_err(|e| self.fail("update API key", e))?;
        debug!(org = %self.org_slug, key_id = self.key_id, "updated API key");
        Ok(&*self.key.insert(key))
    }

    async fn send(&self, method: HttpMethod, options: RequestOptions) -> Result<ApiKey, RequestError> {
        let response = self.client.request(method, &self.path(), options).await?;
        Ok(response.json()?)
    }

    fn fail(&mut self, action: &str, err: RequestError) -> ApiKeysError {
        warn!(org = %self.org_slug, key_id = self.key_id, error = %err, "failed to {action}");
        self.error = Some(err.to_string());
        ApiKeysError::Request(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, ORG_SLUG};
    use apimock_core::{MockClient, MockResponse, PayloadOrExpression};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn client() -> MockClient {
        fixtures::client()
    }

    fn view(client: &MockClient, key_id: u64) -> ApiKeyDetailsView {
        ApiKeyDetailsView::new(Arc::new(client.clone()), ORG_SLUG, key_id)
    }

    #[rstest]
    #[tokio::test]
    async fn test_renders(client: MockClient) {
        let mut view = view(&client, 1);
        assert!(view.loading());

        view.fetch_data().await.unwrap();
        assert!(!view.loading());
        assert_eq!(view.key(), Some(&fixtures::api_key()));
        assert_eq!(client.calls_to(HttpMethod::Get, &api_key_path(ORG_SLUG, 1)), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_missing_key_fixture(client: MockClient) {
        let mut view = view(&client, 2);

        let err = view.fetch_data().await.unwrap_err();
        assert!(err.request_error().is_some_and(RequestError::is_unmatched));
        assert!(!view.loading());
        assert!(view.key().is_none());
        assert_eq!(
            view.error(),
            Some("no mock registered for GET /organizations/org-slug/api-keys/2/")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_replaces_key(client: MockClient) {
        let mut updated = fixtures::api_key_json();
        updated["label"] = json!("Renamed");
        client
            .add_mock_response(
                MockResponse::put(api_key_path(ORG_SLUG, 1))
                    .with_payload(PayloadOrExpression::Value(json!({"label": "Renamed"})))
                    .with_body(updated),
            )
            .unwrap();
        let mut view = view(&client, 1);
        view.fetch_data().await.unwrap();

        let update = ApiKeyUpdate {
            label: Some("Renamed".to_string()),
            ..ApiKeyUpdate::default()
        };
        let key = view.update(&update).await.unwrap();
        assert_eq!(key.label, "Renamed");

        let put = client.requests().pop().unwrap();
        assert_eq!(put.method, HttpMethod::Put);
        assert_eq!(put.payload, Some(json!({"label": "Renamed"})));
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_with_unexpected_payload_is_unmatched(client: MockClient) {
        client
            .add_mock_response(
                MockResponse::put(api_key_path(ORG_SLUG, 1))
                    .with_payload(PayloadOrExpression::Expression("label == 'Renamed'".to_string()))
                    .with_body(fixtures::api_key_json()),
            )
            .unwrap();
        let mut view = view(&client, 1);
        view.fetch_data().await.unwrap();

        let update = ApiKeyUpdate {
            allowed_origins: Some("https://example.com".to_string()),
            ..ApiKeyUpdate::default()
        };
        let err = view.update(&update).await.unwrap_err();
        assert!(err.request_error().is_some_and(RequestError::is_unmatched));
        assert_eq!(view.key(), Some(&fixtures::api_key()));
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_validation_error(client: MockClient) {
        client
            .add_mock_response(
                MockResponse::put(api_key_path(ORG_SLUG, 1))
                    .with_status(400)
                    .with_body(json!({"label": ["Ensure this field has no more than 64 characters."]})),
            )
            .unwrap();
        let mut view = view(&client, 1);
        view.fetch_data().await.unwrap();

        let update = ApiKeyUpdate {
            label: Some("x".repeat(65)),
            ..ApiKeyUpdate::default()
        };
        let err = view.update(&update).await.unwrap_err();
        let request_error = err.request_error().unwrap();
        assert_eq!(request_error.status(), Some(400));
        assert!(request_error.body().is_some_and(|b| b["label"].is_array()));
        assert!(view.error().is_some());
    }
}
