//! Organization API key list view.
//!
//! Lists the keys of an organization, creates new ones and removes keys
//! after an explicit confirmation step.

use crate::endpoints::{api_key_path, api_keys_path};
use crate::error::ApiKeysError;
use crate::model::ApiKey;
use apimock_core::{ApiClient, HttpMethod, RequestError, RequestOptions};
use std::sync::Arc;
use tracing::{debug, warn};

/// State behind the API key list.
pub struct ApiKeysView {
    client: Arc<dyn ApiClient>,
    org_slug: String,
    loading: bool,
    error: Option<String>,
    keys: Vec<ApiKey>,
    /// Key whose removal awaits confirmation; the confirmation modal is shown while set
    pending_removal: Option<u64>,
}

impl ApiKeysView {
    /// Create the view in its loading state. Call [`fetch_data`](Self::fetch_data) to load.
    pub fn new(client: Arc<dyn ApiClient>, org_slug: impl Into<String>) -> Self {
        Self {
            client,
            org_slug: org_slug.into(),
            loading: true,
            error: None,
            keys: Vec::new(),
            pending_removal: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed request.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn keys(&self) -> &[ApiKey] {
        &self.keys
    }

    pub fn org_slug(&self) -> &str {
        &self.org_slug
    }

    /// Load the organization's keys.
    ///
    /// `loading` is cleared whether the request succeeds or not.
    pub async fn fetch_data(&mut self) -> Result<(), ApiKeysError> {
        self.loading = true;
        self.error = None;

        let result = self.load_keys().await;
        self.loading = false;
        match result {
            Ok(keys) => {
                debug!(org = %self.org_slug, count = keys.len(), "loaded API keys");
                self.keys = keys;
                Ok(())
            }
            Err(e) => Err(self.fail("load API keys", e)),
        }
    }

    async fn load_keys(&self) -> Result<Vec<ApiKey>, RequestError> {
        let response = self
            .client
            .request(HttpMethod::Get, &api_keys_path(&self.org_slug), RequestOptions::new())
            .await?;
        Ok(response.json()?)
    }

    /// Create a key with the default scopes and append it to the list.
    pub async fn create_key(&mut self) -> Result<ApiKey, ApiKeysError> {
        match self.post_key().await {
            Ok(key) => {
                debug!(org = %self.org_slug, key_id = key.id, "created API key");
                self.keys.push(key.clone());
                Ok(key)
            }
            Err(e) => Err(self.fail("create API key", e)),
        }
    }

    async fn post_key(&self) -> Result<ApiKey, RequestError> {
        let response = self
            .client
            .request(HttpMethod::Post, &api_keys_path(&self.org_slug), RequestOptions::new())
            .await?;
        Ok(response.json()?)
    }

    /// Ask for confirmation before removing `key_id`.
    pub fn request_remove(&mut self, key_id: u64) -> Result<(), ApiKeysError> {
        if !self.keys.iter().any(|k| k.id == key_id) {
            return Err(ApiKeysError::UnknownKey(key_id));
        }
        self.pending_removal = Some(key_id);
        Ok(())
    }

    /// Key shown in the removal confirmation, if one is open.
    pub fn confirmation(&self) -> Option<&ApiKey> {
        let id = self.pending_removal?;
        self.keys.iter().find(|k| k.id == id)
    }

    pub fn is_confirming(&self) -> bool {
        self.pending_removal.is_some()
    }

    pub fn cancel_remove(&mut self) {
        self.pending_removal = None;
    }

    /// Remove the key awaiting confirmation.
    ///
    /// The confirmation closes either way. On failure the key stays listed
    /// and the request error is returned unchanged.
    pub async fn confirm_remove(&mut self) -> Result<ApiKey, ApiKeysError> {
        let key_id = self
            .pending_removal
            .take()
            .ok_or(ApiKeysError::NothingToConfirm)?;

        let result = self
            .client
            .request(
                HttpMethod::Delete,
                &api_key_path(&self.org_slug, key_id),
                RequestOptions::new(),
            )
            .await;
        if let Err(e) = result {
            return Err(self.fail("remove API key", e));
        }

        let position = self
            .keys
            .iter()
            .position(|k| k.id == key_id)
            .ok_or(ApiKeysError::UnknownKey(key_id))?;
        debug!(org = %self.org_slug, key_id, "removed API key");
        Ok(self.keys.remove(position))
    }

    fn fail(&mut self, action: &str, err: RequestError) -> ApiKeysError {
        warn!(org = %self.org_slug, error = %err, "failed to {action}");
        self.error = Some(err.to_string());
        ApiKeysError::Request(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, ORG_SLUG};
    use apimock_core::{MockClient, MockResponse};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn client() -> MockClient {
        fixtures::client()
    }

    async fn rendered(client: &MockClient) -> ApiKeysView {
        let mut view = ApiKeysView::new(Arc::new(client.clone()), ORG_SLUG);
        view.fetch_data().await.unwrap();
        view
    }

    #[rstest]
    #[tokio::test]
    async fn test_renders(client: MockClient) {
        let view = ApiKeysView::new(Arc::new(client.clone()), ORG_SLUG);
        assert!(view.loading());

        let view = rendered(&client).await;
        assert!(!view.loading());
        assert_eq!(view.keys(), &[fixtures::api_key()]);
        assert_eq!(view.error(), None);
        assert!(!view.is_confirming());
    }

    #[rstest]
    #[tokio::test]
    async fn test_remove_opens_confirmation(client: MockClient) {
        let mut view = rendered(&client).await;

        view.request_remove(1).unwrap();
        assert!(view.is_confirming());
        assert_eq!(view.confirmation().map(|k| k.id), Some(1));

        view.cancel_remove();
        assert!(view.confirmation().is_none());
        assert_eq!(client.calls_to(HttpMethod::Delete, &api_key_path(ORG_SLUG, 1)), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_confirm_remove_deletes_key(client: MockClient) {
        client
            .add_mock_response(
                MockResponse::delete(api_key_path(ORG_SLUG, 1))
                    .with_status(202)
                    .with_body(fixtures::api_key_json()),
            )
            .unwrap();
        let mut view = rendered(&client).await;

        view.request_remove(1).unwrap();
        let removed = view.confirm_remove().await.unwrap();

        assert_eq!(removed.id, 1);
        assert!(view.keys().is_empty());
        assert!(!view.is_confirming());
        assert_eq!(client.calls_to(HttpMethod::Delete, &api_key_path(ORG_SLUG, 1)), 1);
        assert!(client.verify().is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn test_confirm_remove_without_fixture_fails_loudly(client: MockClient) {
        let mut view = rendered(&client).await;

        view.request_remove(1).unwrap();
        let err = view.confirm_remove().await.unwrap_err();

        assert!(err.request_error().is_some_and(RequestError::is_unmatched));
        assert_eq!(view.keys().len(), 1);
        assert_eq!(
            view.error(),
            Some("no mock registered for DELETE /organizations/org-slug/api-keys/1/")
        );
        assert!(client.verify().is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn test_confirm_remove_surfaces_server_error(client: MockClient) {
        client
            .add_mock_response(
                MockResponse::delete(api_key_path(ORG_SLUG, 1))
                    .with_status(403)
                    .with_body(json!({"detail": "You do not have permission to perform this action."})),
            )
            .unwrap();
        let mut view = rendered(&client).await;

        view.request_remove(1).unwrap();
        let err = view.confirm_remove().await.unwrap_err();

        let request_error = err.request_error().unwrap();
        assert_eq!(request_error.status(), Some(403));
        assert_eq!(
            request_error.body(),
            Some(&json!({"detail": "You do not have permission to perform this action."}))
        );
        assert_eq!(view.keys().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_remove_guards(client: MockClient) {
        let mut view = rendered(&client).await;

        assert!(matches!(view.request_remove(42), Err(ApiKeysError::UnknownKey(42))));
        assert!(matches!(
            view.confirm_remove().await,
            Err(ApiKeysError::NothingToConfirm)
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn test_failed_load_clears_loading(client: MockClient) {
        client.clear_mock_responses();
        let mut view = ApiKeysView::new(Arc::new(client.clone()), ORG_SLUG);

        let err = view.fetch_data().await.unwrap_err();
        assert!(err.request_error().is_some_and(RequestError::is_unmatched));
        assert!(!view.loading());
        assert!(view.keys().is_empty());
        assert!(view.error().is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn test_malformed_list_is_a_decode_error(client: MockClient) {
        client
            .add_mock_response(MockResponse::get(crate::endpoints::api_keys_path(ORG_SLUG)).with_body(json!({"id": 1})))
            .unwrap();
        let mut view = ApiKeysView::new(Arc::new(client.clone()), ORG_SLUG);

        let err = view.fetch_data().await.unwrap_err();
        assert!(matches!(err.request_error(), Some(RequestError::Decode(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_key_appends(client: MockClient) {
        let created = json!({
            "id": 2,
            "label": "Default",
            "key": "3c2a6d2f1e9b4a7c8d0e5f6a7b8c9d0e",
            "scope_list": crate::model::DEFAULT_SCOPES,
            "status": 0,
            "allowed_origins": ""
        });
        client
            .add_mock_response(
                MockResponse::post(crate::endpoints::api_keys_path(ORG_SLUG)).with_body(created),
            )
            .unwrap();
        let mut view = rendered(&client).await;

        let key = view.create_key().await.unwrap();
        assert_eq!(key.id, 2);
        assert_eq!(view.keys().iter().map(|k| k.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
