//! API key endpoint paths.

/// `/organizations/{org}/api-keys/`
pub fn api_keys_path(org_slug: &str) -> String {
    format!("/organizations/{org_slug}/api-keys/")
}

/// `/organizations/{org}/api-keys/{id}/`
pub fn api_key_path(org_slug: &str, key_id: u64) -> String {
    format!("/organizations/{org_slug}/api-keys/{key_id}/")
}
