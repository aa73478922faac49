//! HTTP client for the LuckyCola open-platform endpoints.

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::warn;

use super::api;
use super::types::{ApiEnvelope, FoodMenuData, OcrData, SafetyCheckData};

/// Client for the three fixed upstream endpoints.
///
/// Never returns an error to its caller: any transport failure, non-2xx
/// status or malformed response body collapses to `None`. A `Some` envelope
/// with a nonzero `code` is a *reachable* upstream explicitly reporting
/// failure; the dispatcher keeps the two cases distinct. Requests are made
/// once, with no retry and no timeout at this layer.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base: String,
}

impl UpstreamClient {
    /// Create a client against the production endpoints.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base: api::BASE_URL.to_string(),
        }
    }

    /// Create a client against a different base URL (for tests).
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into(),
        }
    }

    /// Check whether a remote image is content-safe.
    pub async fn check_image(
        &self,
        img_url: &str,
        app_key: &str,
        uid: &str,
    ) -> Option<ApiEnvelope<SafetyCheckData>> {
        self.post(
            api::IMAGE_CHECK_PATH,
            &json!({ "imgUrl": img_url, "appKey": app_key, "uid": uid }),
        )
        .await
    }

    /// Fetch the recipe candidates for a dish.
    pub async fn food_menu(
        &self,
        food_title: &str,
        app_key: &str,
        uid: &str,
    ) -> Option<ApiEnvelope<FoodMenuData>> {
        self.post(
            api::FOOD_MENU_PATH,
            &json!({ "foodTitle": food_title, "appKey": app_key, "uid": uid }),
        )
        .await
    }

    /// Run OCR over a base64-encoded image (data-URL format).
    pub async fn image_ocr(
        &self,
        img_base64: &str,
        app_key: &str,
        uid: &str,
    ) -> Option<ApiEnvelope<OcrData>> {
        self.post(
            api::IMAGE_OCR_PATH,
            &json!({ "imgBase64": img_base64, "appKey": app_key, "uid": uid }),
        )
        .await
    }

    /// POST a JSON body and deserialize the envelope, collapsing every
    /// transport-level failure to the `None` sentinel.
    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Option<ApiEnvelope<T>> {
        let url = format!("{}{}", self.base, path);

        let response = match self.http.post(&url).json(body).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Upstream request to {} failed: {}", path, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream {} answered HTTP {}", path, status);
            return None;
        }

        match response.json::<ApiEnvelope<T>>().await {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                warn!("Upstream {} returned a malformed body: {}", path, e);
                None
            }
        }
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_collapses_to_none() {
        // Discard port on localhost, connection is refused immediately.
        let client = UpstreamClient::with_base("http://127.0.0.1:9");
        let result = client.check_image("http://x/y.jpg", "key", "uid").await;
        assert!(result.is_none());
    }

    // Live test against the real endpoint, run with --ignored and real
    // credentials in the environment.
    #[ignore]
    #[tokio::test]
    async fn test_live_food_menu() {
        let key = std::env::var("LUCKYCOLA_OPEN_KEY").unwrap();
        let uid = std::env::var("LUCKYCOLA_OPEN_UID").unwrap();
        let client = UpstreamClient::new();
        let envelope = client.food_menu("mapo tofu", &key, &uid).await.unwrap();
        assert_eq!(envelope.code, 0);
    }
}
