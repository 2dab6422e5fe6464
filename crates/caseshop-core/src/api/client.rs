//! API client for the storefront REST API.
//!
//! `ApiClient` is the live `StoreBackend`: one GET per domain fetch, with the
//! bearer token attached when a session token is configured.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{Banner, CatalogItem, User};

use super::{ApiError, StoreBackend};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 500;

/// API client for the storefront.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: Arc::from(config.api_base_url.trim_end_matches('/')),
            token: config.auth_token.as_deref().map(Arc::from),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidResponse(format!("Invalid auth token: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should
    /// retry), or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(&url)
                .headers(self.auth_headers()?)
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let text = response.text().await?;
                    return serde_json::from_str(&text).map_err(|e| {
                        ApiError::InvalidResponse(format!("Failed to parse {}: {}", path, e))
                    });
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = %url, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl StoreBackend for ApiClient {
    async fn fetch_user(&self) -> Result<User, ApiError> {
        if self.token.is_none() {
            debug!("No session token, user fetch will be anonymous");
        }
        self.get("user/me").await
    }

    async fn fetch_cases(&self) -> Result<Vec<CatalogItem>, ApiError> {
        let cases: Vec<CatalogItem> = self.get("cases").await?;
        debug!(count = cases.len(), "Cases response received");
        Ok(cases)
    }

    async fn fetch_banners(&self) -> Result<Vec<Banner>, ApiError> {
        let banners: Vec<Banner> = self.get("banners").await?;
        debug!(count = banners.len(), "Banners response received");
        Ok(banners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str, token: Option<&str>) -> ApiClient {
        let config = Config {
            api_base_url: base.to_string(),
            auth_token: token.map(str::to_string),
            ..Config::default()
        };
        ApiClient::new(&config).expect("client builds")
    }

    #[test]
    fn test_url_joining() {
        let api = client_for("https://shop.example/api/", None);
        assert_eq!(api.base_url(), "https://shop.example/api");
        assert_eq!(api.url("cases"), "https://shop.example/api/cases");
        assert_eq!(api.url("/user/me"), "https://shop.example/api/user/me");
    }

    #[test]
    fn test_auth_headers_with_and_without_token() {
        let anon = client_for("https://shop.example", None);
        let headers = anon.auth_headers().expect("headers build");
        assert!(headers.get(header::AUTHORIZATION).is_none());

        let signed = client_for("https://shop.example", Some("abc123"));
        let headers = signed.auth_headers().expect("headers build");
        assert_eq!(
            headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer abc123")
        );
    }

    #[test]
    fn test_invalid_token_is_an_error_not_a_panic() {
        let api = client_for("https://shop.example", Some("bad\ntoken"));
        assert!(matches!(
            api.auth_headers(),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
