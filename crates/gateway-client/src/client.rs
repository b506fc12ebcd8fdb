//! Main gateway API client implementation.

use crate::api::{ListsApi, RulesApi};
use crate::config::{Credentials, RateLimit, RetryConfig};
use gateway_core::{ApiResponse, GatewayError, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// The Cloudflare v4 API base URL
const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Zero Trust Gateway API client for one account
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    account_id: String,
    base_url: String,
    retry_config: RetryConfig,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl GatewayClient {
    /// Create a new client with default settings
    pub fn new(credentials: Credentials) -> Result<Self> {
        GatewayClientBuilder::new(credentials).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(credentials: Credentials) -> GatewayClientBuilder {
        GatewayClientBuilder::new(credentials)
    }

    /// Access gateway list endpoints
    #[must_use]
    pub fn lists(&self) -> ListsApi<'_> {
        ListsApi::new(self)
    }

    /// Access gateway rule endpoints
    #[must_use]
    pub fn rules(&self) -> RulesApi<'_> {
        RulesApi::new(self)
    }

    /// Path under the configured account
    pub(crate) fn account_path(&self, suffix: &str) -> String {
        format!("/accounts/{}{suffix}", self.inner.account_id)
    }

    /// Perform a GET request, returning the envelope result
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    /// Perform a POST request with JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Perform a PUT request with JSON body
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Perform a DELETE request, discarding the result payload
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.request::<serde_json::Value, ()>(Method::DELETE, path, None)
            .await
            .map(|_| ())
    }

    /// Send a request, retrying transient failures per the retry config
    async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>> {
        let url = self.build_url(path);
        let retry = &self.inner.retry_config;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.inner.limiter {
                limiter.until_ready().await;
            }

            debug!(method = %method, url = %url, attempt, "gateway request");

            match self.send_once(method.clone(), &url, body).await {
                Err(err) if retry.should_retry(&err, attempt) => {
                    let delay = match &err {
                        GatewayError::RateLimited {
                            retry_after: Some(secs),
                        } => Duration::from_secs(*secs).min(retry.max_backoff),
                        _ => retry.backoff_for(attempt),
                    };
                    warn!(error = %err, attempt, ?delay, "retrying gateway request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_once<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Option<T>> {
        let mut request = self.inner.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        Self::handle_response(response).await
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url.trim_end_matches('/'), path)
    }

    /// Unwrap the v4 envelope, converting failures to a `GatewayError`
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.map_err(transport_error)?;

        if !(200..300).contains(&status) {
            return Err(error_from_body(status, &body, retry_after));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(GatewayError::Api {
                status,
                code: envelope.first_error_code(),
                message: envelope.error_message(),
            });
        }

        Ok(envelope.result)
    }
}

/// Convert an error response into a `GatewayError`
fn error_from_body(status: u16, body: &str, retry_after: Option<u64>) -> GatewayError {
    let envelope = serde_json::from_str::<ApiResponse<serde_json::Value>>(body).ok();
    let code = envelope.as_ref().and_then(ApiResponse::first_error_code);
    let message = envelope
        .as_ref()
        .map(ApiResponse::error_message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => GatewayError::Unauthorized,
        404 => GatewayError::NotFound { resource: message },
        409 => GatewayError::AlreadyExists { name: message },
        429 => {
            warn!("Rate limited by gateway API");
            GatewayError::RateLimited { retry_after }
        }
        _ if message.to_lowercase().contains("already exists") => {
            GatewayError::AlreadyExists { name: message }
        }
        _ => GatewayError::Api {
            status,
            code,
            message,
        },
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(err.to_string())
    } else if err.is_connect() {
        GatewayError::Connection(err.to_string())
    } else {
        GatewayError::Http(err.to_string())
    }
}

/// Builder for configuring a [`GatewayClient`]
pub struct GatewayClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    retry_config: RetryConfig,
    rate_limit: Option<RateLimit>,
}

impl GatewayClientBuilder {
    /// Create a new builder with the given credentials
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("cf-adblock/{}", env!("CARGO_PKG_VERSION")),
            retry_config: RetryConfig::default(),
            rate_limit: Some(RateLimit::default()),
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set retry configuration
    #[must_use]
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Set or disable (`None`) the client-side rate limit
    #[must_use]
    pub fn rate_limit(mut self, limit: Option<RateLimit>) -> Self {
        self.rate_limit = limit;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<GatewayClient> {
        let mut token = HeaderValue::from_str(&format!("Bearer {}", self.credentials.api_token))
            .map_err(|_| GatewayError::Config("API token contains invalid characters".into()))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token);

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;

        let limiter = self.rate_limit.map(|limit| {
            let per_second = NonZeroU32::new(limit.per_second).unwrap_or(NonZeroU32::MIN);
            let burst = NonZeroU32::new(limit.burst).unwrap_or(per_second);
            RateLimiter::direct(Quota::per_second(per_second).allow_burst(burst))
        });

        Ok(GatewayClient {
            inner: Arc::new(ClientInner {
                http,
                account_id: self.credentials.account_id,
                base_url: self.base_url,
                retry_config: self.retry_config,
                limiter,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_envelope() {
        let body = r#"{"success":false,"errors":[{"code":1003,"message":"Invalid list"}],"messages":[],"result":null}"#;
        match error_from_body(400, body, None) {
            GatewayError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, Some(1003));
                assert_eq!(message, "1003: Invalid list");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_already_exists_by_message() {
        let body = r#"{"success":false,"errors":[{"code":2001,"message":"list name already exists"}]}"#;
        assert!(error_from_body(400, body, None).is_already_exists());
        assert!(error_from_body(409, "conflict", None).is_already_exists());
    }

    #[test]
    fn test_error_plain_body() {
        match error_from_body(500, "upstream exploded", None) {
            GatewayError::Api { message, code, .. } => {
                assert_eq!(message, "upstream exploded");
                assert_eq!(code, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            error_from_body(429, "", Some(7)),
            GatewayError::RateLimited {
                retry_after: Some(7)
            }
        ));
        assert!(error_from_body(403, "", None).is_auth_error());
    }

    #[test]
    fn test_account_path_and_url() {
        let creds = Credentials::new("token", "acct-1").unwrap();
        let client = GatewayClient::builder(creds)
            .base_url("http://localhost:9/client/v4/")
            .build()
            .unwrap();
        let path = client.account_path("/gateway/lists");
        assert_eq!(path, "/accounts/acct-1/gateway/lists");
        assert_eq!(
            client.build_url(&path),
            "http://localhost:9/client/v4/accounts/acct-1/gateway/lists"
        );
    }
}
