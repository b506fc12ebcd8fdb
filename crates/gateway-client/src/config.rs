//! Client configuration types.

use gateway_core::{GatewayError, Result};
use std::time::Duration;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "CF_API_TOKEN";

/// Environment variable holding the account identifier
pub const ACCOUNT_ENV: &str = "CF_IDENTIFIER";

/// API token and account id for one Cloudflare account
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token with Zero Trust edit permission
    pub api_token: String,

    /// Account identifier
    pub account_id: String,
}

impl Credentials {
    /// Create credentials, rejecting empty values
    pub fn new(api_token: impl Into<String>, account_id: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        let account_id = account_id.into();

        if api_token.trim().is_empty() {
            return Err(GatewayError::Config(format!("{TOKEN_ENV} is not set")));
        }
        if account_id.trim().is_empty() {
            return Err(GatewayError::Config(format!("{ACCOUNT_ENV} is not set")));
        }

        Ok(Self {
            api_token,
            account_id,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Retry configuration for failed requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial backoff duration
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,

    /// Whether to retry on rate limit errors
    pub retry_on_rate_limit: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            retry_on_rate_limit: true,
        }
    }

    /// A configuration that never retries
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new().max_retries(0)
    }

    /// Set maximum retries
    #[must_use]
    pub const fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set initial backoff duration
    #[must_use]
    pub const fn initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set maximum backoff duration
    #[must_use]
    pub const fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Calculate backoff for a given attempt
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let initial = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        let backoff = initial.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(backoff.min(max))
    }

    /// Whether `err` should be retried after `attempt` failed tries
    #[must_use]
    pub const fn should_retry(&self, err: &GatewayError, attempt: u32) -> bool {
        if attempt >= self.max_retries || !err.is_retryable() {
            return false;
        }
        self.retry_on_rate_limit || !matches!(err, GatewayError::RateLimited { .. })
    }
}

/// Client-side request rate limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Sustained requests per second
    pub per_second: u32,

    /// Burst size
    pub burst: u32,
}

impl Default for RateLimit {
    /// Cloudflare allows 1200 requests per five minutes per user
    fn default() -> Self {
        Self {
            per_second: 4,
            burst: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RetryConfig::new()
            .initial_backoff(Duration::from_millis(100))
            .max_backoff(Duration::from_millis(350));

        assert_eq!(config.backoff_for(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for(2), Duration::from_millis(350));
        assert_eq!(config.backoff_for(40), Duration::from_millis(350));
    }

    #[test]
    fn test_should_retry() {
        let config = RetryConfig::new().max_retries(2);
        let timeout = GatewayError::Timeout("t".into());

        assert!(config.should_retry(&timeout, 0));
        assert!(config.should_retry(&timeout, 1));
        assert!(!config.should_retry(&timeout, 2));
        assert!(!config.should_retry(&GatewayError::Unauthorized, 0));

        let mut no_rl = config;
        no_rl.retry_on_rate_limit = false;
        assert!(!no_rl.should_retry(&GatewayError::RateLimited { retry_after: None }, 0));
    }

    #[test]
    fn test_credentials_reject_empty() {
        assert!(matches!(
            Credentials::new("", "acct"),
            Err(GatewayError::Config(msg)) if msg.contains(TOKEN_ENV)
        ));
        assert!(matches!(
            Credentials::new("token", "  "),
            Err(GatewayError::Config(msg)) if msg.contains(ACCOUNT_ENV)
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = Credentials::new("secret-token", "acct").unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("acct"));
    }
}
