use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur when talking to the gateway API
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Authentication failed - invalid or missing API token
    #[error("authentication failed: invalid API token")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// A resource with the same name already exists
    #[error("resource already exists: {name}")]
    AlreadyExists {
        /// Name of the conflicting resource
        name: String,
    },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// First error code reported in the response envelope
        code: Option<u32>,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (missing credentials, bad base URL)
    #[error("configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Returns true if the error is retryable at the transport level
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Connection(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns true if a create call collided with an existing resource
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::AlreadyExists { .. } => Some(409),
            Self::RateLimited { .. } => Some(429),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(GatewayError::RateLimited { retry_after: None }.is_retryable());
        assert!(GatewayError::Timeout("slow".into()).is_retryable());
        assert!(GatewayError::Api {
            status: 502,
            code: None,
            message: "bad gateway".into(),
        }
        .is_retryable());

        assert!(!GatewayError::Unauthorized.is_retryable());
        assert!(!GatewayError::AlreadyExists { name: "x".into() }.is_retryable());
        assert!(!GatewayError::Api {
            status: 400,
            code: Some(1003),
            message: "bad request".into(),
        }
        .is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::Unauthorized.status_code(), Some(401));
        assert_eq!(
            GatewayError::AlreadyExists { name: "x".into() }.status_code(),
            Some(409)
        );
        assert_eq!(GatewayError::Http("boom".into()).status_code(), None);
    }

    #[test]
    fn test_display() {
        let err = GatewayError::Api {
            status: 400,
            code: Some(2001),
            message: "invalid list".into(),
        };
        assert_eq!(err.to_string(), "API error (400): invalid list");
    }
}
