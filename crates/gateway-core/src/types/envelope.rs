use serde::{Deserialize, Serialize};

/// Standard Cloudflare v4 response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    #[serde(default)]
    pub success: bool,

    /// Errors reported by the API
    #[serde(default)]
    pub errors: Vec<ApiMessage>,

    /// Informational messages
    #[serde(default)]
    pub messages: Vec<ApiMessage>,

    /// The payload; `null` for empty listings and some deletes
    pub result: Option<T>,

    /// Pagination info, when the endpoint provides it
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    /// First error code in the envelope, if any
    #[must_use]
    pub fn first_error_code(&self) -> Option<u32> {
        self.errors.first().map(|e| e.code)
    }

    /// All error messages joined into one line
    #[must_use]
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(ApiMessage::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// An error or message entry in the envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiMessage {
    /// Numeric code
    #[serde(default)]
    pub code: u32,

    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultInfo {
    /// Items on this page
    #[serde(default)]
    pub count: u64,

    /// Current page
    #[serde(default)]
    pub page: Option<u64>,

    /// Page size
    #[serde(default)]
    pub per_page: Option<u64>,

    /// Total items
    #[serde(default)]
    pub total_count: Option<u64>,
}
