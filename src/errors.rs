use serde::{Deserialize, Serialize};

/// Fixed support call-to-action shown alongside any terminal load error.
pub const SUPPORT_CALL_TO_ACTION: &str =
    "We couldn't load this product passport. Please contact support if the problem persists.";

/// Errors raised while obtaining a traceability record for one page load.
///
/// Derivation never produces these: every deriver degrades to a placeholder
/// instead. Only the fetch layer and configuration loading can fail.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A serial was supplied without the product identifier it belongs to.
    #[error("Cannot validate code: Authentication required")]
    AuthenticationRequired,

    #[error("Preview data not found at {0}")]
    PreviewNotFound(String),

    #[error("API request failed with status {status}")]
    ApiRequestFailed { status: u16 },

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Failed to decode traceability record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ServiceError::InvalidInput(format!("response body: {}", err));
        }
        ServiceError::Http(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Config(err.to_string())
    }
}

impl From<crate::config::AppConfigError> for ServiceError {
    fn from(err: crate::config::AppConfigError) -> Self {
        ServiceError::Config(err.to_string())
    }
}

impl ServiceError {
    /// Short machine-readable category, stable across message wording changes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "authentication_required",
            Self::PreviewNotFound(_) => "preview_not_found",
            Self::ApiRequestFailed { .. } => "api_request_failed",
            Self::Timeout(_) => "timeout",
            Self::Http(_) => "network_error",
            Self::Decode(_) => "decode_error",
            Self::Io(_) => "io_error",
            Self::Config(_) => "config_error",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    /// Returns true for failures of the network round-trip itself, as
    /// opposed to failures decided locally before any request is made.
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            Self::ApiRequestFailed { .. } | Self::Timeout(_) | Self::Http(_)
        )
    }
}

/// Error state exposed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorView {
    /// Machine-readable category (see [`ServiceError::code`])
    pub code: String,
    /// Human-readable error description
    pub message: String,
    /// Fixed support call-to-action
    pub call_to_action: String,
    /// Support contact address, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
    /// ISO 8601 timestamp when the error was captured
    pub timestamp: String,
}

impl ErrorView {
    pub fn from_error(error: &ServiceError, support_email: Option<&str>) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
            call_to_action: SUPPORT_CALL_TO_ACTION.to_string(),
            support_email: support_email.map(str::to_string),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
