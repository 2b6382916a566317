//! Error types for townsquare.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

/// Primary error type for all townsquare operations.
#[derive(Error, Debug)]
pub enum TownError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend answered with an error status or a `success: false` envelope.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        body: Option<serde_json::Value>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TownError {
    /// Create an API error without a backend code or body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: None,
            message: message.into(),
            body: None,
        }
    }

    /// Backend error code carried by an [`TownError::Api`], if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status carried by an [`TownError::Api`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Network(_) => ErrorCategory::Network,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) | Self::InvalidResponse(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether the caller may reasonably retry the same request later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Server
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TownError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_categories_follow_status() {
        assert_eq!(TownError::api(401, "x").category(), ErrorCategory::Authentication);
        assert_eq!(TownError::api(403, "x").category(), ErrorCategory::Authentication);
        assert_eq!(TownError::api(503, "x").category(), ErrorCategory::Server);
        assert_eq!(TownError::api(404, "x").category(), ErrorCategory::Api);
    }

    #[test]
    fn code_and_status_are_exposed_for_api_errors() {
        let err = TownError::Api {
            status: 404,
            code: Some("MEETING-002".to_string()),
            message: "missing".to_string(),
            body: None,
        };
        assert_eq!(err.code(), Some("MEETING-002"));
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "API error (status 404): missing");
    }

    #[test]
    fn non_api_errors_have_no_code() {
        let err = TownError::InvalidArgument("bad".to_string());
        assert_eq!(err.code(), None);
        assert_eq!(err.category(), ErrorCategory::Unknown);
    }
}
