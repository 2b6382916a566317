use thiserror::Error;

use crate::error::TownError;

/// Errors from login, signup and session flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not logged in")]
    NotLoggedIn,
    /// The backend refused the credentials or the operation.
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<TownError> for AuthError {
    fn from(error: TownError) -> Self {
        match error {
            TownError::Api {
                status,
                code,
                message,
                ..
            } => Self::Rejected {
                status,
                code,
                message,
            },
            TownError::Network(err) => Self::Network(err.to_string()),
            other => Self::InvalidResponse(other.to_string()),
        }
    }
}

impl From<AuthError> for TownError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Rejected {
                status,
                code,
                message,
            } => TownError::Api {
                status,
                code,
                message,
                body: None,
            },
            other => TownError::Authentication(other.to_string()),
        }
    }
}
