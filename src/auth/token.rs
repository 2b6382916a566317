use std::fmt;

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

/// Short-lived bearer credential issued by the backend.
///
/// Held in memory only. `Debug` output is redacted so tokens never reach logs.
///
/// # Example
/// ```
/// use townsquare::auth::AccessToken;
///
/// let token = AccessToken::new("abc");
/// assert_eq!(token.bearer(), "Bearer abc");
/// assert_eq!(format!("{token:?}"), "AccessToken(***)");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Header value, or `None` when the token contains bytes not allowed in headers.
    pub fn header_value(&self) -> Option<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.bearer()).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl From<String> for AccessToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for AccessToken {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
