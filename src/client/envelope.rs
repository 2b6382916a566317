//! The backend's `{ success, code, message, data }` response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TownError};

/// Standard backend response wrapper.
///
/// A missing `success` field is treated as success; only an explicit
/// `false` marks a business-level failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: Some("SUCCESS".to_string()),
            message: None,
            data: Some(data),
        }
    }

    /// Take `data`, failing when the backend omitted it.
    pub fn into_data(self) -> Result<T> {
        self.data.ok_or_else(|| {
            TownError::InvalidResponse(format!(
                "response envelope has no data (code: {})",
                self.code.as_deref().unwrap_or("none")
            ))
        })
    }
}

/// Void payload for endpoints whose `data` is always `null`.
pub type Empty = serde::de::IgnoredAny;

/// Read a JSON body, mapping any read or parse failure to `None`.
pub async fn safe_json<T: DeserializeOwned>(resp: reqwest::Response) -> Option<T> {
    let bytes = resp.bytes().await.ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        access_token: String,
    }

    #[test]
    fn parses_full_envelope() {
        let env: ApiResponse<Payload> = serde_json::from_value(json!({
            "success": true,
            "code": "SUCCESS",
            "message": "ok",
            "data": { "accessToken": "abc" }
        }))
        .unwrap();
        assert!(env.success);
        assert_eq!(env.into_data().unwrap().access_token, "abc");
    }

    #[test]
    fn missing_success_defaults_to_true() {
        let env: ApiResponse<Payload> = serde_json::from_value(json!({})).unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn into_data_reports_missing_payload() {
        let env: ApiResponse<Payload> = serde_json::from_value(json!({
            "success": true,
            "code": "SUCCESS",
            "data": null
        }))
        .unwrap();
        match env.into_data() {
            Err(TownError::InvalidResponse(msg)) => assert!(msg.contains("SUCCESS")),
            other => panic!("expected InvalidResponse, got {other:?}"),
        }
    }

    #[test]
    fn empty_payload_accepts_any_data() {
        let env: ApiResponse<Empty> = serde_json::from_value(json!({
            "success": true,
            "data": { "anything": [1, 2, 3] }
        }))
        .unwrap();
        assert!(env.data.is_some());
    }
}
