//! Error classification shared by the client and the proxy.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Server,
    Api,
    Configuration,
    Serialization,
    Unknown,
}

/// Backend error code meaning "no session": the refresh cookie is missing.
///
/// A failed reissue carrying this code is a normal logged-out state and must
/// not raise a session-expired notification.
pub const NOT_AUTHENTICATED_CODE: &str = "TOKEN_003";

/// Error code the proxy uses when the backend cannot be reached.
pub const PROXY_ERROR_CODE: &str = "PROXY_ERROR";
