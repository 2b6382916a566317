//! Convenience re-exports for common use.

pub use crate::auth::{AccessToken, AuthService, MemoryTokenStore, Session, SignedInUser, TokenStore};
pub use crate::client::{ApiClient, ApiResponse, Credentials, RequestOptions};
pub use crate::config::ClientConfig;
pub use crate::error::{Result, TownError};
pub use crate::events::{EventBus, SessionEvent, ToastVariant};
pub use crate::resources::towns::Town;
