//! Access token storage, single-flight reissue and session flows.

pub mod error;
pub mod reissue;
pub mod service;
pub mod session;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use reissue::{HttpReissuer, ReissueCoordinator, ReissueOutcome, Reissuer};
pub use service::{AuthService, SignedInUser};
pub use session::Session;
pub use store::{MemoryTokenStore, TokenStore};
pub use token::AccessToken;
