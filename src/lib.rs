//! townsquare: client SDK and same-origin proxy for a neighborhood community
//! platform.
//!
//! The core is an authenticated fetch wrapper: requests carry the current
//! access token, and a 401 triggers one single-flight token reissue (backed by
//! an HTTP-only refresh cookie) followed by one retry. Typed resource bindings
//! for meetings, events, Q&A and user pages sit on top of it, and the optional
//! `proxy` feature serves a small axum router that forwards the answers API.
//!
//! # Quick Start
//!
//! ```no_run
//! use townsquare::prelude::*;
//!
//! # async fn example() -> townsquare::error::Result<()> {
//! let api = ApiClient::new(ClientConfig::from_env())?;
//! let auth = AuthService::new(api.clone());
//! auth.login("neighbor@example.com", "secret").await?;
//!
//! let meetings = townsquare::resources::meetings::list(
//!     &api,
//!     &townsquare::resources::meetings::MeetingSearch::default(),
//! )
//! .await?;
//! println!("{} meetings", meetings.total_elements);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod prelude;
pub mod resources;

#[cfg(feature = "proxy")]
pub mod proxy;

#[cfg(feature = "cli")]
pub mod cli;
