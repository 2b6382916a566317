//! HTTP client stack: request options, authenticated fetch, envelope handling
//! and pagination.

pub mod api;
pub mod auth_fetch;
pub mod envelope;
pub mod http;
pub mod pagination;
pub mod request;

pub use api::ApiClient;
pub use auth_fetch::AuthFetch;
pub use envelope::{ApiResponse, Empty};
pub use http::HttpClients;
pub use pagination::{CursorFeed, CursorPage, Page, PageFeed, PageRequest};
pub use request::{Attempt, Credentials, RequestOptions};
