//! Typed bindings for the backend REST resources.
//!
//! Every function here goes through [`ApiClient`](crate::client::ApiClient),
//! so bearer attachment, 401 recovery and envelope errors behave the same
//! across resources.

pub mod answers;
pub mod categories;
pub mod events;
pub mod meetings;
pub mod questions;
pub mod towns;
pub mod users;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Filter value the list screens use for "no filter".
pub const ALL_FILTER: &str = "전체";

/// Drop empty and [`ALL_FILTER`] values so they are not sent as query params.
pub(crate) fn active_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL_FILTER)
}

/// Participant role in a meeting or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    Host,
    Member,
}

/// Join message body shared by meeting and event join requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinMessage<'a> {
    pub message: &'a str,
}

/// A pending request to join a meeting or event, as seen by its host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub request_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub requested_at: Option<NaiveDateTime>,
}
