//! One-off town events, flash (short-notice) events and the calendar view.

use bon::Builder;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{active_filter, JoinMessage, JoinRequest, ParticipantRole};
use crate::client::pagination::DEFAULT_PAGE_SIZE;
use crate::client::{ApiClient, Empty, Page, RequestOptions};
use crate::error::Result;

/// Page size of `GET /api/events/flash`.
pub const FLASH_PAGE_SIZE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Festival,
    Volunteer,
    Culture,
    Sports,
    Education,
    Etc,
    Flash,
}

/// Event lifecycle status. Values this client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Recruiting,
    Closed,
    Canceled,
    #[strum(default)]
    Other(String),
}

impl EventStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Recruiting => "RECRUITING",
            Self::Closed => "CLOSED",
            Self::Canceled => "CANCELED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EventStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Self::Other(value))
    }
}

impl From<EventStatus> for String {
    fn from(status: EventStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Why a join button is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CtaBadge {
    Canceled,
    Ended,
    Full,
}

/// Join button state for an event card or detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCta {
    pub disabled: bool,
    pub badge: Option<CtaBadge>,
}

impl EventCta {
    /// Canceled wins over closed or ended, which wins over full.
    ///
    /// A `capacity` of zero means unlimited.
    pub fn for_event(status: &EventStatus, capacity: u32, member_count: u64, ended: bool) -> Self {
        let badge = if *status == EventStatus::Canceled {
            Some(CtaBadge::Canceled)
        } else if *status == EventStatus::Closed || ended {
            Some(CtaBadge::Ended)
        } else if capacity > 0 && member_count >= u64::from(capacity) {
            Some(CtaBadge::Full)
        } else {
            None
        };
        Self {
            disabled: badge.is_some(),
            badge,
        }
    }

    pub fn can_join(&self) -> bool {
        !self.disabled
    }
}

/// Filters for the event list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct EventSearch {
    #[builder(default)]
    pub page: u32,
    #[builder(into)]
    pub keyword: Option<String>,
    #[builder(into)]
    pub category: Option<String>,
    #[builder(into)]
    pub status: Option<String>,
    #[builder(into)]
    pub province: Option<String>,
    #[builder(into)]
    pub city: Option<String>,
}

impl EventSearch {
    fn to_options(&self, size: u32) -> RequestOptions {
        RequestOptions::get()
            .query("page", self.page)
            .query("size", size)
            .query_opt("category", active_filter(self.category.as_deref()))
            .query_opt("status", active_filter(self.status.as_deref()))
            .query_opt("keyword", active_filter(self.keyword.as_deref()))
            .query_opt("province", active_filter(self.province.as_deref()))
            .query_opt("city", active_filter(self.city.as_deref()))
    }
}

/// Date range and area for `GET /api/events/calendar`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct CalendarQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[builder(into)]
    pub province: Option<String>,
    #[builder(into)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub event_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<EventCategory>,
    pub status: EventStatus,
    #[serde(default)]
    pub event_place: Option<String>,
    #[serde(default)]
    pub start_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub member_count: u64,
}

impl EventSummary {
    pub fn cta(&self) -> EventCta {
        EventCta::for_event(&self.status, self.capacity, self.member_count, false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMember {
    pub user_id: i64,
    pub nickname: String,
    pub role: ParticipantRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub event_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<EventCategory>,
    pub status: EventStatus,
    #[serde(default)]
    pub event_place: Option<String>,
    #[serde(default)]
    pub start_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub member_count: Option<u64>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub host_user_id: Option<i64>,
    #[serde(default)]
    pub host_nickname: Option<String>,
    #[serde(default)]
    pub is_ended: bool,
    #[serde(default)]
    pub members: Vec<EventMember>,
}

impl EventDetail {
    pub fn cta(&self) -> EventCta {
        EventCta::for_event(
            &self.status,
            self.capacity.unwrap_or(0),
            self.member_count.unwrap_or(0),
            self.is_ended,
        )
    }

    pub fn is_hosted_by(&self, user_id: i64) -> bool {
        self.host_user_id == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub start_at: Option<NaiveDateTime>,
    pub status: EventStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedMember {
    pub event_member_id: i64,
    pub nickname: String,
    pub role: ParticipantRole,
    #[serde(default)]
    pub joined_at: Option<NaiveDateTime>,
}

/// Body of `POST /api/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    #[builder(into)]
    pub title: String,
    #[builder(into)]
    pub description: String,
    pub category: EventCategory,
    pub location_id: i64,
    #[builder(into)]
    pub event_place: String,
    pub start_at: NaiveDateTime,
    pub capacity: u32,
}

/// Body of `PATCH /api/events/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub event_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub event_id: i64,
    pub status: EventStatus,
}

pub async fn list(api: &ApiClient, search: &EventSearch) -> Result<Page<EventSummary>> {
    api.fetch_json("/api/events", search.to_options(DEFAULT_PAGE_SIZE))
        .await?
        .into_data()
}

pub async fn flash(api: &ApiClient, search: &EventSearch) -> Result<Page<EventSummary>> {
    api.fetch_json("/api/events/flash", search.to_options(FLASH_PAGE_SIZE))
        .await?
        .into_data()
}

pub async fn calendar(api: &ApiClient, query: &CalendarQuery) -> Result<Vec<CalendarEntry>> {
    let options = RequestOptions::get()
        .query_opt("from", query.from)
        .query_opt("to", query.to)
        .query_opt("province", active_filter(query.province.as_deref()))
        .query_opt("city", active_filter(query.city.as_deref()));
    let resp = api.fetch_json("/api/events/calendar", options).await?;
    Ok(resp.data.unwrap_or_default())
}

pub async fn detail(api: &ApiClient, event_id: i64) -> Result<EventDetail> {
    api.get(&format!("/api/events/{event_id}")).await?.into_data()
}

pub async fn create(api: &ApiClient, event: &NewEvent) -> Result<CreatedEvent> {
    api.post("/api/events", event).await?.into_data()
}

pub async fn update(api: &ApiClient, event_id: i64, update: &EventUpdate) -> Result<()> {
    api.patch::<_, Empty>(&format!("/api/events/{event_id}"), update)
        .await?;
    Ok(())
}

pub async fn delete(api: &ApiClient, event_id: i64) -> Result<()> {
    api.delete::<Empty>(&format!("/api/events/{event_id}"))
        .await?;
    Ok(())
}

pub async fn request_join(api: &ApiClient, event_id: i64, message: &str) -> Result<()> {
    api.post::<_, Empty>(
        &format!("/api/events/{event_id}/join-requests"),
        &JoinMessage { message },
    )
    .await?;
    Ok(())
}

/// Withdraw the caller's pending join request for `event_id`.
pub async fn cancel_join_request(api: &ApiClient, event_id: i64) -> Result<()> {
    api.delete::<Empty>(&format!("/api/events/{event_id}/join-requests"))
        .await?;
    Ok(())
}

pub async fn join_requests(api: &ApiClient, event_id: i64) -> Result<Vec<JoinRequest>> {
    let resp = api
        .get(&format!("/api/events/{event_id}/manage/join-requests"))
        .await?;
    Ok(resp.data.unwrap_or_default())
}

pub async fn approve_join_request(api: &ApiClient, event_id: i64, request_id: i64) -> Result<()> {
    api.post_empty::<Empty>(&format!(
        "/api/events/{event_id}/manage/join-requests/{request_id}/approve"
    ))
    .await?;
    Ok(())
}

pub async fn reject_join_request(api: &ApiClient, event_id: i64, request_id: i64) -> Result<()> {
    api.post_empty::<Empty>(&format!(
        "/api/events/{event_id}/manage/join-requests/{request_id}/reject"
    ))
    .await?;
    Ok(())
}

pub async fn members(api: &ApiClient, event_id: i64) -> Result<Vec<ManagedMember>> {
    let resp = api
        .get(&format!("/api/events/{event_id}/manage/members"))
        .await?;
    Ok(resp.data.unwrap_or_default())
}

pub async fn remove_member(api: &ApiClient, event_id: i64, member_id: i64) -> Result<()> {
    api.delete::<Empty>(&format!("/api/events/{event_id}/manage/members/{member_id}"))
        .await?;
    Ok(())
}
