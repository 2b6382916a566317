//! Meetings: recurring neighborhood groups with host-managed membership.

use bon::Builder;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{active_filter, JoinMessage, JoinRequest, ParticipantRole};
use crate::client::pagination::DEFAULT_PAGE_SIZE;
use crate::client::{ApiClient, Empty, Page, RequestOptions};
use crate::error::Result;

/// Filters for `GET /api/meetings`. [`ALL_FILTER`](super::ALL_FILTER) and
/// blank values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct MeetingSearch {
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

impl MeetingSearch {
    fn to_options(&self) -> RequestOptions {
        RequestOptions::get()
            .query("page", self.page)
            .query("size", DEFAULT_PAGE_SIZE)
            .query_opt("keyword", active_filter(self.keyword.as_deref()))
            .query_opt("category", active_filter(self.category.as_deref()))
            .query_opt("status", active_filter(self.status.as_deref()))
            .query_opt("province", active_filter(self.province.as_deref()))
            .query_opt("city", active_filter(self.city.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSummary {
    pub meeting_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub member_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingMember {
    pub user_id: i64,
    pub nickname: String,
    pub role: ParticipantRole,
    #[serde(default)]
    pub joined_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetail {
    pub meeting_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub meeting_place: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub members: Vec<MeetingMember>,
}

impl MeetingDetail {
    pub fn host(&self) -> Option<&MeetingMember> {
        self.members.iter().find(|m| m.role == ParticipantRole::Host)
    }
}

/// Body of `POST /api/meetings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    #[builder(into)]
    pub title: String,
    #[builder(into)]
    pub description: String,
    #[builder(into)]
    pub category: String,
    pub location_id: i64,
    #[builder(into)]
    pub meeting_place: String,
    #[builder(into)]
    pub schedule: String,
    pub capacity: u32,
}

/// Body of `PATCH /api/meetings/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct MeetingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub meeting_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedMeeting {
    pub meeting_id: i64,
    #[serde(default)]
    pub status: Option<String>,
}

pub async fn list(api: &ApiClient, search: &MeetingSearch) -> Result<Page<MeetingSummary>> {
    api.fetch_json("/api/meetings", search.to_options())
        .await?
        .into_data()
}

pub async fn detail(api: &ApiClient, meeting_id: i64) -> Result<MeetingDetail> {
    api.get(&format!("/api/meetings/{meeting_id}"))
        .await?
        .into_data()
}

pub async fn create(api: &ApiClient, meeting: &NewMeeting) -> Result<CreatedMeeting> {
    api.post("/api/meetings", meeting).await?.into_data()
}

pub async fn update(api: &ApiClient, meeting_id: i64, update: &MeetingUpdate) -> Result<()> {
    api.patch::<_, Empty>(&format!("/api/meetings/{meeting_id}"), update)
        .await?;
    Ok(())
}

/// Ask to join; the host approves or rejects later.
pub async fn join(api: &ApiClient, meeting_id: i64, message: &str) -> Result<()> {
    api.post::<_, Empty>(
        &format!("/api/meetings/{meeting_id}/join"),
        &JoinMessage { message },
    )
    .await?;
    Ok(())
}

pub async fn join_requests(api: &ApiClient, meeting_id: i64) -> Result<Vec<JoinRequest>> {
    let resp = api
        .get(&format!("/api/meetings/{meeting_id}/manage/join-requests"))
        .await?;
    Ok(resp.data.unwrap_or_default())
}

pub async fn approve_join_request(api: &ApiClient, meeting_id: i64, request_id: i64) -> Result<()> {
    api.post_empty::<Empty>(&format!(
        "/api/meetings/{meeting_id}/manage/join-requests/{request_id}/approve"
    ))
    .await?;
    Ok(())
}

pub async fn reject_join_request(api: &ApiClient, meeting_id: i64, request_id: i64) -> Result<()> {
    api.post_empty::<Empty>(&format!(
        "/api/meetings/{meeting_id}/manage/join-requests/{request_id}/reject"
    ))
    .await?;
    Ok(())
}

pub async fn members(api: &ApiClient, meeting_id: i64) -> Result<Vec<MeetingMember>> {
    let resp = api
        .get(&format!("/api/meetings/{meeting_id}/manage/members"))
        .await?;
    Ok(resp.data.unwrap_or_default())
}

pub async fn remove_member(api: &ApiClient, meeting_id: i64, member_id: i64) -> Result<()> {
    api.delete::<Empty>(&format!(
        "/api/meetings/{meeting_id}/manage/members/{member_id}"
    ))
    .await?;
    Ok(())
}
