//! Account and "my page" endpoints.
//!
//! Login, logout and the bootstrap flow live in
//! [`AuthService`](crate::auth::AuthService); this module holds the rest of
//! `/api/users`.

use bon::Builder;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::towns::Town;
use crate::client::{ApiClient, CursorPage, Empty, RequestOptions};
use crate::error::Result;

/// Page size of the cursor-paged "my ..." lists.
pub const MY_LIST_PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
pub struct SignupRequest {
    #[builder(into)]
    pub email: String,
    #[builder(into)]
    pub password: String,
    #[builder(into)]
    pub nickname: String,
    #[builder(into)]
    pub province: String,
    #[builder(into)]
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupResponse {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct DuplicateCheck {
    available: bool,
}

/// `GET /api/users/me` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMe {
    pub user_id: i64,
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl UserMe {
    /// The user's town, when the profile carries a complete location.
    pub fn town(&self) -> Option<Town> {
        match (self.location_id, &self.province, &self.city) {
            (Some(id), Some(province), Some(city)) => {
                Some(Town::new(id, province.clone(), city.clone()))
            }
            _ => None,
        }
    }
}

/// `PATCH /api/users/me` body. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub new_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawRequest<'a> {
    current_password: &'a str,
}

/// `GET /api/users/mypage` summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPageSummary {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub groups: u64,
    #[serde(default)]
    pub events: u64,
    #[serde(default)]
    pub qna: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyMeetingItem {
    pub meeting_id: i64,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub participant_count: u32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub joined_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyEventItem {
    pub event_id: i64,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub participant_count: u32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub joined_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyQuestionItem {
    pub question_id: i64,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub answer_count: u32,
}

/// `POST /api/users/signup`. Sent without a bearer token.
pub async fn signup(api: &ApiClient, request: &SignupRequest) -> Result<SignupResponse> {
    let options = RequestOptions::post().anonymous().json(request)?;
    api.fetch_json("/api/users/signup", options)
        .await?
        .into_data()
}

/// Whether `email` is still free to register.
pub async fn check_email(api: &ApiClient, email: &str) -> Result<bool> {
    check_available(api, "/api/users/check-email", "email", email).await
}

/// Whether `nickname` is still free to register.
pub async fn check_nickname(api: &ApiClient, nickname: &str) -> Result<bool> {
    check_available(api, "/api/users/check-nickname", "nickname", nickname).await
}

async fn check_available(api: &ApiClient, path: &str, key: &str, value: &str) -> Result<bool> {
    let options = RequestOptions::get().anonymous().query(key, value.trim());
    let check: DuplicateCheck = api.fetch_json(path, options).await?.into_data()?;
    Ok(check.available)
}

/// `GET /api/users/me`
pub async fn me(api: &ApiClient) -> Result<UserMe> {
    api.get("/api/users/me").await?.into_data()
}

/// `PATCH /api/users/me`
pub async fn update_profile(api: &ApiClient, update: &ProfileUpdate) -> Result<()> {
    api.patch::<_, Empty>("/api/users/me", update).await?;
    Ok(())
}

/// `DELETE /api/users/me`, confirmed with the current password. Ends the
/// local session on success.
pub async fn withdraw(api: &ApiClient, current_password: &str) -> Result<()> {
    let options = RequestOptions::delete().json(&WithdrawRequest { current_password })?;
    api.fetch_json::<Empty>("/api/users/me", options).await?;
    api.session().end();
    Ok(())
}

/// `GET /api/users/mypage`
pub async fn my_page(api: &ApiClient) -> Result<MyPageSummary> {
    api.get("/api/users/mypage").await?.into_data()
}

pub async fn my_meetings(api: &ApiClient, cursor: Option<i64>) -> Result<CursorPage<MyMeetingItem>> {
    my_list(api, "/api/users/me/meetings", cursor).await
}

pub async fn my_events(api: &ApiClient, cursor: Option<i64>) -> Result<CursorPage<MyEventItem>> {
    my_list(api, "/api/users/me/events", cursor).await
}

pub async fn my_questions(
    api: &ApiClient,
    cursor: Option<i64>,
) -> Result<CursorPage<MyQuestionItem>> {
    my_list(api, "/api/users/me/questions", cursor).await
}

async fn my_list<T>(api: &ApiClient, path: &str, cursor: Option<i64>) -> Result<CursorPage<T>>
where
    T: serde::de::DeserializeOwned,
{
    let options = RequestOptions::get()
        .query_opt("cursor", cursor)
        .query("size", MY_LIST_PAGE_SIZE);
    api.fetch_json(path, options).await?.into_data()
}
