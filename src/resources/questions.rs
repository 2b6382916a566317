//! Neighborhood Q&A questions.

use bon::Builder;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::active_filter;
use crate::client::pagination::DEFAULT_PAGE_SIZE;
use crate::client::{ApiClient, Empty, Page, RequestOptions};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionCategory {
    Restaurant,
    Hospital,
    Living,
    Traffic,
    Education,
    Housing,
    Etc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct QuestionSearch {
    #[builder(default)]
    pub page: u32,
    /// Matched against titles.
    #[builder(into)]
    pub search: Option<String>,
    #[builder(into)]
    pub category: Option<String>,
    #[builder(into)]
    pub province: Option<String>,
    #[builder(into)]
    pub city: Option<String>,
}

impl QuestionSearch {
    fn to_options(&self) -> RequestOptions {
        RequestOptions::get()
            .query("page", self.page)
            .query("size", DEFAULT_PAGE_SIZE)
            .query_opt("search", active_filter(self.search.as_deref()))
            .query_opt("category", active_filter(self.category.as_deref()))
            .query_opt("province", active_filter(self.province.as_deref()))
            .query_opt("city", active_filter(self.city.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub writer: Option<String>,
    #[serde(default)]
    pub category: Option<QuestionCategory>,
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Question {
    pub fn is_written_by(&self, user_id: i64) -> bool {
        self.author_id == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    #[builder(into)]
    pub title: String,
    #[builder(into)]
    pub content: String,
    pub question_category: QuestionCategory,
    pub location_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_category: Option<QuestionCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub content: Option<String>,
}

pub async fn list(api: &ApiClient, search: &QuestionSearch) -> Result<Page<Question>> {
    api.fetch_json("/api/questions", search.to_options())
        .await?
        .into_data()
}

pub async fn detail(api: &ApiClient, question_id: i64) -> Result<Question> {
    api.get(&format!("/api/questions/{question_id}"))
        .await?
        .into_data()
}

/// Count a view and return the refreshed question.
pub async fn record_view(api: &ApiClient, question_id: i64) -> Result<Question> {
    api.post_empty(&format!("/api/questions/{question_id}/views"))
        .await?
        .into_data()
}

/// Returns the new question's id.
pub async fn create(api: &ApiClient, question: &NewQuestion) -> Result<i64> {
    api.post("/api/questions", question).await?.into_data()
}

pub async fn update(api: &ApiClient, question_id: i64, update: &QuestionUpdate) -> Result<()> {
    api.patch::<_, Empty>(&format!("/api/questions/{question_id}"), update)
        .await?;
    Ok(())
}

pub async fn delete(api: &ApiClient, question_id: i64) -> Result<()> {
    api.delete::<Empty>(&format!("/api/questions/{question_id}"))
        .await?;
    Ok(())
}
