//! Answers to Q&A questions, including accept/unaccept by the asker.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, Empty};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,
    pub content: String,
    #[serde(default, alias = "accepted")]
    pub is_accepted: bool,
    #[serde(default)]
    pub writer_id: Option<i64>,
    #[serde(default)]
    pub writer_nickname: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerBody<'a> {
    pub content: &'a str,
}

pub async fn list(api: &ApiClient, question_id: i64) -> Result<Vec<Answer>> {
    let resp = api
        .get(&format!("/api/questions/{question_id}/answers"))
        .await?;
    Ok(resp.data.unwrap_or_default())
}

pub async fn create(api: &ApiClient, question_id: i64, content: &str) -> Result<()> {
    api.post::<_, Empty>(
        &format!("/api/questions/{question_id}/answers"),
        &AnswerBody { content },
    )
    .await?;
    Ok(())
}

pub async fn update(api: &ApiClient, answer_id: i64, content: &str) -> Result<()> {
    api.patch::<_, Empty>(&format!("/api/answers/{answer_id}"), &AnswerBody { content })
        .await?;
    Ok(())
}

pub async fn delete(api: &ApiClient, answer_id: i64) -> Result<()> {
    api.delete::<Empty>(&format!("/api/answers/{answer_id}"))
        .await?;
    Ok(())
}

pub async fn accept(api: &ApiClient, answer_id: i64) -> Result<()> {
    api.patch_empty::<Empty>(&format!("/api/answers/{answer_id}/accept"))
        .await?;
    Ok(())
}

pub async fn unaccept(api: &ApiClient, answer_id: i64) -> Result<()> {
    api.patch_empty::<Empty>(&format!("/api/answers/{answer_id}/unaccept"))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepted_flag_reads_either_name() {
        let a: Answer = serde_json::from_value(json!({ "id": 1, "content": "x", "isAccepted": true })).unwrap();
        let b: Answer = serde_json::from_value(json!({ "id": 2, "content": "y", "accepted": true })).unwrap();
        assert!(a.is_accepted && b.is_accepted);
    }
}
