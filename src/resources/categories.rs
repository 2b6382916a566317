//! Q&A category names.

use crate::client::envelope::safe_json;
use crate::client::{ApiClient, RequestOptions};
use crate::error::{Result, TownError};

/// `GET /api/categories`. The backend answers with a bare JSON array of
/// display names rather than the usual envelope.
pub async fn list(api: &ApiClient) -> Result<Vec<String>> {
    let resp = api
        .fetch_raw("/api/categories", RequestOptions::get())
        .await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(TownError::api(status.as_u16(), "Failed to load categories"));
    }
    safe_json(resp)
        .await
        .ok_or_else(|| TownError::InvalidResponse("categories is not a JSON array".to_string()))
}
