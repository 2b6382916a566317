//! Locations and the per-town dashboard.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, RequestOptions};
use crate::error::Result;

/// The town a user is browsing: a location id with its province and city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Town {
    pub id: i64,
    pub province: String,
    pub city: String,
}

impl Town {
    pub fn new(id: i64, province: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id,
            province: province.into(),
            city: city.into(),
        }
    }

    /// "province city", as shown in headers.
    pub fn label(&self) -> String {
        format!("{} {}", self.province, self.city)
    }
}

/// A searchable location row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub province: String,
    pub city: String,
    #[serde(default)]
    pub town: Option<String>,
}

impl From<Location> for Town {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            province: location.province,
            city: location.city,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownStats {
    pub active_meetings: u64,
    pub upcoming_events: u64,
    pub total_questions: u64,
    pub active_users: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularMeeting {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub members: u32,
    pub max_members: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub start_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub members: Option<u32>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuestion {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TownDashboard {
    pub stats: TownStats,
    pub popular_meetings: Vec<PopularMeeting>,
    pub upcoming_events: Vec<UpcomingEvent>,
    pub latest_questions: Vec<LatestQuestion>,
}

/// `GET /api/locations?keyword=`
pub async fn search_locations(api: &ApiClient, keyword: &str) -> Result<Vec<Location>> {
    let options = RequestOptions::get().query("keyword", keyword.trim());
    let resp = api.fetch_json("/api/locations", options).await?;
    Ok(resp.data.unwrap_or_default())
}

/// `GET /api/towns/{id}/dashboard`
pub async fn dashboard(api: &ApiClient, town_id: i64) -> Result<TownDashboard> {
    api.get(&format!("/api/towns/{town_id}/dashboard"))
        .await?
        .into_data()
}
