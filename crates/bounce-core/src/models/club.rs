use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp_to_utc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub facebook_url: String,
    #[serde(default)]
    pub instagram_url: String,
    #[serde(default)]
    pub twitter_url: String,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl Club {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.and_then(timestamp_to_utc)
    }

    /// Non-empty links with a display label
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Website", self.website_url.as_str()),
            ("Facebook", self.facebook_url.as_str()),
            ("Instagram", self.instagram_url.as_str()),
            ("Twitter", self.twitter_url.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .collect()
    }
}

/// Body of `POST /clubs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewClub {
    pub name: String,
    pub description: String,
    pub website_url: String,
    pub facebook_url: String,
    pub instagram_url: String,
    pub twitter_url: String,
}

/// Partial update for `PUT /clubs/<name>`; `name` renames the club.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
}

/// Page of results from `GET /clubs/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubSearchResults {
    #[serde(default)]
    pub results: Vec<Club>,
    #[serde(default)]
    pub result_count: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub total_pages: u64,
}
