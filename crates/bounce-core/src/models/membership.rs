use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp_to_utc;

/// One entry of `GET /memberships/<club>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: i64,
    pub full_name: String,
    pub username: String,
    pub created_at: i64,
}

impl Membership {
    pub fn joined_at(&self) -> Option<DateTime<Utc>> {
        timestamp_to_utc(self.created_at)
    }
}
