use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp_to_utc;

/// A Bounce user as returned by `GET /users/<username>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    pub created_at: i64,
}

impl User {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        timestamp_to_utc(self.created_at)
    }
}

/// Body of `POST /auth/login`
#[derive(Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /users`
#[derive(Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

/// Partial update for `PUT /users/<username>`.
/// Only fields that are `Some` are sent, so unset fields keep their
/// server-side values. `Some(String::new())` is sent as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none()
    }
}
