//! Data models for Bounce resources.
//!
//! The client treats response bodies as opaque JSON. These types are
//! typed views callers can decode an `ApiResponse` into, plus the request
//! bodies the client sends:
//!
//! - `User`, `NewUser`, `UserUpdate`
//! - `Club`, `NewClub`, `ClubUpdate`, `ClubSearchResults`
//! - `Membership`

pub mod club;
pub mod membership;
pub mod user;

pub use club::{Club, ClubSearchResults, ClubUpdate, NewClub};
pub use membership::Membership;
pub use user::{Credentials, NewUser, User, UserUpdate};

use chrono::{DateTime, Utc};

/// Convert a unix timestamp in seconds from the API into a UTC datetime
pub(crate) fn timestamp_to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}
