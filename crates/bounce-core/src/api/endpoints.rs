//! Request descriptors for every Bounce API route the client uses.

use super::request::{resource_path, ApiRequest};
use super::ApiError;
use crate::models::{ClubUpdate, Credentials, NewClub, NewUser, UserUpdate};

pub fn login(username: &str, password: &str) -> Result<ApiRequest, ApiError> {
    ApiRequest::post("/auth/login").json(&Credentials { username, password })
}

// ===== Users =====

pub fn get_user(username: &str) -> ApiRequest {
    ApiRequest::get(resource_path(&["users", username]))
}

pub fn create_user(user: &NewUser) -> Result<ApiRequest, ApiError> {
    ApiRequest::post("/users").json(user)
}

pub fn update_user(username: &str, update: &UserUpdate) -> Result<ApiRequest, ApiError> {
    ApiRequest::put(resource_path(&["users", username])).json(update)
}

pub fn delete_user(username: &str) -> ApiRequest {
    ApiRequest::delete(resource_path(&["users", username]))
}

// ===== Clubs =====

pub fn get_club(name: &str) -> ApiRequest {
    ApiRequest::get(resource_path(&["clubs", name]))
}

pub fn create_club(club: &NewClub) -> Result<ApiRequest, ApiError> {
    ApiRequest::post("/clubs").json(club)
}

pub fn update_club(name: &str, update: &ClubUpdate) -> Result<ApiRequest, ApiError> {
    ApiRequest::put(resource_path(&["clubs", name])).json(update)
}

pub fn delete_club(name: &str) -> ApiRequest {
    ApiRequest::delete(resource_path(&["clubs", name]))
}

pub fn search_clubs(query: &str) -> ApiRequest {
    ApiRequest::get("/clubs/search").query("query", query)
}

// ===== Memberships =====

/// Without a user id the request covers every membership of the club
pub fn get_memberships(club_name: &str, user_id: Option<&str>) -> ApiRequest {
    ApiRequest::get(resource_path(&["memberships", club_name])).query_opt("user_id", user_id)
}

pub fn delete_memberships(club_name: &str, user_id: Option<&str>) -> ApiRequest {
    ApiRequest::delete(resource_path(&["memberships", club_name])).query_opt("user_id", user_id)
}

pub fn add_membership(club_name: &str, user_id: &str) -> ApiRequest {
    ApiRequest::put(resource_path(&["memberships", club_name])).query("user_id", user_id)
}
