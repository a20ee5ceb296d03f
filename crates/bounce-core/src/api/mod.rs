//! REST API client module for the Bounce backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! Bounce API to manage users, clubs and memberships.
//!
//! The API issues a JSON web token from `/auth/login`. The token is sent
//! back verbatim in the `Authorization` header of every later request.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod response;

pub use client::ApiClient;
pub use error::ApiError;
pub use request::ApiRequest;
pub use response::ApiResponse;
