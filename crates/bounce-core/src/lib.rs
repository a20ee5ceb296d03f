//! Core library for the Bounce club discovery client.
//!
//! - `api`: the authenticated `ApiClient` and its request/response types
//! - `auth`: the in-memory `Session`, token claim decoding, session
//!   persistence and OS keychain credentials
//! - `config`: client configuration loading
//! - `models`: request bodies and typed views of Bounce resources

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, ApiResponse};
pub use auth::{Session, TokenClaims};
pub use config::Config;
