//! API client for communicating with the Bounce REST API.
//!
//! This module provides the `ApiClient` struct. It owns the base URL and
//! the `Session`, turns each operation into one HTTP request, and hands
//! the response back whatever its status.

use std::time::Duration;

use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::endpoints;
use super::request::dot_segment;
use super::{ApiError, ApiRequest, ApiResponse};
use crate::auth::{Session, TokenClaims};
use crate::config::Config;
use crate::models::{ClubUpdate, NewClub, NewUser, UserUpdate};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// API client for Bounce.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
/// Each clone owns its own session.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_scheme: Option<String>,
    session: Session,
}

impl ApiClient {
    /// Create a signed-out client for the given base URL
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::from_config(&Config {
            base_url: base_url.to_string(),
            ..Config::default()
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_scheme: config.auth_scheme.clone(),
            session: Session::new(),
        })
    }

    /// Create a new ApiClient holding the given token, sharing the connection pool.
    /// The token is not validated; a malformed one still counts as signed in.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            auth_scheme: self.auth_scheme.clone(),
            session: Session::with_token(token),
        }
    }

    /// Replace the held token, keeping no username
    pub fn set_token(&mut self, token: String) {
        self.session = Session::with_token(token);
    }

    /// Resume a session, e.g. one loaded from disk
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    /// Username of the last successful `authenticate`
    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    /// The `id` claim of the held token, without contacting the API.
    /// `None` when signed out or when the token cannot be decoded.
    pub fn user_id_from_token(&self) -> Option<String> {
        self.session.user_id()
    }

    pub fn token_claims(&self) -> Option<TokenClaims> {
        self.session.claims()
    }

    pub fn sign_out(&mut self) {
        if self.session.is_signed_in() {
            info!(username = ?self.session.username(), "Signed out");
        }
        self.session.sign_out();
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = self.session.token() {
            let value = match self.auth_scheme {
                Some(ref scheme) => format!("{} {}", scheme, token),
                None => token.to_string(),
            };
            let mut value = header::HeaderValue::from_str(&value)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Build the HTTP request for a descriptor without sending it
    pub fn build_request(&self, request: &ApiRequest) -> Result<reqwest::Request, ApiError> {
        if let Some(segment) = dot_segment(request.path()) {
            return Err(ApiError::InvalidPath(segment.to_string()));
        }
        let url = format!("{}{}", self.base_url, request.path_and_query());
        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(self.auth_headers()?);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        Ok(builder.build()?)
    }

    /// Send a request and read the whole response. Non-2xx statuses are
    /// returned as responses, only transport failures are errors.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let http_request = self.build_request(&request)?;
        debug!(method = %request.method(), path = request.path(), "Sending API request");

        let response = self.client.execute(http_request).await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!(
            method = %request.method(),
            path = request.path(),
            status = status.as_u16(),
            "Received API response"
        );
        Ok(ApiResponse::new(status, body))
    }

    /// Sign in with the API. On a 2xx response the token from the body
    /// becomes the session token; any other response leaves the session as
    /// it was. The response is returned either way.
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<ApiResponse, ApiError> {
        let response = self.send(endpoints::login(username, password)?).await?;

        if response.is_success() {
            match response.json::<LoginResponse>() {
                Ok(login) => {
                    self.session.sign_in(login.token, Some(username.to_string()));
                    info!(username, "Signed in");
                }
                Err(e) => {
                    warn!(username, error = %e, "Login response did not carry a token");
                }
            }
        } else {
            debug!(username, status = response.status().as_u16(), "Sign-in rejected");
        }

        Ok(response)
    }

    // ===== Users =====

    pub async fn get_user(&self, username: &str) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::get_user(username)).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::create_user(user)?).await
    }

    pub async fn update_user(
        &self,
        username: &str,
        update: &UserUpdate,
    ) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::update_user(username, update)?).await
    }

    pub async fn delete_user(&self, username: &str) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::delete_user(username)).await
    }

    // ===== Clubs =====

    pub async fn get_club(&self, name: &str) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::get_club(name)).await
    }

    pub async fn create_club(&self, club: &NewClub) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::create_club(club)?).await
    }

    pub async fn update_club(
        &self,
        name: &str,
        update: &ClubUpdate,
    ) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::update_club(name, update)?).await
    }

    pub async fn delete_club(&self, name: &str) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::delete_club(name)).await
    }

    pub async fn search_clubs(&self, query: &str) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::search_clubs(query)).await
    }

    // ===== Memberships =====

    pub async fn get_memberships(
        &self,
        club_name: &str,
        user_id: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::get_memberships(club_name, user_id)).await
    }

    pub async fn delete_memberships(
        &self,
        club_name: &str,
        user_id: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::delete_memberships(club_name, user_id)).await
    }

    pub async fn add_membership(
        &self,
        club_name: &str,
        user_id: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.send(endpoints::add_membership(club_name, user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::encode_test_token;
    use serde_json::{json, Value};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:8080/").unwrap()
    }

    #[test]
    fn test_new_client_is_signed_out() {
        let client = client();
        assert!(!client.is_signed_in());
        assert_eq!(client.user_id_from_token(), None);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_no_authorization_header_when_signed_out() {
        let request = client().build_request(&endpoints::get_club("chess")).unwrap();
        assert!(request.headers().get(header::AUTHORIZATION).is_none());
        assert_eq!(request.url().as_str(), "http://localhost:8080/clubs/chess");
    }

    #[test]
    fn test_dot_segment_names_are_rejected() {
        let client = client();
        for name in [".", ".."] {
            let err = client.build_request(&endpoints::get_club(name)).unwrap_err();
            assert!(matches!(err, ApiError::InvalidPath(ref s) if s == name));
            let err = client.build_request(&endpoints::delete_user(name)).unwrap_err();
            assert!(matches!(err, ApiError::InvalidPath(_)));
        }
        let request = client.build_request(&endpoints::get_club("...")).unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8080/clubs/...");
    }

    #[test]
    fn test_raw_token_is_sent_as_authorization() {
        let token = encode_test_token(r#"{"id":3}"#);
        let client = client().with_token(token.clone());
        for request in [
            endpoints::get_user("alice"),
            endpoints::search_clubs("chess"),
            endpoints::delete_memberships("chess", Some("3")),
        ] {
            let built = client.build_request(&request).unwrap();
            assert_eq!(
                built.headers().get(header::AUTHORIZATION).unwrap(),
                token.as_str()
            );
        }
    }

    #[test]
    fn test_auth_scheme_prefixes_token() {
        let config = Config {
            auth_scheme: Some("Bearer".into()),
            ..Config::default()
        };
        let client = ApiClient::from_config(&config).unwrap().with_token("abc".into());
        let built = client.build_request(&endpoints::get_user("alice")).unwrap();
        assert_eq!(built.headers().get(header::AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_token_that_is_not_a_header_value_is_an_error() {
        let client = client().with_token("bad\ntoken".into());
        assert!(matches!(
            client.build_request(&endpoints::get_user("alice")),
            Err(ApiError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let update = UserUpdate {
            full_name: None,
            email: Some("a@b.com".into()),
        };
        let built = client()
            .build_request(&endpoints::update_user("alice", &update).unwrap())
            .unwrap();
        assert_eq!(built.method(), &reqwest::Method::PUT);
        assert_eq!(
            built.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = built.body().and_then(|b| b.as_bytes()).unwrap();
        let body: Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(body, json!({"email": "a@b.com"}));
    }

    #[test]
    fn test_bodiless_request_has_no_content_type() {
        let built = client()
            .build_request(&endpoints::get_memberships("chess-club", None))
            .unwrap();
        assert!(built.headers().get(header::CONTENT_TYPE).is_none());
        assert!(built.body().is_none());
        assert_eq!(built.url().query(), None);
    }

    #[test]
    fn test_query_is_appended_to_url() {
        let built = client()
            .build_request(&endpoints::get_memberships("chess-club", Some("u1")))
            .unwrap();
        assert_eq!(
            built.url().as_str(),
            "http://localhost:8080/memberships/chess-club?user_id=u1"
        );
    }

    #[test]
    fn test_identity_from_token() {
        let mut client = client();
        client.set_token(encode_test_token(r#"{"id":42,"exp":1543800000}"#));
        assert!(client.is_signed_in());
        assert_eq!(client.user_id_from_token().as_deref(), Some("42"));
        assert_eq!(
            client.token_claims().and_then(|c| c.expires_at()).map(|d| d.timestamp()),
            Some(1_543_800_000)
        );
        assert_eq!(client.username(), None);

        client.sign_out();
        assert!(!client.is_signed_in());
        assert_eq!(client.user_id_from_token(), None);
    }

    #[test]
    fn test_unparseable_token_has_no_identity() {
        let client = client().with_token("not.a-jwt".into());
        assert!(client.is_signed_in());
        assert_eq!(client.user_id_from_token(), None);
    }

    #[test]
    fn test_clones_own_their_session() {
        let original = client();
        let mut copy = original.clone();
        copy.set_token("abc".into());
        assert!(copy.is_signed_in());
        assert!(!original.is_signed_in());
    }
}
