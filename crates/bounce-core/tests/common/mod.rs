use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{json, Value};

/// One request as seen by the stub backend
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct StubState {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// A Bounce backend stand-in listening on an ephemeral port
pub struct StubBackend {
    pub base_url: String,
    state: StubState,
}

pub const PASSWORD: &str = "Correct-Horse-1";

pub fn token_for(id: u64) -> String {
    format!(
        "{}.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"id":{},"exp":1900000000}}"#, id))
    )
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = StubState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("Stub backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub backend failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("No request reached the stub backend")
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.clone(),
    });

    match (method.as_str(), uri.path()) {
        ("POST", "/auth/login") => login(body),
        ("GET", "/users/alice") => (
            StatusCode::OK,
            Json(json!({
                "id": 3,
                "full_name": "Alice Liddell",
                "username": "alice",
                "email": "alice@example.com",
                "bio": "",
                "created_at": 1541200000,
            })),
        )
            .into_response(),
        ("POST", "/users") => StatusCode::CREATED.into_response(),
        ("PUT", "/users/alice") => (StatusCode::OK, Json(json!({}))).into_response(),
        ("POST", "/clubs") => (
            StatusCode::CONFLICT,
            Json(json!({"error": "Club already exists"})),
        )
            .into_response(),
        ("GET", "/clubs/search") => (
            StatusCode::OK,
            Json(json!({
                "results": [{"name": "chess-club", "description": "We play chess"}],
                "result_count": 1,
                "page": 0,
                "total_pages": 1,
            })),
        )
            .into_response(),
        ("GET", "/clubs/chess-club") => (
            StatusCode::OK,
            Json(json!({
                "id": 1,
                "name": "chess-club",
                "description": "We play chess",
                "website_url": "chess.example",
                "facebook_url": "",
                "instagram_url": "",
                "twitter_url": "",
                "created_at": 1541200000,
            })),
        )
            .into_response(),
        ("GET", "/memberships/chess-club") => (
            StatusCode::OK,
            Json(json!([{
                "user_id": 3,
                "full_name": "Alice Liddell",
                "username": "alice",
                "created_at": 1541200000,
            }])),
        )
            .into_response(),
        ("DELETE", _) => StatusCode::NO_CONTENT.into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response(),
    }
}

fn login(body: Option<Value>) -> Response {
    let body = body.unwrap_or(Value::Null);
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (username, password) {
        ("alice", PASSWORD) => (StatusCode::OK, Json(json!({"token": token_for(3)}))).into_response(),
        ("tokenless", PASSWORD) => (StatusCode::OK, Json(json!({}))).into_response(),
        ("broken", _) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response(),
    }
}
