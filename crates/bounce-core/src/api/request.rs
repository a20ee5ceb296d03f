//! Transient request descriptors.
//!
//! An `ApiRequest` is built per call and turned into a `reqwest::Request`
//! by `ApiClient::build_request`. Query parameters are an ordered list so
//! the encoded query string is deterministic.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Serialize)?);
        Ok(self)
    }

    /// Append a query parameter. Parameters keep insertion order.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a query parameter only when a value is given
    pub fn query_opt(self, key: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// The path with the percent-encoded query string appended
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// The first `.` or `..` segment of a path, percent-encoded or not. URL
/// parsing collapses these, so a request using one would hit another resource.
pub(crate) fn dot_segment(path: &str) -> Option<&str> {
    path.split('/').find(|segment| {
        let decoded = urlencoding::decode(segment).unwrap_or_default();
        decoded == "." || decoded == ".."
    })
}

/// Join path segments into an absolute path, percent-encoding each one
/// so a name containing `/` or spaces stays a single segment.
pub fn resource_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|segment| format!("/{}", urlencoding::encode(segment)))
        .collect()
}
