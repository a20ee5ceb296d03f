use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::ApiError;

/// A fully read HTTP response.
///
/// The client hands back every response whatever its status; callers
/// branch on `status()` or opt into `error_for_status()`.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(ApiError::Decode)
    }

    /// Turn a non-2xx response into the matching `ApiError`
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, &self.text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_json_decodes_body() {
        let response = ApiResponse::new(StatusCode::OK, br#"{"token":"abc"}"#.to_vec());
        let value: Value = response.json().unwrap();
        assert_eq!(value["token"], "abc");
    }

    #[test]
    fn test_json_on_empty_body_is_decode_error() {
        let response = ApiResponse::new(StatusCode::NO_CONTENT, Vec::new());
        assert!(matches!(response.json::<Value>(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_error_for_status() {
        let ok = ApiResponse::new(StatusCode::CREATED, Vec::new());
        assert!(ok.error_for_status().is_ok());

        let missing = ApiResponse::new(StatusCode::NOT_FOUND, b"No such club".to_vec());
        match missing.error_for_status() {
            Err(ApiError::NotFound(body)) => assert_eq!(body, "No such club"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
