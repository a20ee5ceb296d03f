use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token is not made of three dot-separated segments")]
    Malformed,

    #[error("Token payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Token payload is not a JSON object: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Claims carried in the payload of a Bounce access token.
///
/// The signature is not verified; only the server can do that.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub id: Option<Value>,
    /// Expiry as a unix timestamp in seconds. Kept as raw JSON so an
    /// unusual `exp` never hides the `id` claim.
    #[serde(default)]
    pub exp: Option<Value>,
}

impl TokenClaims {
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut segments = token.split('.');
        let payload = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(_header), Some(payload), Some(_signature), None) => payload,
            _ => return Err(TokenError::Malformed),
        };

        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        let value: Value = serde_json::from_slice(&bytes)?;
        if !value.is_object() {
            return Err(TokenError::Malformed);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The `id` claim as a string. Numeric ids are rendered in decimal.
    pub fn user_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// `exp` as a UTC datetime. Fractional seconds are truncated; a
    /// non-numeric `exp` gives `None`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.exp.as_ref()?;
        let secs = match exp.as_i64() {
            Some(secs) => secs,
            // float casts saturate, out-of-range values fail below
            None => exp.as_f64()?.trunc() as i64,
        };
        DateTime::from_timestamp(secs, 0)
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &str) -> String {
    format!(
        "{}.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    )
}
