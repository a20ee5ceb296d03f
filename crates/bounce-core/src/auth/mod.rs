//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `Session`: the token held by an `ApiClient`, and the signed-in username
//! - `TokenClaims`: read-only decoding of the token payload
//! - `SessionStore`: persistence of a session between process runs
//! - `CredentialStore`: Secure OS-level credential storage via keyring
//!
//! Tokens are never checked for expiry on the client; an expired token
//! shows up as a 401 from the API.

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::CredentialStore;
pub use session::{Session, SessionData, SessionStore};
pub use token::{TokenClaims, TokenError};
