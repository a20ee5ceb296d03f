use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TokenClaims;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Sign-in state of one `ApiClient`.
///
/// Holding a token means signed in. There is no expiry handling: the
/// session only changes on `sign_in` and `sign_out`.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    username: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("username", &self.username)
            .finish()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A signed-in session for a token obtained elsewhere
    pub fn with_token(token: String) -> Self {
        Self {
            token: Some(token),
            username: None,
        }
    }

    pub fn sign_in(&mut self, token: String, username: Option<String>) {
        self.token = Some(token);
        self.username = username;
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.username = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Decoded token payload, `None` when signed out or undecodable
    pub fn claims(&self) -> Option<TokenClaims> {
        TokenClaims::decode(self.token.as_deref()?).ok()
    }

    /// The `id` claim of the held token
    pub fn user_id(&self) -> Option<String> {
        self.claims()?.user_id()
    }

    /// Snapshot for persistence; `None` when signed out
    pub fn to_data(&self) -> Option<SessionData> {
        Some(SessionData {
            token: self.token.clone()?,
            username: self.username.clone(),
            created_at: Utc::now(),
        })
    }
}

impl From<SessionData> for Session {
    fn from(data: SessionData) -> Self {
        Self {
            token: Some(data.token),
            username: data.username,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Keeps a session on disk between runs
pub struct SessionStore {
    cache_dir: PathBuf,
}

impl SessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Load session from disk
    pub fn load(&self) -> Result<Option<SessionData>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .context("Failed to read session file")?;
        let data: SessionData = serde_json::from_str(&contents)
            .context("Failed to parse session file")?;
        Ok(Some(data))
    }

    /// Save session to disk
    pub fn save(&self, data: &SessionData) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        let mut file = open_private(&path)
            .with_context(|| format!("Failed to open session file {}", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write session file {}", path.display()))?;
        Ok(())
    }

    /// Remove the saved session
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

/// Open a file for writing that only the current user can read. The
/// session token is a bearer credential.
#[cfg(unix)]
fn open_private(path: &std::path::Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &std::path::Path) -> std::io::Result<std::fs::File> {
    OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::encode_test_token;

    #[test]
    fn test_new_session_is_signed_out() {
        let session = Session::new();
        assert!(!session.is_signed_in());
        assert_eq!(session.token(), None);
        assert_eq!(session.user_id(), None);
        assert!(session.to_data().is_none());
    }

    #[test]
    fn test_sign_in_and_out() {
        let mut session = Session::new();
        session.sign_in(encode_test_token(r#"{"id":7}"#), Some("alice".into()));
        assert!(session.is_signed_in());
        assert_eq!(session.username(), Some("alice"));
        assert_eq!(session.user_id().as_deref(), Some("7"));

        session.sign_out();
        assert!(!session.is_signed_in());
        assert_eq!(session.username(), None);
    }

    #[test]
    fn test_unparseable_token_is_signed_in_without_identity() {
        let session = Session::with_token("garbage".into());
        assert!(session.is_signed_in());
        assert_eq!(session.user_id(), None);
        assert!(session.claims().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::with_token("super-secret".into());
        assert!(!format!("{:?}", session).contains("super-secret"));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("bounce"));
        assert!(store.load().unwrap().is_none());

        let mut session = Session::new();
        session.sign_in("tok".into(), Some("alice".into()));
        store.save(&session.to_data().unwrap()).unwrap();

        let restored = Session::from(store.load().unwrap().unwrap());
        assert_eq!(restored, session);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_session_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        // a file left readable by an older version is tightened on save
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::new(dir.path().to_path_buf());
        let mut session = Session::new();
        session.sign_in("tok".into(), None);
        store.save(&session.to_data().unwrap()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(Session::from(store.load().unwrap().unwrap()), session);
    }

    #[test]
    fn test_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        assert!(store.load().is_err());
    }
}
