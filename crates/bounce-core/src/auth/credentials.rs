use anyhow::{Context, Result};
use keyring::Entry;

/// Keychain service name used when none is given
const DEFAULT_SERVICE: &str = "bounce";

/// Remembered passwords, kept in the OS keychain under one service name
pub struct CredentialStore {
    service: String,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl CredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, username: &str) -> Result<Entry> {
        Entry::new(&self.service, username).context("Failed to create keyring entry")
    }

    /// Remember the password for a username
    pub fn remember(&self, username: &str, password: &str) -> Result<()> {
        self.entry(username)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// The remembered password, or `None` if nothing is stored
    pub fn password(&self, username: &str) -> Result<Option<String>> {
        match self.entry(username)?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve password from keychain"),
        }
    }

    /// Forget a remembered password. Forgetting an unknown user is not an error.
    pub fn forget(&self, username: &str) -> Result<()> {
        match self.entry(username)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete credential from keychain"),
        }
    }
}
