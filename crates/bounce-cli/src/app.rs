//! Command-line session handling.
//!
//! `App` owns the `ApiClient` together with the persisted session, the
//! config file and the keychain, so every `bounce` invocation picks up
//! the sign-in of the previous one.

use anyhow::{bail, Context, Result};
use bounce_core::api::ApiResponse;
use bounce_core::auth::{CredentialStore, Session, SessionStore};
use bounce_core::{ApiClient, Config};
use tracing::{debug, info, warn};

use crate::messages::{self, Action};

pub struct App {
    pub api: ApiClient,
    pub config: Config,
    session_store: SessionStore,
    credentials: CredentialStore,
}

impl App {
    /// Load config and any saved session. `api_url` beats both the config
    /// file and `BOUNCE_API_URL`.
    pub fn new(api_url: Option<String>) -> Result<Self> {
        let mut config = Config::load().context("Failed to load config")?;
        config.apply_env();
        if let Some(url) = api_url {
            config.base_url = url;
        }
        debug!(base_url = %config.base_url, "Using Bounce API");

        let mut api = ApiClient::from_config(&config)?;
        let session_store = SessionStore::new(Config::cache_dir()?);

        match session_store.load() {
            Ok(Some(data)) => api.set_session(Session::from(data)),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable saved session"),
        }

        Ok(Self {
            api,
            config,
            session_store,
            credentials: CredentialStore::default(),
        })
    }

    pub fn require_sign_in(&self) -> Result<()> {
        if !self.api.is_signed_in() {
            bail!(messages::NOT_SIGNED_IN);
        }
        Ok(())
    }

    /// The user id to scope membership calls to: an explicit one, or the
    /// signed-in user's when `mine` is set.
    pub fn resolve_user_id(&self, user_id: Option<String>, mine: bool) -> Result<Option<String>> {
        if user_id.is_some() || !mine {
            return Ok(user_id);
        }
        self.require_sign_in()?;
        match self.api.user_id_from_token() {
            Some(id) => Ok(Some(id)),
            None => bail!("Could not read your user id from the saved token"),
        }
    }

    pub async fn login(&mut self, username: Option<String>, remember: bool) -> Result<()> {
        let username = match username.or_else(|| self.config.last_username.clone()) {
            Some(username) => username,
            None => bail!("No username given and none remembered"),
        };

        let password = match self.credentials.password(&username) {
            Ok(Some(password)) if !remember => password,
            Ok(_) => Self::prompt_password()?,
            Err(e) => {
                warn!(error = %e, "Keychain unavailable");
                Self::prompt_password()?
            }
        };

        eprintln!("Authenticating...");
        let response = self.api.authenticate(&username, &password).await?;
        if !response.is_success() {
            bail!(messages::describe_failure(Action::SignIn, response.status()));
        }
        if !self.api.is_signed_in() {
            bail!(messages::SIGNIN_ERROR);
        }

        if remember {
            if let Err(e) = self.credentials.remember(&username, &password) {
                warn!(error = %e, "Failed to store credentials");
            }
        }

        self.config.last_username = Some(username.clone());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
        self.save_session();

        info!(username = %username, "Login successful");
        println!("Signed in as {}", username);
        Ok(())
    }

    pub fn logout(&mut self, forget: bool) -> Result<()> {
        let username = self.api.username().map(str::to_string);
        self.api.sign_out();
        self.session_store.clear()?;

        if forget {
            if let Some(ref username) = username.or_else(|| self.config.last_username.clone()) {
                self.credentials.forget(username)?;
            }
        }
        println!("Signed out");
        Ok(())
    }

    pub fn whoami(&self) -> Result<()> {
        self.require_sign_in()?;
        let username = self.api.username().unwrap_or("(unknown user)");
        match self.api.user_id_from_token() {
            Some(id) => println!("{} (user id {})", username, id),
            None => println!("{} (user id unknown)", username),
        }
        if let Some(expires) = self.api.token_claims().and_then(|c| c.expires_at()) {
            println!("Token expires {}", expires.format("%b %d, %Y %H:%M UTC"));
        }
        Ok(())
    }

    fn save_session(&self) {
        if let Some(data) = self.api.session().to_data() {
            if let Err(e) = self.session_store.save(&data) {
                warn!(error = %e, "Failed to save session");
            }
        }
    }

    fn prompt_password() -> Result<String> {
        let password = rpassword::prompt_password("Password: ")?;
        Ok(password)
    }

    /// Prompt for a new password twice
    pub fn prompt_new_password() -> Result<String> {
        let password = rpassword::prompt_password("New password: ")?;
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if password != confirm {
            bail!("Passwords do not match");
        }
        Ok(password)
    }
}

/// Fail with the message for `action` unless the response is 2xx
pub fn expect_success(response: ApiResponse, action: Action) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        debug!(status = response.status().as_u16(), body = %response.text(), "API call failed");
        bail!(messages::describe_failure(action, response.status()))
    }
}
