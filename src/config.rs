//! Digest configuration

use crate::error::{Error, Result};
use crate::source::SearchFilter;
use std::env;
use std::path::PathBuf;

/// Read-only mailbox access
pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

pub const SENDER_VAR: &str = "EMAIL_DIGEST_SENDER";
pub const CREDENTIALS_VAR: &str = "EMAIL_DIGEST_CREDENTIALS";
pub const TOKEN_VAR: &str = "EMAIL_DIGEST_TOKEN";

/// Which threads to digest and where the credential collaborator keeps its files.
///
/// Only `sender` is read by this crate. `scopes`, `credentials_file` and
/// `token_file` are handed as-is to whatever builds the authenticated
/// [`MailSource`](crate::MailSource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestConfig {
    /// Only threads from this address are fetched
    pub sender: String,
    /// OAuth scopes to request when acquiring a token
    pub scopes: Vec<String>,
    /// OAuth client secrets file
    pub credentials_file: PathBuf,
    /// Cached, refreshable token; rewritten by the credential code after refresh
    pub token_file: PathBuf,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            sender: "adonis@openmail.co.za".to_string(),
            scopes: vec![READONLY_SCOPE.to_string()],
            credentials_file: PathBuf::from("credentials.json"),
            token_file: PathBuf::from("token.json"),
        }
    }
}

impl DigestConfig {
    /// Defaults overridden by any `EMAIL_DIGEST_*` variables that are set,
    /// after loading `.env` from the working directory if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Some(sender) = var(SENDER_VAR)? {
            config.sender = sender;
        }
        if let Some(path) = var(CREDENTIALS_VAR)? {
            config.credentials_file = PathBuf::from(path);
        }
        if let Some(path) = var(TOKEN_VAR)? {
            config.token_file = PathBuf::from(path);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn search_filter(&self) -> Result<SearchFilter> {
        SearchFilter::from_sender(&self.sender)
    }
}

fn var(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => {
            Err(Error::Config(format!("{name} is set but empty")))
        }
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(Error::Config(format!("{name} is not valid unicode")))
        }
    }
}
