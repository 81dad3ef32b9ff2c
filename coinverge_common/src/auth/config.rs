//! Auth service connection settings.
use chrono::Duration;

use crate::error::CoinvergeError;
use crate::result::Result;

/// Environment variable holding the auth service URL.
pub const URL_ENV: &str = "COINVERGE_AUTH_URL";
/// Environment variable holding the public (anon) API key.
pub const KEY_ENV: &str = "COINVERGE_AUTH_KEY";
/// Lifetime of a freshly issued access token.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Settings for an `AuthProvider`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Base URL of the auth service.
    pub url: String,
    /// Public API key sent with every request.
    pub anon_key: String,
    /// Refresh expired sessions instead of dropping them.
    pub auto_refresh_token: bool,
    /// Write sessions through the `SessionStore`.
    pub persist_session: bool,
    /// Lifetime of issued sessions.
    pub session_ttl: Duration,
    /// New accounts must confirm their email before signing in.
    pub require_email_confirmation: bool,
}

impl AuthConfig {
    /// Settings with defaults for everything but the URL and key.
    pub fn new(url: &str, anon_key: &str) -> Result<Self> {
        let url = url.trim();
        let anon_key = anon_key.trim();
        if url.is_empty() {
            return Err(CoinvergeError::Config(String::from("auth url is required.")));
        }
        if anon_key.is_empty() {
            return Err(CoinvergeError::Config(String::from("auth anon key is required.")));
        }
        Ok(AuthConfig {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
            auto_refresh_token: true,
            persist_session: true,
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            require_email_confirmation: false,
        })
    }

    /// Read `COINVERGE_AUTH_URL` and `COINVERGE_AUTH_KEY` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; missing variables are treated as empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(URL_ENV).unwrap_or_default();
        let key = lookup(KEY_ENV).unwrap_or_default();
        Self::new(&url, &key)
    }

    /// Key the session is persisted under, e.g. `sb-abcd-auth-token` for
    /// `https://abcd.supabase.co`.
    pub fn storage_key(&self) -> String {
        let host = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        let host = host.split(['/', ':']).next().unwrap_or(host);
        let project = host.split('.').next().unwrap_or(host);
        format!("sb-{}-auth-token", project)
    }
}
