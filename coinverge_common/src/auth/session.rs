//! Session and user records returned by the auth service.
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

const TOKEN_LEN: usize = 40;

/// Email/password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Plain-text password as entered.
    pub password: String,
}

impl Credentials {
    /// Credentials with the email trimmed and lower-cased.
    pub fn new(email: &str, password: &str) -> Self {
        Credentials {
            email: normalize_email(email),
            password: password.to_string(),
        }
    }
}

/// Canonical form of an email used as the account key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Account of a signed-up user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier.
    pub id: String,
    /// Account email.
    pub email: String,
    /// When the email was confirmed; `None` while verification is pending.
    pub email_confirmed_at: Option<DateTime<Utc>>,
    /// Sign-up time.
    pub created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(email: &str, confirmed: bool, now: DateTime<Utc>) -> Self {
        let id: u128 = rand::rng().random();
        User {
            id: format!("{:032x}", id),
            email: normalize_email(email),
            email_confirmed_at: confirmed.then_some(now),
            created_at: now,
        }
    }

    /// Whether the email address has been confirmed.
    pub fn is_verified(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    /// Upper-cased first letter of the email, shown as the avatar.
    pub fn initial(&self) -> char {
        self.email
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('N')
    }
}

/// Signed-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for API calls.
    pub access_token: String,
    /// Token exchanged for a new session once this one expires.
    pub refresh_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Instant after which `access_token` is no longer accepted.
    pub expires_at: DateTime<Utc>,
    /// Owner of the session.
    pub user: User,
}

impl Session {
    pub(crate) fn issue(user: User, now: DateTime<Utc>, ttl: Duration) -> Self {
        Session {
            access_token: random_token(),
            refresh_token: random_token(),
            token_type: String::from("bearer"),
            expires_at: now + ttl,
            user,
        }
    }

    /// Whether the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Same user, fresh tokens.
    pub(crate) fn refreshed(&self, now: DateTime<Utc>, ttl: Duration) -> Self {
        Session::issue(self.user.clone(), now, ttl)
    }
}

fn random_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
