//! Error types shared across the workspace.
//!
//! The `CoinvergeError` enum unifies the failure cases of the trade reducer,
//! the authentication collaborator, and the command-line front end, allowing
//! crates to propagate a single error type. The quote calculator itself never
//! produces one of these: bad numeric input becomes zero there.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the library and the CLI.
#[derive(Error, Debug)]
pub enum CoinvergeError {
    /// I/O error originating from the standard library (price files, stdin).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A symbol outside the supported asset set was requested.
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// Percentage shortcut outside the closed set {25, 50, 75, 100}.
    #[error("Unsupported percentage: {0}")]
    UnknownPercentage(String),

    /// Swap requested with an empty, unparseable, or non-positive amount.
    #[error("Please enter a valid amount")]
    InvalidSwapAmount,

    /// An action that does not fit the current swap phase.
    #[error("Invalid transition: {action} while {phase}")]
    InvalidTransition {
        /// Name of the rejected action.
        action: String,
        /// Phase the swap form was in.
        phase: String,
    },

    /// A sign-in/sign-up/reset form failed validation; carries the user-facing message.
    #[error("{0}")]
    InvalidForm(String),

    /// Email/password pair did not match a registered user.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Sign-up for an email that is already registered.
    #[error("User already registered: {0}")]
    UserAlreadyExists(String),

    /// Sign-in for an account whose email has not been confirmed yet.
    #[error("Email not confirmed: {0}")]
    EmailNotConfirmed(String),

    /// The session refers to a user the auth service no longer knows.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// An operation needed a session and none was present.
    #[error("Auth session missing")]
    SessionMissing,

    /// Missing or malformed configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for CoinvergeError {
    fn from(err: PoisonError<T>) -> Self {
        CoinvergeError::MutexLock(err.to_string())
    }
}
