//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `CoinvergeError`, so functions can simply
//! return `Result<T>`.
use crate::error::CoinvergeError;

/// Workspace-wide `Result` alias with `CoinvergeError` as the default error.
pub type Result<T, E = CoinvergeError> = std::result::Result<T, E>;
