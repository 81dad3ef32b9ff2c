//!
//! Core of the Coinverge trading demo, shared by the CLI and any front end.
//!
//! This crate aggregates:
//! - `error` — unified error type `CoinvergeError` used across the workspace.
//! - `result` — handy `Result<T, CoinvergeError>` alias.
//! - `assets` — supported asset symbols and the mock asset table.
//! - `calculator` — the quote calculator behind the buy/sell/swap read-outs.
//! - `order` — buy/sell order previews.
//! - `trade` — trading screen state and its pure reducer.
//! - `auth` — the authentication collaborator and an in-memory implementation.
//! - `shell` — the application shell owning the auth subscription.
#![warn(missing_docs)]
pub mod assets;
pub mod auth;
pub mod calculator;
pub mod error;
pub mod order;
pub mod result;
pub mod shell;
pub mod trade;

pub use assets::{Asset, AssetBook};
pub use error::CoinvergeError;
pub use result::Result;
pub use trade::{TradeAction, TradeState, reduce};
