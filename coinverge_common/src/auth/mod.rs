//! Authentication collaborator consumed by the application shell.
//!
//! The hosted auth service is modelled as the `AuthProvider` trait:
//! - `config` — connection settings read from the environment.
//! - `session` — `Session` and `User` records plus credentials.
//! - `storage` — the key/value adapter sessions are persisted through.
//! - `provider` — the trait itself, auth events and subscription handles.
//! - `memory` — an in-process provider standing in for the hosted service.
//! - `forms` — validation of the sign-in, sign-up and reset forms.
pub mod config;
pub mod forms;
pub mod memory;
pub mod provider;
pub mod session;
pub mod storage;

pub use config::AuthConfig;
pub use memory::InMemoryAuthProvider;
pub use provider::{AuthEvent, AuthProvider, AuthSubscription, SignUpOutcome};
pub use session::{Credentials, Session, User};
pub use storage::{MemoryStore, SessionStore};
