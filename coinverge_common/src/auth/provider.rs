//! The auth service interface and its event subscriptions.
//!
//! Listeners are plain callbacks registered with
//! [`AuthProvider::on_auth_state_change`]. Each registration returns an
//! [`AuthSubscription`]; calling [`AuthSubscription::unsubscribe`] detaches
//! exactly that callback. Callbacks run synchronously on the thread that
//! caused the event, after the provider has released its own locks, so a
//! callback may call back into the provider.
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use log::{debug, warn};
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::auth::session::{Credentials, Session, User};
use crate::result::Result;

/// Change in authentication state.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    /// Delivered once to every new listener with the session at that moment.
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    PasswordRecovery,
}

/// Callback invoked for every auth event.
pub type AuthCallback = Box<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;

type SharedCallback = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;
type ListenerTable = Mutex<BTreeMap<u64, SharedCallback>>;

/// Result of a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    /// The created account.
    pub user: User,
    /// Present when the account may sign in right away; `None` while email
    /// verification is pending.
    pub session: Option<Session>,
}

/// Hosted authentication service.
pub trait AuthProvider: Send + Sync {
    /// Current session, loading it from storage and refreshing it as needed.
    fn get_session(&self) -> Result<Option<Session>>;

    /// The signed-in user, checked against the service.
    fn get_user(&self) -> Result<User>;

    /// Sign in with email and password.
    fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session>;

    /// Create an account.
    fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome>;

    /// Drop the current session. Succeeds when nobody is signed in.
    fn sign_out(&self) -> Result<()>;

    /// Send a password reset link to `email`.
    fn reset_password_for_email(&self, email: &str) -> Result<()>;

    /// Register `callback` for auth events until the returned handle is unsubscribed.
    fn on_auth_state_change(&self, callback: AuthCallback) -> Result<AuthSubscription>;
}

/// Registry of auth listeners shared by provider implementations.
#[derive(Default)]
pub struct AuthListeners {
    next_id: AtomicU64,
    table: Arc<ListenerTable>,
}

impl AuthListeners {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `callback`, returning its handle together with a shared reference
    /// the caller may use for an immediate `INITIAL_SESSION` delivery.
    pub fn subscribe(&self, callback: AuthCallback) -> Result<(AuthSubscription, SharedCallbackRef)> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: SharedCallback = Arc::from(callback);
        self.table.lock()?.insert(id, Arc::clone(&callback));
        debug!("Auth listener {} subscribed", id);
        Ok((
            AuthSubscription {
                id,
                table: Arc::downgrade(&self.table),
            },
            SharedCallbackRef(callback),
        ))
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn emit(&self, event: AuthEvent, session: Option<&Session>) -> Result<()> {
        let listeners: Vec<SharedCallback> = self.table.lock()?.values().cloned().collect();
        debug!("Emitting {} to {} listener(s)", event, listeners.len());
        for listener in listeners {
            listener(event, session);
        }
        Ok(())
    }

    /// Number of attached listeners.
    pub fn len(&self) -> usize {
        self.table.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// Whether no listener is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared handle to a freshly registered callback.
pub struct SharedCallbackRef(SharedCallback);

impl SharedCallbackRef {
    /// Invoke the callback directly.
    pub fn call(&self, event: AuthEvent, session: Option<&Session>) {
        (self.0)(event, session)
    }
}

/// Handle to one registered auth listener.
#[derive(Debug)]
pub struct AuthSubscription {
    id: u64,
    table: Weak<ListenerTable>,
}

impl AuthSubscription {
    /// Detach the listener. A no-op once the provider is gone.
    pub fn unsubscribe(self) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        match table.lock() {
            Ok(mut table) => {
                table.remove(&self.id);
                debug!("Auth listener {} unsubscribed", self.id);
            }
            Err(e) => warn!("Failed to unsubscribe auth listener {}: {}", self.id, e),
        }
    }

    /// Whether the listener is still attached.
    pub fn is_active(&self) -> bool {
        self.table
            .upgrade()
            .and_then(|table| table.lock().ok().map(|t| t.contains_key(&self.id)))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, AuthCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        (
            count,
            Box::new(move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn event_names_match_service() {
        assert_eq!(AuthEvent::SignedIn.to_string(), "SIGNED_IN");
        assert_eq!(AuthEvent::InitialSession.to_string(), "INITIAL_SESSION");
        assert_eq!("TOKEN_REFRESHED".parse::<AuthEvent>().unwrap(), AuthEvent::TokenRefreshed);
    }

    #[test]
    fn unsubscribe_detaches_only_that_listener() {
        let listeners = AuthListeners::new();
        let (first_count, first) = counter();
        let (second_count, second) = counter();
        let (first_sub, _) = listeners.subscribe(first).unwrap();
        let (second_sub, _) = listeners.subscribe(second).unwrap();

        listeners.emit(AuthEvent::SignedOut, None).unwrap();
        first_sub.unsubscribe();
        listeners.emit(AuthEvent::SignedOut, None).unwrap();

        assert_eq!(first_count.load(Ordering::SeqCst), 1);
        assert_eq!(second_count.load(Ordering::SeqCst), 2);
        assert!(second_sub.is_active());
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn subscription_outliving_registry_is_inert() {
        let listeners = AuthListeners::new();
        let (_, callback) = counter();
        let (sub, _) = listeners.subscribe(callback).unwrap();
        drop(listeners);
        assert!(!sub.is_active());
        sub.unsubscribe();
    }
}
