//! In-process `AuthProvider`.
//!
//! Keeps the user directory in memory and persists the current session as JSON
//! through a `SessionStore`, the way the hosted client does with the platform
//! storage. Stands in for the hosted service wherever there is none to talk to.
use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use log::{debug, info, warn};

use crate::auth::config::AuthConfig;
use crate::auth::provider::{AuthCallback, AuthEvent, AuthListeners, AuthProvider, AuthSubscription, SignUpOutcome};
use crate::auth::session::{Credentials, Session, User, normalize_email};
use crate::auth::storage::SessionStore;
use crate::error::CoinvergeError;
use crate::result::Result;

struct Account {
    user: User,
    password: String,
}

/// Auth service stand-in with an in-memory user directory.
pub struct InMemoryAuthProvider {
    config: AuthConfig,
    store: Box<dyn SessionStore>,
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<Session>>,
    listeners: AuthListeners,
}

impl InMemoryAuthProvider {
    /// Provider using `config`, persisting sessions into `store`.
    pub fn new(config: AuthConfig, store: Box<dyn SessionStore>) -> Self {
        InMemoryAuthProvider {
            config,
            store,
            accounts: Mutex::new(HashMap::new()),
            current: Mutex::new(None),
            listeners: AuthListeners::new(),
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Mark `email` as confirmed, as following the verification link would.
    pub fn confirm_email(&self, email: &str) -> Result<User> {
        let key = normalize_email(email);
        let mut accounts = self.accounts.lock()?;
        let account = accounts
            .get_mut(&key)
            .ok_or_else(|| CoinvergeError::UserNotFound(key.clone()))?;
        account.user.email_confirmed_at.get_or_insert_with(Utc::now);
        Ok(account.user.clone())
    }

    /// Remove an account; existing sessions for it stop validating.
    pub fn delete_user(&self, email: &str) -> Result<()> {
        let key = normalize_email(email);
        self.accounts
            .lock()?
            .remove(&key)
            .map(|_| ())
            .ok_or(CoinvergeError::UserNotFound(key))
    }

    /// Number of attached auth listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn persist(&self, session: &Session) -> Result<()> {
        if self.config.persist_session {
            let json = serde_json::to_string(session)?;
            self.store.set_item(&self.config.storage_key(), &json)?;
        }
        Ok(())
    }

    fn forget(&self) -> Result<()> {
        *self.current.lock()? = None;
        self.store.remove_item(&self.config.storage_key())
    }

    fn load_stored(&self) -> Result<Option<Session>> {
        if !self.config.persist_session {
            return Ok(None);
        }
        let Some(json) = self.store.get_item(&self.config.storage_key())? else {
            return Ok(None);
        };
        match serde_json::from_str::<Session>(&json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Discarding unreadable stored session: {}", e);
                self.store.remove_item(&self.config.storage_key())?;
                Ok(None)
            }
        }
    }

    fn start_session(&self, user: User) -> Result<Session> {
        let session = Session::issue(user, Utc::now(), self.config.session_ttl);
        self.persist(&session)?;
        *self.current.lock()? = Some(session.clone());
        self.listeners.emit(AuthEvent::SignedIn, Some(&session))?;
        Ok(session)
    }
}

impl AuthProvider for InMemoryAuthProvider {
    fn get_session(&self) -> Result<Option<Session>> {
        let cached = self.current.lock()?.clone();
        let session = match cached {
            Some(session) => session,
            None => match self.load_stored()? {
                Some(session) => session,
                None => return Ok(None),
            },
        };

        let now = Utc::now();
        if !session.is_expired_at(now) {
            *self.current.lock()? = Some(session.clone());
            return Ok(Some(session));
        }

        if !self.config.auto_refresh_token {
            info!("Session for {} expired", session.user.email);
            self.forget()?;
            return Ok(None);
        }

        let refreshed = session.refreshed(now, self.config.session_ttl);
        self.persist(&refreshed)?;
        *self.current.lock()? = Some(refreshed.clone());
        debug!("Session for {} refreshed", refreshed.user.email);
        self.listeners.emit(AuthEvent::TokenRefreshed, Some(&refreshed))?;
        Ok(Some(refreshed))
    }

    fn get_user(&self) -> Result<User> {
        let session = self.get_session()?.ok_or(CoinvergeError::SessionMissing)?;
        let accounts = self.accounts.lock()?;
        accounts
            .get(&session.user.email)
            .filter(|account| account.user.id == session.user.id)
            .map(|account| account.user.clone())
            .ok_or(CoinvergeError::UserNotFound(session.user.email))
    }

    fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        let email = normalize_email(&credentials.email);
        let user = {
            let accounts = self.accounts.lock()?;
            let account = accounts
                .get(&email)
                .filter(|account| account.password == credentials.password)
                .ok_or(CoinvergeError::InvalidCredentials)?;
            if self.config.require_email_confirmation && !account.user.is_verified() {
                return Err(CoinvergeError::EmailNotConfirmed(email));
            }
            account.user.clone()
        };
        info!("User {} signed in", user.email);
        self.start_session(user)
    }

    fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome> {
        let email = normalize_email(&credentials.email);
        let confirmed = !self.config.require_email_confirmation;
        let user = {
            let mut accounts = self.accounts.lock()?;
            if accounts.contains_key(&email) {
                return Err(CoinvergeError::UserAlreadyExists(email));
            }
            let user = User::new(&email, confirmed, Utc::now());
            accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    password: credentials.password.clone(),
                },
            );
            user
        };
        info!("User {} signed up", user.email);

        let session = if confirmed {
            Some(self.start_session(user.clone())?)
        } else {
            None
        };
        Ok(SignUpOutcome { user, session })
    }

    fn sign_out(&self) -> Result<()> {
        let had_session = self.current.lock()?.is_some();
        self.forget()?;
        if had_session {
            info!("User signed out");
        }
        self.listeners.emit(AuthEvent::SignedOut, None)
    }

    fn reset_password_for_email(&self, email: &str) -> Result<()> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(CoinvergeError::InvalidForm(String::from(
                "Please enter your email address",
            )));
        }
        // Unknown addresses succeed as well, so the form cannot probe accounts.
        if self.accounts.lock()?.contains_key(&email) {
            info!("Password reset link issued for {}", email);
        }
        Ok(())
    }

    fn on_auth_state_change(&self, callback: AuthCallback) -> Result<AuthSubscription> {
        let (subscription, callback) = self.listeners.subscribe(callback)?;
        let session = self.get_session()?;
        callback.call(AuthEvent::InitialSession, session.as_ref());
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStore;
    use chrono::Duration;
    use std::sync::Arc;

    fn config() -> AuthConfig {
        AuthConfig::new("https://demo.supabase.co", "anon").unwrap()
    }

    fn provider(config: AuthConfig) -> InMemoryAuthProvider {
        InMemoryAuthProvider::new(config, Box::new(MemoryStore::new()))
    }

    fn recorder(provider: &InMemoryAuthProvider) -> (Arc<Mutex<Vec<AuthEvent>>>, AuthSubscription) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let sub = provider
            .on_auth_state_change(Box::new(move |event, _| sink.lock().unwrap().push(event)))
            .unwrap();
        (events, sub)
    }

    #[test]
    fn sign_up_sign_out_sign_in() {
        let auth = provider(config());
        let (events, _sub) = recorder(&auth);
        let creds = Credentials::new("Alice@example.com", "secret1");

        let outcome = auth.sign_up(&creds).unwrap();
        assert!(outcome.session.is_some());
        assert_eq!(auth.get_user().unwrap().email, "alice@example.com");

        auth.sign_out().unwrap();
        assert_eq!(auth.get_session().unwrap(), None);
        assert!(matches!(auth.get_user(), Err(CoinvergeError::SessionMissing)));

        let session = auth.sign_in_with_password(&creds).unwrap();
        assert_eq!(session.user, outcome.user);

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                AuthEvent::InitialSession,
                AuthEvent::SignedIn,
                AuthEvent::SignedOut,
                AuthEvent::SignedIn
            ]
        );
    }

    #[test]
    fn wrong_password_and_duplicate_sign_up_fail() {
        let auth = provider(config());
        auth.sign_up(&Credentials::new("bob@example.com", "secret1")).unwrap();
        assert!(matches!(
            auth.sign_in_with_password(&Credentials::new("bob@example.com", "nope")),
            Err(CoinvergeError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.sign_in_with_password(&Credentials::new("who@example.com", "secret1")),
            Err(CoinvergeError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.sign_up(&Credentials::new("BOB@example.com", "other12")),
            Err(CoinvergeError::UserAlreadyExists(_))
        ));
    }

    #[test]
    fn confirmation_required_defers_session() {
        let auth = provider(AuthConfig {
            require_email_confirmation: true,
            ..config()
        });
        let creds = Credentials::new("carol@example.com", "secret1");
        let outcome = auth.sign_up(&creds).unwrap();
        assert!(outcome.session.is_none());
        assert!(!outcome.user.is_verified());
        assert!(matches!(
            auth.sign_in_with_password(&creds),
            Err(CoinvergeError::EmailNotConfirmed(_))
        ));

        assert!(auth.confirm_email("carol@example.com").unwrap().is_verified());
        assert!(auth.sign_in_with_password(&creds).is_ok());
    }

    #[test]
    fn session_survives_provider_restart_through_store() {
        let store = Arc::new(MemoryStore::new());

        struct Shared(Arc<MemoryStore>);
        impl SessionStore for Shared {
            fn get_item(&self, key: &str) -> Result<Option<String>> {
                self.0.get_item(key)
            }
            fn set_item(&self, key: &str, value: &str) -> Result<()> {
                self.0.set_item(key, value)
            }
            fn remove_item(&self, key: &str) -> Result<()> {
                self.0.remove_item(key)
            }
        }

        let first = InMemoryAuthProvider::new(config(), Box::new(Shared(Arc::clone(&store))));
        let session = first
            .sign_up(&Credentials::new("dave@example.com", "secret1"))
            .unwrap()
            .session
            .unwrap();
        assert!(store.get_item("sb-demo-auth-token").unwrap().is_some());

        let second = InMemoryAuthProvider::new(config(), Box::new(Shared(Arc::clone(&store))));
        assert_eq!(second.get_session().unwrap(), Some(session));
        // The second instance never saw the account.
        assert!(matches!(second.get_user(), Err(CoinvergeError::UserNotFound(_))));
    }

    #[test]
    fn expired_session_is_refreshed() {
        let auth = provider(AuthConfig {
            session_ttl: Duration::zero(),
            ..config()
        });
        let original = auth
            .sign_up(&Credentials::new("erin@example.com", "secret1"))
            .unwrap()
            .session
            .unwrap();
        let (events, _sub) = recorder(&auth);

        let refreshed = auth.get_session().unwrap().unwrap();
        assert_ne!(refreshed.access_token, original.access_token);
        assert_eq!(refreshed.user, original.user);
        let events = events.lock().unwrap();
        assert_eq!(events[0], AuthEvent::TokenRefreshed);
        assert!(events.contains(&AuthEvent::InitialSession));
    }

    #[test]
    fn expired_session_is_dropped_without_auto_refresh() {
        let auth = provider(AuthConfig {
            session_ttl: Duration::zero(),
            auto_refresh_token: false,
            ..config()
        });
        auth.sign_up(&Credentials::new("frank@example.com", "secret1")).unwrap();
        assert_eq!(auth.get_session().unwrap(), None);
    }

    #[test]
    fn unsubscribed_listener_gets_nothing() {
        let auth = provider(config());
        let (events, sub) = recorder(&auth);
        assert_eq!(auth.listener_count(), 1);
        sub.unsubscribe();
        assert_eq!(auth.listener_count(), 0);
        auth.sign_up(&Credentials::new("gina@example.com", "secret1")).unwrap();
        assert_eq!(*events.lock().unwrap(), vec![AuthEvent::InitialSession]);
    }

    #[test]
    fn reset_password_requires_email() {
        let auth = provider(config());
        assert!(auth.reset_password_for_email("nobody@example.com").is_ok());
        let err = auth.reset_password_for_email("   ").unwrap_err();
        assert_eq!(err.to_string(), "Please enter your email address");
    }

    #[test]
    fn deleted_user_no_longer_validates() {
        let auth = provider(config());
        auth.sign_up(&Credentials::new("hank@example.com", "secret1")).unwrap();
        auth.delete_user("hank@example.com").unwrap();
        assert!(matches!(auth.get_user(), Err(CoinvergeError::UserNotFound(_))));
    }
}
