//! Top-level application shell.
//!
//! The shell owns the auth provider and the single auth-state subscription,
//! keeps the current session in sync with it, and decides which screen group
//! the user may see. Screens ask the shell; they never subscribe themselves.
use std::sync::{Arc, Mutex};

use log::{error, info, warn};
use serde::Serialize;

use crate::auth::provider::{AuthProvider, AuthSubscription};
use crate::auth::session::Session;
use crate::result::Result;

/// Screen group to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    /// Sign-in/sign-up screens.
    Login,
    /// Dashboard and the tabs behind it.
    Dashboard,
}

/// Outcome of guarding a protected screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Access {
    /// The shell has not finished loading the session.
    Loading,
    /// The screen may be shown.
    Granted,
    /// A session is required.
    SignInRequired,
    /// The user must confirm their email first.
    VerificationRequired,
}

/// Application shell over an `AuthProvider`.
pub struct AppShell<P: AuthProvider> {
    provider: Arc<P>,
    session: Arc<Mutex<Option<Session>>>,
    subscription: Option<AuthSubscription>,
    started: bool,
}

impl<P: AuthProvider> AppShell<P> {
    /// Shell over `provider`; call [`AppShell::start`] before routing.
    pub fn new(provider: Arc<P>) -> Self {
        AppShell {
            provider,
            session: Arc::new(Mutex::new(None)),
            subscription: None,
            started: false,
        }
    }

    /// The provider, for screens that sign in or out.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Load the stored session and start listening for auth changes.
    ///
    /// A stored session whose user the service no longer accepts is signed
    /// out. Calling `start` twice is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }

        if self.provider.get_session()?.is_some() {
            if let Err(e) = self.provider.get_user() {
                warn!("Stored session rejected ({}), signing out", e);
                self.provider.sign_out()?;
            }
        }

        let slot = Arc::clone(&self.session);
        let subscription = self.provider.on_auth_state_change(Box::new(move |event, session| {
            match slot.lock() {
                Ok(mut slot) => *slot = session.cloned(),
                Err(e) => error!("Dropping {} event: {}", event, e),
            }
        }))?;
        self.subscription = Some(subscription);
        self.started = true;
        info!("App shell started ({:?})", self.route()?);
        Ok(())
    }

    /// Session as last reported by the provider.
    pub fn session(&self) -> Result<Option<Session>> {
        Ok(self.session.lock()?.clone())
    }

    /// Screen group for the current session.
    pub fn route(&self) -> Result<Route> {
        Ok(match self.session()? {
            Some(_) => Route::Dashboard,
            None => Route::Login,
        })
    }

    /// Decide whether a protected screen may be shown.
    pub fn guard(&self, require_auth: bool, require_verification: bool) -> Result<Access> {
        if !self.started {
            return Ok(Access::Loading);
        }
        let session = self.session()?;
        if require_auth && session.is_none() {
            return Ok(Access::SignInRequired);
        }
        if require_verification && session.as_ref().is_some_and(|s| !s.user.is_verified()) {
            return Ok(Access::VerificationRequired);
        }
        Ok(Access::Granted)
    }

    /// Stop listening for auth changes.
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.started = false;
    }
}

impl<P: AuthProvider> Drop for AppShell<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
