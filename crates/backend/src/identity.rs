//! Identity provider port.
//!
//! The provider owns credentials and session tokens; the dashboard only ever
//! sees an opaque session carrying the authenticated principal. Session
//! transitions pushed by the provider (login/logout/token refresh in another
//! window) arrive through a channel-backed subscription that the session
//! module owns and closes on teardown.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use glowdesk_auth::Principal;
use glowdesk_core::PrincipalId;

use crate::BackendError;

/// An authenticated session as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub principal: Principal,
    pub access_token: Option<String>,
}

impl ProviderSession {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            access_token: None,
        }
    }
}

/// Session transition pushed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(ProviderSession),
    SignedOut,
}

/// Cancellable stream of [`AuthEvent`]s.
///
/// Dropping (or explicitly closing) the stream unsubscribes; the provider
/// side detects the closed channel and discards the sender.
pub struct AuthEvents {
    rx: mpsc::UnboundedReceiver<AuthEvent>,
}

impl AuthEvents {
    pub fn new(rx: mpsc::UnboundedReceiver<AuthEvent>) -> Self {
        Self { rx }
    }

    /// Next pushed event; `None` once the subscription is closed.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        self.rx.recv().await
    }

    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Port over the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Read the currently persisted session, if any.
    async fn current_session(&self) -> Result<Option<ProviderSession>, BackendError>;

    /// Subscribe to asynchronous session transitions.
    fn subscribe(&self) -> AuthEvents;

    async fn sign_in(&self, email: &str, password: &str)
    -> Result<ProviderSession, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;
}

/// How the in-memory provider answers `current_session` (test/dev knob).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionFetch {
    /// Answer immediately.
    #[default]
    Respond,
    /// Fail with `Unavailable`.
    Fail,
    /// Never settle (simulates a hung provider; callers race a timeout).
    Hang,
}

/// In-memory identity provider for tests and local development.
pub struct InMemoryIdentityProvider {
    session: RwLock<Option<ProviderSession>>,
    users: RwLock<HashMap<String, (String, PrincipalId)>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<AuthEvent>>>,
    fetch: RwLock<SessionFetch>,
    fail_sign_out: RwLock<bool>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
            users: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(Vec::new()),
            fetch: RwLock::new(SessionFetch::Respond),
            fail_sign_out: RwLock::new(false),
        }
    }

    /// Register a credentials pair and return the principal it signs in as.
    pub fn register_user(&self, email: &str, password: &str) -> PrincipalId {
        let id = PrincipalId::new();
        if let Ok(mut users) = self.users.write() {
            users.insert(email.to_string(), (password.to_string(), id));
        }
        id
    }

    /// Seed the persisted session directly (as if a prior login survived).
    pub fn set_session(&self, session: ProviderSession) {
        if let Ok(mut slot) = self.session.write() {
            *slot = Some(session);
        }
    }

    pub fn clear_session(&self) {
        if let Ok(mut slot) = self.session.write() {
            *slot = None;
        }
    }

    pub fn set_fetch_behavior(&self, fetch: SessionFetch) {
        if let Ok(mut slot) = self.fetch.write() {
            *slot = fetch;
        }
    }

    pub fn set_fail_sign_out(&self, fail: bool) {
        if let Ok(mut slot) = self.fail_sign_out.write() {
            *slot = fail;
        }
    }

    /// Push an auth event to all live subscribers (simulates another tab).
    pub fn emit(&self, event: AuthEvent) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn current_session(&self) -> Result<Option<ProviderSession>, BackendError> {
        let fetch = self
            .fetch
            .read()
            .map(|f| *f)
            .unwrap_or(SessionFetch::Respond);
        match fetch {
            SessionFetch::Respond => {}
            SessionFetch::Fail => {
                return Err(BackendError::Unavailable("session fetch failed".into()));
            }
            SessionFetch::Hang => loop {
                // Park forever; the caller's timeout is the only way out.
                tokio::time::sleep(Duration::from_secs(3600)).await;
            },
        }
        Ok(self.session.read().ok().and_then(|s| s.clone()))
    }

    fn subscribe(&self) -> AuthEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        AuthEvents::new(rx)
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, BackendError> {
        let id = {
            let users = self
                .users
                .read()
                .map_err(|_| BackendError::Unavailable("user table unavailable".into()))?;
            match users.get(email) {
                Some((stored, id)) if stored == password => *id,
                _ => {
                    return Err(BackendError::Unavailable("invalid credentials".into()));
                }
            }
        };

        let session = ProviderSession::new(Principal::new(id, Some(email.to_string())));
        self.set_session(session.clone());
        self.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.fail_sign_out.read().map(|f| *f).unwrap_or(false) {
            return Err(BackendError::Unavailable("sign-out rejected".into()));
        }
        self.clear_session();
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }
}
