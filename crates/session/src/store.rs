//! Session store: the resolver state machine.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use glowdesk_auth::{FallbackPolicy, Principal, Profile};
use glowdesk_backend::{
    AuthEvent, BackendError, DataStore, IdentityProvider, KeyValueStorage, Query,
};
use glowdesk_tenant::clear_impersonation;

use crate::recovery::recover_principal_from_storage;
use crate::state::{ResolutionPath, SessionState};

/// Wall-clock budget for every awaited provider/store call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default namespace prefix of the provider's persisted storage keys.
const DEFAULT_TOKEN_PREFIX: &str = "gd-";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Budget applied independently to each awaited external call.
    pub query_timeout: Duration,
    pub fallback: FallbackPolicy,
    /// Provider storage namespace (persisted token keys start with this).
    pub token_prefix: String,
    /// Further substrings whose keys the destructive purge removes.
    pub purge_markers: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            fallback: FallbackPolicy::default(),
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            purge_markers: vec!["glowdesk".to_string()],
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] BackendError),

    #[error("sign-in timed out")]
    Timeout,
}

/// Converts identity-provider events into a role-bearing [`SessionState`].
///
/// Every state write is guarded by an epoch counter: forced logout and
/// reload bump the epoch, so an in-flight resolution that settles afterwards
/// cannot resurrect a cleared session. Abandoning the loser of a timeout
/// race means "stop waiting", never a transport-level cancel.
pub struct SessionStore {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DataStore>,
    storage: Arc<dyn KeyValueStorage>,
    config: SessionConfig,
    state: RwLock<SessionState>,
    epoch: AtomicU64,
    alive: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DataStore>,
        storage: Arc<dyn KeyValueStorage>,
        config: SessionConfig,
    ) -> Self {
        Self {
            identity,
            store,
            storage,
            config,
            state: RwLock::new(SessionState::Loading),
            epoch: AtomicU64::new(0),
            alive: AtomicBool::new(true),
            listener: Mutex::new(None),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or(SessionState::TimedOut)
    }

    /// Bootstrap: read any existing provider session, bounded by the query
    /// timeout. A clean "no session" answer lands on the login screen. A
    /// hung or failing provider instead falls back to recovering the
    /// principal from its persisted tokens; with no recovery either there is
    /// no user context at all, and the machine parks on the recoverable
    /// error screen rather than an infinite spinner.
    pub async fn initialize(&self) {
        let epoch = self.barrier_to(SessionState::Loading);
        match timeout(self.config.query_timeout, self.identity.current_session()).await {
            Ok(Ok(Some(session))) => {
                self.resolve_with_epoch(session.principal, epoch).await;
            }
            Ok(Ok(None)) => self.transition(epoch, SessionState::LoggedOut),
            Ok(Err(err)) => {
                tracing::warn!("session fetch failed: {err}");
                self.recover_or_time_out(epoch).await;
            }
            Err(_) => {
                tracing::warn!(
                    "session fetch timed out after {:?}",
                    self.config.query_timeout
                );
                self.recover_or_time_out(epoch).await;
            }
        }
    }

    /// Resolve the profile for `principal` through the fallback ladder.
    ///
    /// Idempotent per principal: when the store is already `Ready` for the
    /// same principal the call is a no-op, so a duplicate auth event never
    /// bounces the UI back to a spinner.
    pub async fn resolve_profile(&self, principal: Principal) {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.resolve_with_epoch(principal, epoch).await;
    }

    /// Handle one provider-pushed session transition.
    pub async fn handle_auth_event(&self, event: AuthEvent) {
        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        match event {
            AuthEvent::SignedIn(session) => {
                let epoch = self.epoch.load(Ordering::SeqCst);
                self.resolve_with_epoch(session.principal, epoch).await;
            }
            AuthEvent::SignedOut => {
                // Synchronous clear; no network round-trip.
                self.barrier_to(SessionState::LoggedOut);
            }
        }
    }

    /// Spawn the auth-change listener task. Replaces (and aborts) any
    /// previous listener; `shutdown` tears it down.
    pub fn spawn_listener(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let mut events = self.identity.subscribe();
        let handle = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if !this.alive.load(Ordering::SeqCst) {
                    break;
                }
                this.handle_auth_event(event).await;
            }
        });
        if let Ok(mut slot) = self.listener.lock() {
            if let Some(previous) = slot.replace(handle) {
                previous.abort();
            }
        }
    }

    /// Sign in with credentials and resolve the resulting principal.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let session = timeout(
            self.config.query_timeout,
            self.identity.sign_in(email, password),
        )
        .await
        .map_err(|_| SessionError::Timeout)??;
        self.resolve_profile(session.principal).await;
        Ok(())
    }

    /// Best-effort logout: clears the impersonation flag, asks the provider
    /// to sign out (failures and timeouts are swallowed), then resets the
    /// machine to `LoggedOut`. Always completes.
    pub async fn force_logout(&self) {
        clear_impersonation(&*self.storage);
        match timeout(self.config.query_timeout, self.identity.sign_out()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!("provider sign-out failed (ignored): {err}"),
            Err(_) => tracing::warn!("provider sign-out timed out (ignored)"),
        }
        self.barrier_to(SessionState::LoggedOut);
    }

    /// Destructive-but-safe recovery action: remove every provider-namespaced
    /// key from durable storage (stale tokens included).
    pub fn purge_provider_storage(&self) {
        for key in self.storage.keys() {
            let namespaced = key.starts_with(&self.config.token_prefix)
                || self
                    .config
                    .purge_markers
                    .iter()
                    .any(|marker| key.contains(marker.as_str()));
            if namespaced {
                tracing::debug!("purging storage key '{key}'");
                self.storage.remove(&key);
            }
        }
    }

    /// Tear down: stop accepting state writes and abort the listener.
    pub fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Ok(mut slot) = self.listener.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    async fn recover_or_time_out(&self, epoch: u64) {
        match recover_principal_from_storage(&*self.storage, &self.config.token_prefix) {
            Some(principal) => self.resolve_with_epoch(principal, epoch).await,
            None => self.transition(epoch, SessionState::TimedOut),
        }
    }

    async fn resolve_with_epoch(&self, principal: Principal, epoch: u64) {
        if let SessionState::Ready { profile, .. } = &self.state() {
            if profile.bound_principal() == principal.id {
                tracing::debug!("session already ready for this principal; no-op");
                return;
            }
        }

        self.transition(
            epoch,
            SessionState::Resolving {
                principal: principal.clone(),
            },
        );

        if let Some((profile, path)) = self.query_profile(&principal).await {
            tracing::info!(role = %profile.role, ?path, "profile resolved");
            self.transition(
                epoch,
                SessionState::Ready {
                    principal,
                    profile,
                    path,
                },
            );
            return;
        }

        // Both keyed lookups failed or timed out; fall back on the email.
        match principal.email().map(str::to_string) {
            Some(email) => {
                let role = self.config.fallback.role_for_email(&email);
                tracing::warn!(%role, "profile unavailable; applying email fallback role");
                let profile = Profile::from_fallback(&principal, role);
                self.transition(
                    epoch,
                    SessionState::Ready {
                        principal,
                        profile,
                        path: ResolutionPath::EmailFallback,
                    },
                );
            }
            None => {
                tracing::error!("profile unavailable and no email to fall back on");
                self.transition(epoch, SessionState::TimedOut);
            }
        }
    }

    /// Query `profiles` by primary key, then once more by the secondary
    /// `user_id` column. Each attempt has its own timeout budget.
    async fn query_profile(&self, principal: &Principal) -> Option<(Profile, ResolutionPath)> {
        let key = principal.id.to_string();
        let attempts = [
            ("id", ResolutionPath::PrimaryKey),
            ("user_id", ResolutionPath::SecondaryKey),
        ];
        for (column, path) in attempts {
            let query = Query::new().eq(column, key.clone());
            match timeout(
                self.config.query_timeout,
                self.store.select_one("profiles", query),
            )
            .await
            {
                Ok(Ok(Some(record))) => match Profile::from_record(&record) {
                    Ok(profile) => return Some((profile, path)),
                    Err(err) => {
                        tracing::warn!("profile row via '{column}' is malformed: {err}");
                    }
                },
                Ok(Ok(None)) => tracing::debug!("no profile row via '{column}'"),
                Ok(Err(err)) => tracing::warn!("profile lookup via '{column}' failed: {err}"),
                Err(_) => tracing::warn!(
                    "profile lookup via '{column}' timed out after {:?}",
                    self.config.query_timeout
                ),
            }
        }
        None
    }

    /// Write `state` if this task's epoch is still current. Stale writers
    /// (superseded by a logout or reload) are dropped silently.
    fn transition(&self, epoch: u64, state: SessionState) {
        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("dropping stale session transition");
            return;
        }
        if let Ok(mut slot) = self.state.write() {
            tracing::debug!(from = ?*slot, to = ?state, "session transition");
            *slot = state;
        }
    }

    /// Hard barrier: supersede all in-flight resolution and write `state`.
    fn barrier_to(&self, state: SessionState) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if self.alive.load(Ordering::SeqCst) {
            if let Ok(mut slot) = self.state.write() {
                *slot = state;
            }
        }
        epoch
    }
}
