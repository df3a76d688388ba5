//! Session state machine vocabulary.

use glowdesk_auth::{Principal, Profile, Role};
use glowdesk_core::TenantId;

/// How a `Ready` session obtained its profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResolutionPath {
    /// `profiles` row found by primary key.
    PrimaryKey,
    /// `profiles` row found by the `user_id` column.
    SecondaryKey,
    /// Role derived from the email fallback policy.
    EmailFallback,
}

/// Client-side projection of the authentication state.
///
/// Transitions:
/// `Loading → {Resolving | LoggedOut}`;
/// `Resolving → {Ready | TimedOut}`;
/// `Ready → {Ready (same principal) | Resolving (different principal) |
/// LoggedOut}`. `TimedOut` is terminal until a forced logout.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Bootstrap in progress; nothing known yet.
    Loading,
    /// No authenticated principal.
    LoggedOut,
    /// Principal known; profile resolution in flight.
    Resolving { principal: Principal },
    /// Fully resolved session.
    Ready {
        principal: Principal,
        profile: Profile,
        path: ResolutionPath,
    },
    /// Profile resolution exhausted with no applicable fallback.
    TimedOut,
}

impl SessionState {
    /// True while the UI should show a spinner rather than content.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading | SessionState::Resolving { .. })
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, SessionState::TimedOut)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready { .. })
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            SessionState::Resolving { principal } => Some(principal),
            SessionState::Ready { principal, .. } => Some(principal),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            SessionState::Ready { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.profile().map(|p| p.role)
    }

    /// Tenant binding carried by the resolved profile, if any.
    pub fn profile_tenant(&self) -> Option<TenantId> {
        self.profile().and_then(|p| p.tenant_id)
    }
}
