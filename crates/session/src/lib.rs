//! `glowdesk-session` — the tenant/auth resolution core.
//!
//! Converts raw identity-provider events into a role-bearing session without
//! ever hanging the UI: every external wait is bounded by a fixed timeout,
//! and failures degrade through a documented fallback ladder (secondary-key
//! lookup → email-derived role → persisted-token recovery) before the
//! machine is allowed to park in its single terminal error state.

pub mod recovery;
pub mod state;
pub mod store;

pub use recovery::recover_principal_from_storage;
pub use state::{ResolutionPath, SessionState};
pub use store::{SessionConfig, SessionError, SessionStore, DEFAULT_QUERY_TIMEOUT};
