//! `glowdesk-auth` — pure authentication/authorization vocabulary.
//!
//! This crate is intentionally decoupled from IO: it defines who a caller is
//! (principal), what the backend says about them (profile), which role they
//! hold, and the email-based fallback policy applied when the authoritative
//! profile lookup is unavailable. Resolution machinery lives in
//! `glowdesk-session`.

pub mod fallback;
pub mod principal;
pub mod profile;
pub mod roles;

pub use fallback::{FallbackPolicy, DEFAULT_SUPER_ADMIN_EMAIL};
pub use principal::Principal;
pub use profile::Profile;
pub use roles::{AuthError, Role, RoleGrant, TenantRole};
