//! `glowdesk-tenant` — tenant scoping for every data fetch.
//!
//! Exactly one tenant id governs what the dashboard shows at any moment.
//! This crate owns the strict precedence that produces it (impersonation
//! override → profile binding → static fallback → none), the impersonation
//! flag behind that override, and the tenant's branding record.

pub mod branding;
pub mod impersonation;
pub mod resolver;

pub use branding::{BrandingService, BrandingUpdate, TenantBranding, TenantError};
pub use impersonation::{
    clear_impersonation, ImpersonationController, ImpersonationFlag, IMPERSONATE_ACTIVE_KEY,
    IMPERSONATE_NAME_KEY, IMPERSONATE_TENANT_KEY,
};
pub use resolver::{resolve, TenantSelection};
