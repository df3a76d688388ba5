//! Super-admin console: platform metrics and the tenant directory.
//!
//! Reached only through the view router's operator gate; every query here is
//! deliberately unscoped by tenant.

pub mod console;
pub mod tenants;

pub use console::{ConsoleScreen, PlatformOverview};
pub use tenants::{NewTenant, TenantDirectory, TenantSummary};
