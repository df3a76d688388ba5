//! Super-admin impersonation flag.
//!
//! Lets a platform operator assume an arbitrary tenant's dashboard view
//! without holding that tenant's credentials. The flag is durable across
//! reloads and cleared either by the explicit exit action or together with
//! the session on logout, never silently.

use std::sync::Arc;

use glowdesk_backend::KeyValueStorage;
use glowdesk_core::TenantId;

/// Storage key holding the impersonated tenant's id.
pub const IMPERSONATE_TENANT_KEY: &str = "glowdesk_impersonate_tenant";
/// Storage key holding the impersonated tenant's display name.
pub const IMPERSONATE_NAME_KEY: &str = "glowdesk_impersonate_name";
/// Storage key holding the `"true"` marker while impersonation is active.
pub const IMPERSONATE_ACTIVE_KEY: &str = "glowdesk_impersonate_active";

/// The persisted impersonation override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpersonationFlag {
    pub tenant_id: TenantId,
    pub tenant_name: Option<String>,
}

/// Remove all three impersonation keys.
///
/// Shared by [`ImpersonationController::exit`] and the forced-logout path so
/// no stale flag can survive into a fresh login.
pub fn clear_impersonation(storage: &dyn KeyValueStorage) {
    storage.remove(IMPERSONATE_TENANT_KEY);
    storage.remove(IMPERSONATE_NAME_KEY);
    storage.remove(IMPERSONATE_ACTIVE_KEY);
}

/// Reads and writes the impersonation flag.
///
/// Entering or exiting only mutates storage; the caller must follow with a
/// full application-state reload so every tenant-scoped component re-resolves
/// under the new tenant id.
pub struct ImpersonationController {
    storage: Arc<dyn KeyValueStorage>,
}

impl ImpersonationController {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The active flag, if a well-formed one is persisted.
    pub fn current(&self) -> Option<ImpersonationFlag> {
        if self.storage.get(IMPERSONATE_ACTIVE_KEY).as_deref() != Some("true") {
            return None;
        }
        let raw = self.storage.get(IMPERSONATE_TENANT_KEY)?;
        let tenant_id = match raw.parse::<TenantId>() {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!("discarding malformed impersonation flag: {err}");
                clear_impersonation(&*self.storage);
                return None;
            }
        };
        Some(ImpersonationFlag {
            tenant_id,
            tenant_name: self.storage.get(IMPERSONATE_NAME_KEY),
        })
    }

    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    pub fn enter(&self, tenant_id: TenantId, tenant_name: Option<&str>) {
        tracing::info!(%tenant_id, "entering tenant impersonation");
        self.storage
            .set(IMPERSONATE_TENANT_KEY, &tenant_id.to_string());
        self.storage.set(IMPERSONATE_ACTIVE_KEY, "true");
        if let Some(name) = tenant_name {
            self.storage.set(IMPERSONATE_NAME_KEY, name);
        }
    }

    pub fn exit(&self) {
        tracing::info!("exiting tenant impersonation");
        clear_impersonation(&*self.storage);
    }
}
