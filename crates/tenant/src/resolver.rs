//! Tenant precedence.

use glowdesk_core::TenantId;

use crate::ImpersonationFlag;

/// Which source produced the active tenant id.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TenantSelection {
    /// Super-admin impersonation override.
    Impersonated(TenantId),
    /// Binding carried by the resolved profile.
    FromProfile(TenantId),
    /// Statically configured development fallback.
    StaticFallback(TenantId),
    /// No tenant resolvable; dependent screens fetch nothing.
    Unresolved,
}

impl TenantSelection {
    pub fn tenant_id(&self) -> Option<TenantId> {
        match self {
            TenantSelection::Impersonated(id)
            | TenantSelection::FromProfile(id)
            | TenantSelection::StaticFallback(id) => Some(*id),
            TenantSelection::Unresolved => None,
        }
    }

    pub fn is_impersonated(&self) -> bool {
        matches!(self, TenantSelection::Impersonated(_))
    }
}

/// Produce the single tenant id governing all tenant-scoped fetches.
///
/// Strict total order: impersonation flag, then profile binding, then static
/// fallback, then none. Callers re-evaluate on every input change; nothing
/// here is cached.
pub fn resolve(
    impersonation: Option<&ImpersonationFlag>,
    profile_tenant: Option<TenantId>,
    static_fallback: Option<TenantId>,
) -> TenantSelection {
    if let Some(flag) = impersonation {
        return TenantSelection::Impersonated(flag.tenant_id);
    }
    if let Some(tenant_id) = profile_tenant {
        return TenantSelection::FromProfile(tenant_id);
    }
    if let Some(tenant_id) = static_fallback {
        return TenantSelection::StaticFallback(tenant_id);
    }
    TenantSelection::Unresolved
}
