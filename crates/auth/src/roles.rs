use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use glowdesk_core::TenantId;

/// Role held by an authenticated user.
///
/// This is a closed set: the backend writes one of these strings into the
/// `profiles.role` column and the client never invents new ones.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Manager,
    Staff,
    Receptionist,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Receptionist => "receptionist",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Owner/manager hold salon-administration rights.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Owner | Role::Manager)
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Every role except the platform operator acts within exactly one tenant.
    pub fn requires_tenant(&self) -> bool {
        !self.is_super_admin()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            "receptionist" => Ok(Role::Receptionist),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// Tenant-bound subset of [`Role`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantRole {
    Owner,
    Manager,
    Staff,
    Receptionist,
}

impl From<TenantRole> for Role {
    fn from(value: TenantRole) -> Self {
        match value {
            TenantRole::Owner => Role::Owner,
            TenantRole::Manager => Role::Manager,
            TenantRole::Staff => Role::Staff,
            TenantRole::Receptionist => Role::Receptionist,
        }
    }
}

/// A role together with its tenant binding.
///
/// Non-operator roles always carry the tenant they act within; the operator
/// role never does. Construct through [`RoleGrant::new`] so the binding rule
/// is checked in one place instead of by field-presence probing at use sites.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleGrant {
    Tenant { role: TenantRole, tenant_id: TenantId },
    SuperAdmin,
}

impl RoleGrant {
    pub fn new(role: Role, tenant_id: Option<TenantId>) -> Result<Self, AuthError> {
        let tenant_role = match role {
            Role::SuperAdmin => return Ok(RoleGrant::SuperAdmin),
            Role::Owner => TenantRole::Owner,
            Role::Manager => TenantRole::Manager,
            Role::Staff => TenantRole::Staff,
            Role::Receptionist => TenantRole::Receptionist,
        };
        match tenant_id {
            Some(tenant_id) => Ok(RoleGrant::Tenant {
                role: tenant_role,
                tenant_id,
            }),
            None => Err(AuthError::MissingTenantBinding(role)),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RoleGrant::Tenant { role, .. } => (*role).into(),
            RoleGrant::SuperAdmin => Role::SuperAdmin,
        }
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        match self {
            RoleGrant::Tenant { tenant_id, .. } => Some(*tenant_id),
            RoleGrant::SuperAdmin => None,
        }
    }
}

/// Errors from the pure auth vocabulary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("role '{0}' requires a tenant binding")]
    MissingTenantBinding(Role),

    #[error("profile record is malformed: {0}")]
    MalformedProfile(String),
}
