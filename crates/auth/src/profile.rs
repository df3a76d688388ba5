use serde::{Deserialize, Serialize};
use serde_json::Value;

use glowdesk_core::{PrincipalId, ProfileId, TenantId};

use crate::{AuthError, Principal, Role, RoleGrant};

/// Backend record binding a principal to a role and (usually) a tenant.
///
/// Read-only on the client: rows are created server-side when a tenant or a
/// staff login is provisioned. Depending on schema version the identifying
/// column is `id` or `user_id`; both are kept so the session layer can match
/// a profile against the principal that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: Option<PrincipalId>,
    pub tenant_id: Option<TenantId>,
    pub role: Role,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl Profile {
    /// Parse a `profiles` row as returned by the tabular store.
    ///
    /// `id` and `role` are required; everything else is tolerated as absent
    /// (older rows predate several columns).
    pub fn from_record(record: &Value) -> Result<Self, AuthError> {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::MalformedProfile("missing id".into()))?
            .parse::<ProfileId>()
            .map_err(|e| AuthError::MalformedProfile(e.to_string()))?;

        let role = record
            .get("role")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::MalformedProfile("missing role".into()))?
            .parse::<Role>()?;

        let user_id = match record.get("user_id").and_then(Value::as_str) {
            Some(s) => Some(
                s.parse::<PrincipalId>()
                    .map_err(|e| AuthError::MalformedProfile(e.to_string()))?,
            ),
            None => None,
        };

        let tenant_id = match record.get("tenant_id").and_then(Value::as_str) {
            Some(s) => Some(
                s.parse::<TenantId>()
                    .map_err(|e| AuthError::MalformedProfile(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            id,
            user_id,
            tenant_id,
            role,
            email: record
                .get("email")
                .and_then(Value::as_str)
                .map(str::to_string),
            full_name: record
                .get("full_name")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Synthesize a profile from the email fallback policy.
    ///
    /// Carries no tenant binding; tenant resolution then falls through to the
    /// statically configured fallback, if any.
    pub fn from_fallback(principal: &Principal, role: Role) -> Self {
        Self {
            id: ProfileId::from_uuid(*principal.id.as_uuid()),
            user_id: Some(principal.id),
            tenant_id: None,
            role,
            email: principal.email.clone(),
            full_name: None,
        }
    }

    /// The principal this profile is bound to.
    ///
    /// Schema v1 keyed profiles by the auth user id itself; v2 added a
    /// dedicated `user_id` column. Prefer the explicit column when present.
    pub fn bound_principal(&self) -> PrincipalId {
        self.user_id
            .unwrap_or_else(|| PrincipalId::from_uuid(*self.id.as_uuid()))
    }

    /// Role plus tenant binding, checked by the type system.
    pub fn grant(&self) -> Result<RoleGrant, AuthError> {
        RoleGrant::new(self.role, self.tenant_id)
    }
}
