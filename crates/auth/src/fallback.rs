use crate::Role;

/// Designated platform-operator email used by the fallback policy.
pub const DEFAULT_SUPER_ADMIN_EMAIL: &str = "super@glowdesk.app";

/// Email-derived role policy applied when the authoritative profile lookup
/// is unavailable (both keyed lookups failed or timed out).
///
/// The designated operator address maps to `SuperAdmin`; every other
/// non-empty address maps to `Owner`. This is a deliberate
/// graceful-degradation policy, not an authorization source: the backend
/// still enforces row-level access on every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    super_admin_email: String,
}

impl FallbackPolicy {
    pub fn new(super_admin_email: impl Into<String>) -> Self {
        Self {
            super_admin_email: super_admin_email.into(),
        }
    }

    pub fn role_for_email(&self, email: &str) -> Role {
        if email == self.super_admin_email {
            Role::SuperAdmin
        } else {
            Role::Owner
        }
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SUPER_ADMIN_EMAIL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn designated_email_maps_to_super_admin() {
        let policy = FallbackPolicy::default();
        assert_eq!(
            policy.role_for_email(DEFAULT_SUPER_ADMIN_EMAIL),
            Role::SuperAdmin
        );
    }

    #[test]
    fn any_other_email_maps_to_owner() {
        let policy = FallbackPolicy::default();
        assert_eq!(policy.role_for_email("salon@curls.example"), Role::Owner);
    }

    #[test]
    fn policy_email_is_configurable() {
        let policy = FallbackPolicy::new("ops@example.test");
        assert_eq!(policy.role_for_email("ops@example.test"), Role::SuperAdmin);
        assert_eq!(
            policy.role_for_email(DEFAULT_SUPER_ADMIN_EMAIL),
            Role::Owner
        );
    }
}
