use serde::{Deserialize, Serialize};

use glowdesk_core::PrincipalId;

/// Identity of an authenticated principal as issued by the identity provider.
///
/// A principal is independent of any business role; binding it to a role and
/// tenant is the profile's job. The email is carried because the fallback
/// role policy needs it when the profile store is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: Option<String>,
}

impl Principal {
    pub fn new(id: PrincipalId, email: impl Into<Option<String>>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}
