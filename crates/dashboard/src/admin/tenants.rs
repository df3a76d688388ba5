//! Tenant directory: list, search, provision, impersonate.

use std::sync::Arc;

use serde_json::{json, Value};

use glowdesk_backend::{DataStore, Query, RpcSurface};
use glowdesk_core::TenantId;
use glowdesk_tenant::ImpersonationController;

use crate::screens::{expect_success, opt_text, text, ScreenError};

#[derive(Debug, Clone, PartialEq)]
pub struct TenantSummary {
    pub id: String,
    pub name: String,
    pub salon_name: String,
    pub owner_name: Option<String>,
    pub created_at: String,
}

/// Provisioning payload for a new salon plus its owner account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    pub salon_name: String,
    pub owner_name: String,
    pub owner_email: String,
    pub owner_password: String,
}

pub struct TenantDirectory {
    store: Arc<dyn DataStore>,
    rpc: Arc<dyn RpcSurface>,
    impersonation: Arc<ImpersonationController>,
}

impl TenantDirectory {
    pub fn new(
        store: Arc<dyn DataStore>,
        rpc: Arc<dyn RpcSurface>,
        impersonation: Arc<ImpersonationController>,
    ) -> Self {
        Self {
            store,
            rpc,
            impersonation,
        }
    }

    /// Newest-first tenant list, optionally filtered by a case-insensitive
    /// search over name and salon name.
    pub async fn list(&self, search: &str) -> Result<Vec<TenantSummary>, ScreenError> {
        let rows = self
            .store
            .select("tenants", Query::new().order_desc("created_at"))
            .await?;
        let needle = search.trim().to_lowercase();
        Ok(rows
            .iter()
            .map(parse_summary)
            .filter(|t| {
                needle.is_empty()
                    || t.name.to_lowercase().contains(&needle)
                    || t.salon_name.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Provision a tenant and its owner login in one backend transaction.
    pub async fn create(&self, tenant: NewTenant) -> Result<(), ScreenError> {
        if tenant.salon_name.trim().is_empty() {
            return Err(ScreenError::Invalid("salon name is required".into()));
        }
        if tenant.owner_email.trim().is_empty() || tenant.owner_password.len() < 6 {
            return Err(ScreenError::Invalid(
                "owner email and a password of at least 6 characters are required".into(),
            ));
        }
        let reply = self
            .rpc
            .call(
                "rpc_create_tenant_and_owner",
                json!({
                    "p_salon_name": tenant.salon_name.trim(),
                    "p_owner_name": tenant.owner_name.trim(),
                    "p_owner_email": tenant.owner_email.trim(),
                    "p_owner_password": tenant.owner_password,
                }),
            )
            .await?;
        expect_success(reply, "tenant creation")
    }

    /// Persist the impersonation flag for `tenant_id`. The caller must follow
    /// with a full application reload to re-scope every screen.
    pub fn impersonate(&self, tenant_id: TenantId, tenant_name: Option<&str>) {
        self.impersonation.enter(tenant_id, tenant_name);
    }
}

fn parse_summary(row: &Value) -> TenantSummary {
    TenantSummary {
        id: text(row, "id"),
        name: text(row, "name"),
        salon_name: text(row, "salon_name"),
        owner_name: opt_text(row, "owner_name"),
        created_at: text(row, "created_at"),
    }
}
