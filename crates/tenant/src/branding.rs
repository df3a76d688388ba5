//! Tenant branding record.

use std::sync::{Arc, RwLock};

use serde_json::{json, Value};
use thiserror::Error;

use glowdesk_backend::{BackendError, DataStore, Query, RpcSurface};
use glowdesk_core::TenantId;

/// Branding shown in the dashboard chrome (sidebar, header, login).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantBranding {
    pub salon_name: String,
    pub salon_tagline: String,
    pub logo_url: Option<String>,
    pub owner_name: String,
}

impl Default for TenantBranding {
    fn default() -> Self {
        Self {
            salon_name: "My Salon".to_string(),
            salon_tagline: "Salon & Spa".to_string(),
            logo_url: None,
            owner_name: "Owner".to_string(),
        }
    }
}

/// Partial branding mutation; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandingUpdate {
    pub salon_name: Option<String>,
    pub salon_tagline: Option<String>,
    pub logo_url: Option<String>,
    pub owner_name: Option<String>,
}

impl BrandingUpdate {
    pub fn is_empty(&self) -> bool {
        self.salon_name.is_none()
            && self.salon_tagline.is_none()
            && self.logo_url.is_none()
            && self.owner_name.is_none()
    }
}

#[derive(Debug, Error)]
pub enum TenantError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The backend accepted the call but rejected the mutation.
    #[error("{0}")]
    Rejected(String),
}

/// Fetches and mutates the active tenant's branding.
///
/// Reads are forgiving: a missing row or a failed fetch leaves the built-in
/// defaults in place so the chrome always renders. Writes go through
/// `rpc_update_branding` with JSON-null sentinels for unchanged fields and
/// merge into local state only after the backend confirms success.
pub struct BrandingService {
    store: Arc<dyn DataStore>,
    rpc: Arc<dyn RpcSurface>,
    branding: RwLock<TenantBranding>,
}

impl BrandingService {
    pub fn new(store: Arc<dyn DataStore>, rpc: Arc<dyn RpcSurface>) -> Self {
        Self {
            store,
            rpc,
            branding: RwLock::new(TenantBranding::default()),
        }
    }

    pub fn current(&self) -> TenantBranding {
        self.branding
            .read()
            .map(|b| b.clone())
            .unwrap_or_default()
    }

    /// Drop back to defaults (used by full application reloads).
    pub fn reset(&self) {
        if let Ok(mut branding) = self.branding.write() {
            *branding = TenantBranding::default();
        }
    }

    pub async fn fetch(&self, tenant_id: TenantId) {
        let query = Query::new().eq("id", tenant_id.to_string());
        match self.store.select_one("tenants", query).await {
            Ok(Some(row)) => {
                let defaults = TenantBranding::default();
                let loaded = TenantBranding {
                    salon_name: row
                        .get("salon_name")
                        .and_then(Value::as_str)
                        .or_else(|| row.get("name").and_then(Value::as_str))
                        .unwrap_or(&defaults.salon_name)
                        .to_string(),
                    salon_tagline: row
                        .get("salon_tagline")
                        .and_then(Value::as_str)
                        .unwrap_or(&defaults.salon_tagline)
                        .to_string(),
                    logo_url: row
                        .get("logo_url")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    owner_name: row
                        .get("owner_name")
                        .and_then(Value::as_str)
                        .unwrap_or(&defaults.owner_name)
                        .to_string(),
                };
                if let Ok(mut branding) = self.branding.write() {
                    *branding = loaded;
                }
            }
            Ok(None) => {
                tracing::debug!(%tenant_id, "no tenant row; keeping default branding");
            }
            Err(err) => {
                tracing::warn!(%tenant_id, "branding fetch failed, keeping defaults: {err}");
            }
        }
    }

    pub async fn update(
        &self,
        tenant_id: TenantId,
        update: BrandingUpdate,
    ) -> Result<(), TenantError> {
        let params = json!({
            "p_tenant_id": tenant_id.to_string(),
            "p_salon_name": update.salon_name,
            "p_salon_tagline": update.salon_tagline,
            "p_logo_url": update.logo_url,
            "p_owner_name": update.owner_name,
        });

        let reply = self.rpc.call("rpc_update_branding", params).await?;
        if !reply.success() {
            return Err(TenantError::Rejected(
                reply.error().unwrap_or("branding update rejected").to_string(),
            ));
        }

        if let Ok(mut branding) = self.branding.write() {
            if let Some(salon_name) = update.salon_name {
                branding.salon_name = salon_name;
            }
            if let Some(salon_tagline) = update.salon_tagline {
                branding.salon_tagline = salon_tagline;
            }
            if let Some(logo_url) = update.logo_url {
                branding.logo_url = Some(logo_url);
            }
            if let Some(owner_name) = update.owner_name {
                branding.owner_name = owner_name;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowdesk_backend::{InMemoryDataStore, InMemoryRpcSurface, RpcReply};
    use serde_json::json;

    fn service() -> (Arc<InMemoryDataStore>, Arc<InMemoryRpcSurface>, BrandingService) {
        let store = Arc::new(InMemoryDataStore::new());
        let rpc = Arc::new(InMemoryRpcSurface::new());
        let service = BrandingService::new(store.clone(), rpc.clone());
        (store, rpc, service)
    }

    #[tokio::test]
    async fn missing_row_keeps_defaults() {
        let (_store, _rpc, service) = service();
        service.fetch(TenantId::new()).await;
        assert_eq!(service.current(), TenantBranding::default());
    }

    #[tokio::test]
    async fn fetch_falls_back_to_tenant_name() {
        let (store, _rpc, service) = service();
        let tenant = TenantId::new();
        store.seed(
            "tenants",
            vec![json!({"id": tenant.to_string(), "name": "Mane Event"})],
        );

        service.fetch(tenant).await;
        let branding = service.current();
        assert_eq!(branding.salon_name, "Mane Event");
        assert_eq!(branding.salon_tagline, "Salon & Spa");
    }

    #[tokio::test]
    async fn update_success_merges_only_changed_fields() {
        let (_store, rpc, service) = service();
        rpc.register("rpc_update_branding", |params| {
            // Unchanged fields arrive as null sentinels.
            assert_eq!(params["p_salon_tagline"], serde_json::Value::Null);
            assert_eq!(params["p_salon_name"], "Velvet Shears");
            Ok(RpcReply::ok())
        });

        service
            .update(
                TenantId::new(),
                BrandingUpdate {
                    salon_name: Some("Velvet Shears".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let branding = service.current();
        assert_eq!(branding.salon_name, "Velvet Shears");
        assert_eq!(branding.salon_tagline, "Salon & Spa");
    }

    #[tokio::test]
    async fn rejected_update_leaves_state_untouched() {
        let (_store, rpc, service) = service();
        rpc.register("rpc_update_branding", |_| {
            Ok(RpcReply::failed("name already taken"))
        });

        let err = service
            .update(
                TenantId::new(),
                BrandingUpdate {
                    salon_name: Some("Taken".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TenantError::Rejected(_)));
        assert_eq!(service.current(), TenantBranding::default());
    }
}
