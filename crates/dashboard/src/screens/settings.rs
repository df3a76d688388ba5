//! Settings: branding, service menu, business hours.

use std::sync::Arc;

use serde_json::{json, Value};

use glowdesk_backend::{DataStore, Query, RpcSurface};
use glowdesk_core::TenantId;
use glowdesk_tenant::{BrandingService, BrandingUpdate, TenantBranding};

use super::{boolean, expect_success, integer, number, text, ScreenError};

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRow {
    pub id: String,
    pub name: String,
    /// Minutes.
    pub duration: i64,
    pub price: f64,
    pub category: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessHourRow {
    pub id: String,
    /// 0 = Sunday … 6 = Saturday.
    pub day_of_week: i64,
    pub open_time: String,
    pub close_time: String,
    pub is_open: bool,
}

pub struct SettingsScreen {
    store: Arc<dyn DataStore>,
    rpc: Arc<dyn RpcSurface>,
    branding: Arc<BrandingService>,
}

impl SettingsScreen {
    pub fn new(
        store: Arc<dyn DataStore>,
        rpc: Arc<dyn RpcSurface>,
        branding: Arc<BrandingService>,
    ) -> Self {
        Self {
            store,
            rpc,
            branding,
        }
    }

    pub fn branding(&self) -> TenantBranding {
        self.branding.current()
    }

    /// Persist a branding change. An empty update is a no-op success.
    pub async fn save_branding(
        &self,
        tenant: TenantId,
        update: BrandingUpdate,
    ) -> Result<(), ScreenError> {
        if update.is_empty() {
            return Ok(());
        }
        self.branding.update(tenant, update).await?;
        Ok(())
    }

    pub async fn services(&self, tenant: Option<TenantId>) -> Result<Vec<ServiceRow>, ScreenError> {
        let Some(tenant) = tenant else {
            return Ok(vec![]);
        };
        let rows = self
            .store
            .select(
                "services",
                Query::new()
                    .eq("tenant_id", tenant.to_string())
                    .order_asc("name"),
            )
            .await?;
        Ok(rows.iter().map(parse_service).collect())
    }

    /// Create or update a service menu entry (`service_id: None` creates).
    pub async fn upsert_service(
        &self,
        tenant: TenantId,
        service_id: Option<&str>,
        name: &str,
        duration: i64,
        price: f64,
        category: &str,
    ) -> Result<(), ScreenError> {
        if name.trim().is_empty() {
            return Err(ScreenError::Invalid("service name is required".into()));
        }
        let reply = self
            .rpc
            .call(
                "rpc_upsert_service",
                json!({
                    "p_tenant_id": tenant.to_string(),
                    "p_name": name.trim(),
                    "p_duration": duration,
                    "p_price": price,
                    "p_category": category,
                    "p_service_id": service_id,
                }),
            )
            .await?;
        expect_success(reply, "service save")
    }

    pub async fn business_hours(
        &self,
        tenant: Option<TenantId>,
    ) -> Result<Vec<BusinessHourRow>, ScreenError> {
        let Some(tenant) = tenant else {
            return Ok(vec![]);
        };
        let rows = self
            .store
            .select(
                "business_hours",
                Query::new()
                    .eq("tenant_id", tenant.to_string())
                    .order_asc("day_of_week"),
            )
            .await?;
        Ok(rows.iter().map(parse_hours).collect())
    }

    pub async fn update_hours(
        &self,
        tenant: TenantId,
        day_of_week: i64,
        open_time: &str,
        close_time: &str,
        is_open: bool,
    ) -> Result<(), ScreenError> {
        let reply = self
            .rpc
            .call(
                "rpc_update_hours",
                json!({
                    "p_tenant_id": tenant.to_string(),
                    "p_day": day_of_week,
                    "p_open": open_time,
                    "p_close": close_time,
                    "p_is_open": is_open,
                }),
            )
            .await?;
        expect_success(reply, "hours update")
    }
}

fn parse_service(row: &Value) -> ServiceRow {
    ServiceRow {
        id: text(row, "id"),
        name: text(row, "name"),
        duration: integer(row, "duration"),
        price: number(row, "price"),
        category: text(row, "category"),
        is_active: boolean(row, "is_active"),
    }
}

fn parse_hours(row: &Value) -> BusinessHourRow {
    BusinessHourRow {
        id: text(row, "id"),
        day_of_week: integer(row, "day_of_week"),
        open_time: text(row, "open_time"),
        close_time: text(row, "close_time"),
        is_open: boolean(row, "is_open"),
    }
}
