//! Marketing campaigns.

use std::sync::Arc;

use serde_json::{json, Value};

use glowdesk_backend::{DataStore, Query};
use glowdesk_core::TenantId;

use super::{integer, text, ScreenError};

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRow {
    pub id: String,
    pub name: String,
    pub message: String,
    pub audience: String,
    pub channel: String,
    pub status: String,
    pub sent_count: i64,
    pub created_at: String,
}

/// Human label for an audience key.
pub fn audience_label(audience: &str) -> &str {
    match audience {
        "all_clients" => "All Clients",
        "vip_only" => "VIP Only",
        "inactive" => "Inactive (30+ days)",
        "new_this_month" => "New This Month",
        other => other,
    }
}

pub struct MarketingScreen {
    store: Arc<dyn DataStore>,
}

impl MarketingScreen {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, tenant: Option<TenantId>) -> Result<Vec<CampaignRow>, ScreenError> {
        let Some(tenant) = tenant else {
            return Ok(vec![]);
        };
        let rows = self
            .store
            .select(
                "marketing_campaigns",
                Query::new()
                    .eq("tenant_id", tenant.to_string())
                    .order_desc("created_at"),
            )
            .await?;
        Ok(rows.iter().map(parse_campaign).collect())
    }

    pub async fn save_draft(
        &self,
        tenant: TenantId,
        name: &str,
        message: &str,
        audience: &str,
        channel: &str,
    ) -> Result<(), ScreenError> {
        if name.trim().is_empty() || message.trim().is_empty() {
            return Err(ScreenError::Invalid(
                "campaign name and message are required".into(),
            ));
        }
        self.store
            .insert(
                "marketing_campaigns",
                json!({
                    "tenant_id": tenant.to_string(),
                    "name": name.trim(),
                    "message": message.trim(),
                    "audience": audience,
                    "channel": channel,
                    "status": "draft",
                    "sent_count": 0,
                }),
            )
            .await?;
        Ok(())
    }

    /// Launch a draft: mark it sending, size the audience, then finalize.
    /// Delivery itself happens out of band; `sent_count` records the audience
    /// size the launch targeted.
    pub async fn launch(&self, tenant: TenantId, campaign_id: &str) -> Result<u64, ScreenError> {
        self.store
            .update("marketing_campaigns", campaign_id, json!({"status": "sending"}))
            .await?;

        let audience_size = self
            .store
            .count("clients", Query::new().eq("tenant_id", tenant.to_string()))
            .await?;

        self.store
            .update(
                "marketing_campaigns",
                campaign_id,
                json!({ "status": "sent", "sent_count": audience_size }),
            )
            .await?;
        Ok(audience_size)
    }
}

fn parse_campaign(row: &Value) -> CampaignRow {
    CampaignRow {
        id: text(row, "id"),
        name: text(row, "name"),
        message: text(row, "message"),
        audience: text(row, "audience"),
        channel: text(row, "channel"),
        status: text(row, "status"),
        sent_count: integer(row, "sent_count"),
        created_at: text(row, "created_at"),
    }
}
