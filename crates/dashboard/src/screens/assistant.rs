//! AI receptionist configuration.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use glowdesk_backend::{DataStore, Query};
use glowdesk_core::TenantId;

use super::{boolean, text, ScreenError};

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub id: String,
    pub system_prompt: String,
    pub announcements: String,
    pub is_active: bool,
    pub updated_at: String,
}

pub struct AssistantScreen {
    store: Arc<dyn DataStore>,
}

impl AssistantScreen {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, tenant: Option<TenantId>) -> Result<Option<AgentConfig>, ScreenError> {
        let Some(tenant) = tenant else {
            return Ok(None);
        };
        let row = self
            .store
            .select_one(
                "ai_agent_config",
                Query::new().eq("tenant_id", tenant.to_string()),
            )
            .await?;
        Ok(row.as_ref().map(parse_config))
    }

    pub async fn save_prompts(
        &self,
        config_id: &str,
        system_prompt: &str,
        announcements: &str,
    ) -> Result<(), ScreenError> {
        self.store
            .update(
                "ai_agent_config",
                config_id,
                json!({
                    "system_prompt": system_prompt,
                    "announcements": announcements,
                    "updated_at": Utc::now().to_rfc3339(),
                }),
            )
            .await?;
        Ok(())
    }

    pub async fn set_active(&self, config_id: &str, active: bool) -> Result<(), ScreenError> {
        self.store
            .update(
                "ai_agent_config",
                config_id,
                json!({
                    "is_active": active,
                    "updated_at": Utc::now().to_rfc3339(),
                }),
            )
            .await?;
        Ok(())
    }
}

fn parse_config(row: &Value) -> AgentConfig {
    AgentConfig {
        id: text(row, "id"),
        system_prompt: text(row, "system_prompt"),
        announcements: text(row, "announcements"),
        is_active: boolean(row, "is_active"),
        updated_at: text(row, "updated_at"),
    }
}
