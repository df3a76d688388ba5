//! Call logs from the AI voice receptionist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use glowdesk_backend::{DataStore, Query};
use glowdesk_core::TenantId;

use super::{integer, opt_text, text, ScreenError};

/// Newest-first page size.
const CALL_LOG_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct CallLogRow {
    pub id: String,
    pub caller_phone: String,
    /// Seconds.
    pub call_duration: i64,
    pub transcript: String,
    /// What the receptionist did: booked, answered a question, escalated.
    pub action_taken: String,
    pub booking_id: Option<String>,
    pub recording_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallLogFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub struct CallLogsScreen {
    store: Arc<dyn DataStore>,
}

impl CallLogsScreen {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn load(
        &self,
        tenant: Option<TenantId>,
        filter: CallLogFilter,
    ) -> Result<Vec<CallLogRow>, ScreenError> {
        let Some(tenant) = tenant else {
            return Ok(vec![]);
        };
        let mut query = Query::new()
            .eq("tenant_id", tenant.to_string())
            .order_desc("created_at")
            .limit(CALL_LOG_LIMIT);
        if let Some(from) = filter.from {
            query = query.gte("created_at", from.to_rfc3339());
        }
        if let Some(to) = filter.to {
            query = query.lte("created_at", to.to_rfc3339());
        }

        let rows = self.store.select("call_logs", query).await?;
        Ok(rows.iter().map(parse_call).collect())
    }
}

fn parse_call(row: &Value) -> CallLogRow {
    CallLogRow {
        id: text(row, "id"),
        caller_phone: text(row, "caller_phone"),
        call_duration: integer(row, "call_duration"),
        transcript: text(row, "transcript"),
        action_taken: text(row, "action_taken"),
        booking_id: opt_text(row, "booking_id"),
        recording_url: opt_text(row, "recording_url"),
        created_at: text(row, "created_at"),
    }
}
