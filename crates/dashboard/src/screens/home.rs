//! Dashboard home: headline stats, weekly revenue, recent activity.

use std::sync::Arc;

use serde_json::{json, Value};

use glowdesk_backend::{RpcReply, RpcSurface};
use glowdesk_core::TenantId;

use super::{integer, number, text};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub bookings_today: i64,
    pub revenue_today: f64,
    pub new_clients: i64,
    pub calls_today: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenuePoint {
    pub day: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub id: String,
    pub client_name: String,
    pub service_name: String,
    pub stylist_name: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeView {
    pub stats: DashboardStats,
    pub weekly_revenue: Vec<RevenuePoint>,
    pub recent_activity: Vec<ActivityEntry>,
}

pub struct HomeScreen {
    rpc: Arc<dyn RpcSurface>,
}

impl HomeScreen {
    pub fn new(rpc: Arc<dyn RpcSurface>) -> Self {
        Self { rpc }
    }

    /// Load all three sections concurrently. A failing section logs and
    /// renders zeroed/empty; the others still populate.
    pub async fn load(&self, tenant: Option<TenantId>) -> HomeView {
        let Some(tenant) = tenant else {
            return HomeView::default();
        };
        let params = json!({ "p_tenant_id": tenant.to_string() });

        let (stats, revenue, activity) = tokio::join!(
            self.call("rpc_dashboard_stats", params.clone()),
            self.call("rpc_weekly_revenue", params.clone()),
            self.call("rpc_recent_activity", params),
        );

        HomeView {
            stats: stats
                .as_ref()
                .and_then(RpcReply::first)
                .map(parse_stats)
                .unwrap_or_default(),
            weekly_revenue: revenue
                .map(|r| r.rows().iter().map(parse_revenue_point).collect())
                .unwrap_or_default(),
            recent_activity: activity
                .map(|r| r.rows().iter().map(parse_activity).collect())
                .unwrap_or_default(),
        }
    }

    async fn call(&self, procedure: &str, params: Value) -> Option<RpcReply> {
        match self.rpc.call(procedure, params).await {
            Ok(reply) => Some(reply),
            Err(err) => {
                tracing::warn!("{procedure} failed: {err}");
                None
            }
        }
    }
}

fn parse_stats(row: &Value) -> DashboardStats {
    DashboardStats {
        bookings_today: integer(row, "bookings_today"),
        revenue_today: number(row, "revenue_today"),
        new_clients: integer(row, "new_clients"),
        calls_today: integer(row, "calls_today"),
    }
}

fn parse_revenue_point(row: &Value) -> RevenuePoint {
    RevenuePoint {
        day: text(row, "day"),
        revenue: number(row, "revenue"),
    }
}

fn parse_activity(row: &Value) -> ActivityEntry {
    ActivityEntry {
        id: text(row, "id"),
        client_name: text(row, "client_name"),
        service_name: text(row, "service_name"),
        stylist_name: text(row, "stylist_name"),
        status: text(row, "status"),
        created_at: text(row, "created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowdesk_backend::{BackendError, InMemoryRpcSurface};

    fn rpc_with_stats() -> Arc<InMemoryRpcSurface> {
        let rpc = Arc::new(InMemoryRpcSurface::new());
        rpc.register("rpc_dashboard_stats", |_| {
            Ok(RpcReply::from_value(json!({
                "bookings_today": 7, "revenue_today": 820.5,
                "new_clients": 2, "calls_today": 11,
            })))
        });
        rpc.register("rpc_weekly_revenue", |_| {
            Ok(RpcReply::Rows(vec![
                json!({"day": "Mon", "revenue": 300.0}),
                json!({"day": "Tue", "revenue": 520.5}),
            ]))
        });
        rpc.register("rpc_recent_activity", |_| Ok(RpcReply::Rows(vec![])));
        rpc
    }

    #[tokio::test]
    async fn loads_all_sections() {
        let screen = HomeScreen::new(rpc_with_stats());
        let view = screen.load(Some(TenantId::new())).await;

        assert_eq!(view.stats.bookings_today, 7);
        assert_eq!(view.stats.revenue_today, 820.5);
        assert_eq!(view.weekly_revenue.len(), 2);
        assert!(view.recent_activity.is_empty());
    }

    #[tokio::test]
    async fn no_tenant_means_empty_view() {
        let screen = HomeScreen::new(rpc_with_stats());
        let view = screen.load(None).await;
        assert_eq!(view, HomeView::default());
    }

    #[tokio::test]
    async fn failing_section_zeroes_only_itself() {
        let rpc = Arc::new(InMemoryRpcSurface::new());
        rpc.register("rpc_dashboard_stats", |_| {
            Err(BackendError::Network("down".into()))
        });
        rpc.register("rpc_weekly_revenue", |_| {
            Ok(RpcReply::Rows(vec![json!({"day": "Mon", "revenue": 5.0})]))
        });
        rpc.register("rpc_recent_activity", |_| Ok(RpcReply::Rows(vec![])));

        let view = HomeScreen::new(rpc).load(Some(TenantId::new())).await;
        assert_eq!(view.stats, DashboardStats::default());
        assert_eq!(view.weekly_revenue.len(), 1);
    }
}
