//! Bookings board.

use std::sync::Arc;

use serde_json::{json, Value};

use glowdesk_backend::{DataStore, Query, RpcSurface};
use glowdesk_core::TenantId;

use super::{expect_success, number, text, ScreenError};

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRow {
    pub id: String,
    pub stylist_id: String,
    pub client_name: String,
    pub service_name: String,
    pub status: String,
    pub start_at: String,
    pub total_price: f64,
    pub payment_status: String,
    /// Where the booking came from: walk-in, online, or the AI receptionist.
    pub source: String,
}

/// Walk-in booking form payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkIn {
    pub client_name: String,
    pub client_phone: String,
    pub service_id: String,
    pub stylist_id: String,
    pub start_time: String,
}

pub struct BookingsScreen {
    store: Arc<dyn DataStore>,
    rpc: Arc<dyn RpcSurface>,
}

impl BookingsScreen {
    pub fn new(store: Arc<dyn DataStore>, rpc: Arc<dyn RpcSurface>) -> Self {
        Self { store, rpc }
    }

    pub async fn load(&self, tenant: Option<TenantId>) -> Result<Vec<BookingRow>, ScreenError> {
        let Some(tenant) = tenant else {
            return Ok(vec![]);
        };
        let rows = self
            .store
            .select(
                "bookings",
                Query::new()
                    .eq("tenant_id", tenant.to_string())
                    .order_desc("start_at"),
            )
            .await?;
        Ok(rows.iter().map(parse_booking).collect())
    }

    /// Book a walk-in through the backend's booking rules (availability,
    /// double-booking, pricing all live server-side).
    pub async fn book_walk_in(&self, tenant: TenantId, walk_in: WalkIn) -> Result<(), ScreenError> {
        if walk_in.client_name.trim().is_empty() {
            return Err(ScreenError::Invalid("client name is required".into()));
        }
        let reply = self
            .rpc
            .call(
                "rpc_add_walkin",
                json!({
                    "p_tenant_id": tenant.to_string(),
                    "p_client_name": walk_in.client_name.trim(),
                    "p_client_phone": walk_in.client_phone,
                    "p_service_id": walk_in.service_id,
                    "p_stylist_id": walk_in.stylist_id,
                    "p_start_time": walk_in.start_time,
                }),
            )
            .await?;
        expect_success(reply, "walk-in booking")
    }
}

fn parse_booking(row: &Value) -> BookingRow {
    BookingRow {
        id: text(row, "id"),
        stylist_id: text(row, "stylist_id"),
        client_name: text(row, "client_name"),
        service_name: text(row, "service_name"),
        status: text(row, "status"),
        start_at: text(row, "start_at"),
        total_price: number(row, "total_price"),
        payment_status: text(row, "payment_status"),
        source: text(row, "source"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowdesk_backend::{InMemoryDataStore, InMemoryRpcSurface, RpcReply};

    fn screen() -> (Arc<InMemoryDataStore>, Arc<InMemoryRpcSurface>, BookingsScreen) {
        let store = Arc::new(InMemoryDataStore::new());
        let rpc = Arc::new(InMemoryRpcSurface::new());
        let screen = BookingsScreen::new(store.clone(), rpc.clone());
        (store, rpc, screen)
    }

    #[tokio::test]
    async fn load_scopes_by_tenant_and_orders_by_start() {
        let (store, _rpc, screen) = screen();
        let tenant = TenantId::new();
        store.seed(
            "bookings",
            vec![
                json!({"id": "b1", "tenant_id": tenant.to_string(), "client_name": "Ana",
                       "start_at": "2026-08-06T10:00:00Z", "total_price": 60.0, "status": "confirmed"}),
                json!({"id": "b2", "tenant_id": tenant.to_string(), "client_name": "Bo",
                       "start_at": "2026-08-06T14:00:00Z", "total_price": 45.0, "status": "pending"}),
                json!({"id": "b3", "tenant_id": TenantId::new().to_string(), "client_name": "Eve",
                       "start_at": "2026-08-06T09:00:00Z"}),
            ],
        );

        let rows = screen.load(Some(tenant)).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "b2");
        assert_eq!(rows[0].total_price, 45.0);
    }

    #[tokio::test]
    async fn no_tenant_fetches_nothing() {
        let (_store, _rpc, screen) = screen();
        assert!(screen.load(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn walk_in_requires_a_client_name() {
        let (_store, _rpc, screen) = screen();
        let err = screen
            .book_walk_in(
                TenantId::new(),
                WalkIn {
                    client_name: "  ".into(),
                    client_phone: "555".into(),
                    service_id: "s1".into(),
                    stylist_id: "st1".into(),
                    start_time: "2026-08-06T10:00:00Z".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::Invalid(_)));
    }

    #[tokio::test]
    async fn walk_in_rejection_surfaces_the_backend_message() {
        let (_store, rpc, screen) = screen();
        rpc.register("rpc_add_walkin", |_| {
            Ok(RpcReply::failed("slot already taken"))
        });

        let err = screen
            .book_walk_in(
                TenantId::new(),
                WalkIn {
                    client_name: "Ana".into(),
                    client_phone: "555".into(),
                    service_id: "s1".into(),
                    stylist_id: "st1".into(),
                    start_time: "2026-08-06T10:00:00Z".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::Rejected(msg) if msg == "slot already taken"));
    }
}
