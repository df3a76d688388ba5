//! Client CRM.

use std::sync::Arc;

use serde_json::{json, Value};

use glowdesk_backend::{DataStore, Query};
use glowdesk_core::TenantId;

use super::{number, opt_text, text, ScreenError};

#[derive(Debug, Clone, PartialEq)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: String,
    /// Completed bookings for this client.
    pub completed_visits: u64,
    /// Sum of booking prices across their history.
    pub lifetime_spend: f64,
}

pub struct ClientsScreen {
    store: Arc<dyn DataStore>,
}

impl ClientsScreen {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Newest-first client list, enriched with per-client booking history.
    /// History lookups are independent; one failing client row degrades to
    /// zeroes instead of sinking the list.
    pub async fn load(&self, tenant: Option<TenantId>) -> Result<Vec<ClientRow>, ScreenError> {
        let Some(tenant) = tenant else {
            return Ok(vec![]);
        };
        let rows = self
            .store
            .select(
                "clients",
                Query::new()
                    .eq("tenant_id", tenant.to_string())
                    .order_desc("created_at"),
            )
            .await?;

        let mut clients = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = text(row, "id");
            let completed_visits = self
                .store
                .count(
                    "bookings",
                    Query::new().eq("client_id", id.clone()).eq("status", "completed"),
                )
                .await
                .unwrap_or(0);
            let lifetime_spend = match self
                .store
                .select("bookings", Query::new().eq("client_id", id.clone()))
                .await
            {
                Ok(bookings) => bookings.iter().map(|b| number(b, "total_price")).sum(),
                Err(err) => {
                    tracing::warn!("booking history for client {id} failed: {err}");
                    0.0
                }
            };
            clients.push(ClientRow {
                id,
                name: text(row, "name"),
                phone: text(row, "phone"),
                email: opt_text(row, "email"),
                created_at: text(row, "created_at"),
                completed_visits,
                lifetime_spend,
            });
        }
        Ok(clients)
    }

    pub async fn add(
        &self,
        tenant: TenantId,
        name: &str,
        phone: &str,
        email: Option<&str>,
    ) -> Result<String, ScreenError> {
        if name.trim().is_empty() {
            return Err(ScreenError::Invalid("client name is required".into()));
        }
        let row = self
            .store
            .insert(
                "clients",
                json!({
                    "tenant_id": tenant.to_string(),
                    "name": name.trim(),
                    "phone": phone,
                    "email": email,
                }),
            )
            .await?;
        Ok(text(&row, "id"))
    }

    pub async fn update_contact(
        &self,
        client_id: &str,
        name: &str,
        phone: &str,
        email: Option<&str>,
    ) -> Result<(), ScreenError> {
        if name.trim().is_empty() {
            return Err(ScreenError::Invalid("client name is required".into()));
        }
        self.store
            .update(
                "clients",
                client_id,
                json!({ "name": name.trim(), "phone": phone, "email": email }),
            )
            .await?;
        Ok(())
    }

    pub async fn remove(&self, client_id: &str) -> Result<(), ScreenError> {
        self.store.delete("clients", client_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowdesk_backend::InMemoryDataStore;

    fn seeded() -> (Arc<InMemoryDataStore>, ClientsScreen, TenantId) {
        let store = Arc::new(InMemoryDataStore::new());
        let tenant = TenantId::new();
        store.seed(
            "clients",
            vec![
                json!({"id": "c1", "tenant_id": tenant.to_string(), "name": "Ana",
                       "phone": "555-0100", "created_at": "2026-08-01T00:00:00Z"}),
                json!({"id": "c2", "tenant_id": tenant.to_string(), "name": "Bo",
                       "phone": "555-0101", "email": "bo@example.test",
                       "created_at": "2026-08-03T00:00:00Z"}),
            ],
        );
        store.seed(
            "bookings",
            vec![
                json!({"id": "b1", "client_id": "c1", "status": "completed", "total_price": 60.0}),
                json!({"id": "b2", "client_id": "c1", "status": "completed", "total_price": 80.0}),
                json!({"id": "b3", "client_id": "c1", "status": "cancelled", "total_price": 40.0}),
            ],
        );
        let screen = ClientsScreen::new(store.clone());
        (store, screen, tenant)
    }

    #[tokio::test]
    async fn load_enriches_with_history() {
        let (_store, screen, tenant) = seeded();
        let clients = screen.load(Some(tenant)).await.unwrap();

        assert_eq!(clients.len(), 2);
        // Newest first.
        assert_eq!(clients[0].name, "Bo");
        let ana = &clients[1];
        assert_eq!(ana.completed_visits, 2);
        // Lifetime spend counts every booking, cancelled included.
        assert_eq!(ana.lifetime_spend, 180.0);
    }

    #[tokio::test]
    async fn add_requires_a_name_and_returns_the_new_id() {
        let (_store, screen, tenant) = seeded();

        let err = screen.add(tenant, " ", "555", None).await.unwrap_err();
        assert!(matches!(err, ScreenError::Invalid(_)));

        let id = screen
            .add(tenant, "Cleo", "555-0102", Some("cleo@example.test"))
            .await
            .unwrap();
        assert!(!id.is_empty());
        assert_eq!(screen.load(Some(tenant)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_and_remove_round_trip() {
        let (store, screen, tenant) = seeded();
        screen
            .update_contact("c1", "Ana Maria", "555-0100", None)
            .await
            .unwrap();
        let row = store
            .select_one("clients", Query::new().eq("id", "c1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row["name"], "Ana Maria");

        screen.remove("c1").await.unwrap();
        assert_eq!(screen.load(Some(tenant)).await.unwrap().len(), 1);
    }
}
