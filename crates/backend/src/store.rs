//! Tabular data store port.
//!
//! The remote store is schemaless at this boundary: rows travel as JSON
//! objects and filters are built from column/value pairs. Screens parse the
//! columns they care about and ignore the rest, so additive schema changes
//! on the backend never break the client.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::BackendError;

/// A single column predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Gte(String, Value),
    Lte(String, Value),
}

/// Declarative row selection: conjunction of filters, optional ordering and
/// row limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    /// `(column, ascending)`
    pub order_by: Option<(String, bool)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.into(), value.into()));
        self
    }

    pub fn gte(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(column.into(), value.into()));
        self
    }

    pub fn lte(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte(column.into(), value.into()));
        self
    }

    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some((column.into(), true));
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some((column.into(), false));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Port over the remote tabular store.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Single-row read; `Ok(None)` when nothing matches.
    async fn select_one(&self, table: &str, query: Query) -> Result<Option<Value>, BackendError>;

    /// Multi-row read honoring order/limit.
    async fn select(&self, table: &str, query: Query) -> Result<Vec<Value>, BackendError>;

    /// Insert one row; returns the stored representation (with backend-filled
    /// columns such as `id`/`created_at`).
    async fn insert(&self, table: &str, fields: Value) -> Result<Value, BackendError>;

    /// Update columns of the row with the given `id`.
    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), BackendError>;

    /// Delete the row with the given `id`.
    async fn delete(&self, table: &str, id: &str) -> Result<(), BackendError>;

    /// Count rows matching the query.
    async fn count(&self, table: &str, query: Query) -> Result<u64, BackendError>;
}

fn value_matches(filter: &Filter, row: &Value) -> bool {
    match filter {
        Filter::Eq(column, expect) => row.get(column) == Some(expect),
        Filter::Gte(column, expect) => {
            matches!(
                row.get(column).and_then(|v| compare_values(v, expect)),
                Some(ordering) if ordering.is_ge()
            )
        }
        Filter::Lte(column, expect) => {
            matches!(
                row.get(column).and_then(|v| compare_values(v, expect)),
                Some(ordering) if ordering.is_le()
            )
        }
    }
}

/// Order two JSON scalars: numerically when both are numbers, otherwise
/// lexicographically on their string forms (ISO timestamps sort correctly).
fn compare_values(a: &Value, b: &Value) -> Option<core::cmp::Ordering> {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y);
    }
    let x = a.as_str()?;
    let y = b.as_str()?;
    Some(x.cmp(y))
}

/// In-memory tabular store for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryDataStore {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table wholesale.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(table.to_string(), rows);
        }
    }

    fn matching(&self, table: &str, query: &Query) -> Vec<Value> {
        let tables = match self.tables.read() {
            Ok(t) => t,
            Err(_) => return vec![],
        };
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| value_matches(f, row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, ascending)) = &query.order_by {
            rows.sort_by(|a, b| {
                let ordering = match (a.get(column), b.get(column)) {
                    (Some(x), Some(y)) => {
                        compare_values(x, y).unwrap_or(core::cmp::Ordering::Equal)
                    }
                    _ => core::cmp::Ordering::Equal,
                };
                if *ascending { ordering } else { ordering.reverse() }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        rows
    }
}

#[async_trait]
impl DataStore for InMemoryDataStore {
    async fn select_one(&self, table: &str, query: Query) -> Result<Option<Value>, BackendError> {
        Ok(self.matching(table, &query).into_iter().next())
    }

    async fn select(&self, table: &str, query: Query) -> Result<Vec<Value>, BackendError> {
        Ok(self.matching(table, &query))
    }

    async fn insert(&self, table: &str, mut fields: Value) -> Result<Value, BackendError> {
        let map = fields
            .as_object_mut()
            .ok_or_else(|| BackendError::Parse("insert payload must be an object".into()))?;
        if !map.contains_key("id") {
            map.insert("id".into(), Value::String(uuid::Uuid::now_v7().to_string()));
        }
        if !map.contains_key("created_at") {
            map.insert(
                "created_at".into(),
                Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        let row = Value::Object(map.clone());
        if let Ok(mut tables) = self.tables.write() {
            tables.entry(table.to_string()).or_default().push(row.clone());
        }
        Ok(row)
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), BackendError> {
        let patch = fields
            .as_object()
            .ok_or_else(|| BackendError::Parse("update payload must be an object".into()))?
            .clone();
        let mut tables = self
            .tables
            .write()
            .map_err(|_| BackendError::Unavailable("store lock poisoned".into()))?;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| BackendError::Api(404, format!("no such table '{table}'")))?;
        let row = rows
            .iter_mut()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| BackendError::Api(404, format!("no row '{id}' in '{table}'")))?;
        if let Some(map) = row.as_object_mut() {
            for (k, v) in patch {
                map.insert(k, v);
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), BackendError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| BackendError::Unavailable("store lock poisoned".into()))?;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|r| r.get("id").and_then(Value::as_str) != Some(id));
        }
        Ok(())
    }

    async fn count(&self, table: &str, query: Query) -> Result<u64, BackendError> {
        Ok(self.matching(table, &query).len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with_bookings() -> InMemoryDataStore {
        let store = InMemoryDataStore::new();
        store.seed(
            "bookings",
            vec![
                json!({"id": "b1", "tenant_id": "t1", "status": "completed", "total_price": 120.0, "created_at": "2026-08-01T10:00:00Z"}),
                json!({"id": "b2", "tenant_id": "t1", "status": "pending", "total_price": 45.0, "created_at": "2026-08-03T09:00:00Z"}),
                json!({"id": "b3", "tenant_id": "t2", "status": "completed", "total_price": 80.0, "created_at": "2026-08-02T12:00:00Z"}),
            ],
        );
        store
    }

    #[tokio::test]
    async fn select_filters_by_tenant_and_orders_descending() {
        let store = store_with_bookings();
        let rows = store
            .select(
                "bookings",
                Query::new().eq("tenant_id", "t1").order_desc("created_at"),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], "b2");
    }

    #[tokio::test]
    async fn range_filters_compare_timestamps() {
        let store = store_with_bookings();
        let rows = store
            .select(
                "bookings",
                Query::new().gte("created_at", "2026-08-02T00:00:00Z"),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn insert_fills_id_and_created_at() {
        let store = InMemoryDataStore::new();
        let row = store
            .insert("clients", json!({"tenant_id": "t1", "name": "Ana"}))
            .await
            .unwrap();
        assert!(row.get("id").is_some());
        assert!(row.get("created_at").is_some());

        let count = store
            .count("clients", Query::new().eq("tenant_id", "t1"))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn update_patches_only_given_columns() {
        let store = store_with_bookings();
        store
            .update("bookings", "b2", json!({"status": "confirmed"}))
            .await
            .unwrap();
        let row = store
            .select_one("bookings", Query::new().eq("id", "b2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row["status"], "confirmed");
        assert_eq!(row["total_price"], 45.0);
    }

    #[tokio::test]
    async fn update_of_missing_row_is_an_api_error() {
        let store = store_with_bookings();
        let err = store
            .update("bookings", "nope", json!({"status": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Api(404, _)));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let store = store_with_bookings();
        store.delete("bookings", "b1").await.unwrap();
        assert_eq!(store.count("bookings", Query::new()).await.unwrap(), 2);
    }
}
