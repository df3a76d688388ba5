//! REST implementation of the store and RPC ports.
//!
//! Speaks the PostgREST-style protocol the hosted backend exposes:
//! `GET /rest/v1/{table}?col=eq.val` for reads, `POST /rest/v1/rpc/{name}`
//! for procedures. Authentication is an API key plus an optional bearer
//! token obtained from the identity provider.

use async_trait::async_trait;
use serde_json::Value;

use crate::{BackendError, DataStore, Filter, Query, RpcReply, RpcSurface};

#[derive(Debug, Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    bearer: Option<String>,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: None,
            bearer: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Attach the access token of the signed-in principal. Row-level security
    /// on the backend scopes every query to that principal's tenant.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn apply_auth(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key);
        }
        if let Some(token) = &self.bearer {
            req = req.bearer_auth(token);
        }
        req
    }

    fn query_params(query: &Query) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for filter in &query.filters {
            let (column, op, value) = match filter {
                Filter::Eq(c, v) => (c, "eq", v),
                Filter::Gte(c, v) => (c, "gte", v),
                Filter::Lte(c, v) => (c, "lte", v),
            };
            params.push((column.clone(), format!("{op}.{}", scalar_repr(value))));
        }
        if let Some((column, ascending)) = &query.order_by {
            let dir = if *ascending { "asc" } else { "desc" };
            params.push(("order".into(), format!("{column}.{dir}")));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".into(), limit.to_string()));
        }
        params
    }

    async fn send_expecting_json(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<Value, BackendError> {
        let resp = req
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Api(status.as_u16(), body));
        }
        resp.json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DataStore for RestBackend {
    async fn select_one(&self, table: &str, query: Query) -> Result<Option<Value>, BackendError> {
        let rows = self.select(table, query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    async fn select(&self, table: &str, query: Query) -> Result<Vec<Value>, BackendError> {
        let mut params = Self::query_params(&query);
        params.push(("select".into(), "*".into()));
        let req = self
            .apply_auth(self.http.get(self.table_url(table)))
            .query(&params);
        let body = self.send_expecting_json(req).await?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(BackendError::Parse(format!(
                "expected row array, got {other}"
            ))),
        }
    }

    async fn insert(&self, table: &str, fields: Value) -> Result<Value, BackendError> {
        let req = self
            .apply_auth(self.http.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&fields);
        let body = self.send_expecting_json(req).await?;
        match body {
            Value::Array(mut rows) if !rows.is_empty() => Ok(rows.remove(0)),
            other => Err(BackendError::Parse(format!(
                "insert returned no representation: {other}"
            ))),
        }
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), BackendError> {
        let req = self
            .apply_auth(self.http.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .json(&fields);
        let resp = req
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Api(status.as_u16(), body));
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), BackendError> {
        let req = self
            .apply_auth(self.http.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))]);
        let resp = req
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Api(status.as_u16(), body));
        }
        Ok(())
    }

    async fn count(&self, table: &str, query: Query) -> Result<u64, BackendError> {
        let mut params = Self::query_params(&query);
        params.push(("select".into(), "id".into()));
        let req = self
            .apply_auth(self.http.get(self.table_url(table)))
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .query(&params);
        let resp = req
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() && status.as_u16() != 206 {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Api(status.as_u16(), body));
        }
        let range = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| BackendError::Parse("missing content-range header".into()))?;
        parse_content_range_total(range)
            .ok_or_else(|| BackendError::Parse(format!("bad content-range '{range}'")))
    }
}

#[async_trait]
impl RpcSurface for RestBackend {
    async fn call(&self, procedure: &str, params: Value) -> Result<RpcReply, BackendError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, procedure);
        let req = self.apply_auth(self.http.post(url)).json(&params);
        let body = self.send_expecting_json(req).await?;
        Ok(RpcReply::from_value(body))
    }
}

/// Render a JSON scalar the way it appears in a filter query string.
fn scalar_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Total from a `content-range` header such as `0-0/42` or `*/0`.
fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit('/').next()?.parse().ok()
}
