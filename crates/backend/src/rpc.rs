//! Remote-procedure surface port.
//!
//! Business operations (walk-in creation, commission updates, branding,
//! tenant provisioning) are named procedures with fixed keyword payloads.
//! The client only interprets the reply envelope; procedure semantics belong
//! to the backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::BackendError;

/// Reply from a remote procedure.
///
/// Mutating procedures answer with a `{success, error?}` envelope; reporting
/// procedures answer with rows (a stats procedure's single object is a
/// one-row reply).
#[derive(Debug, Clone, PartialEq)]
pub enum RpcReply {
    Envelope { success: bool, error: Option<String> },
    Rows(Vec<Value>),
}

impl RpcReply {
    pub fn ok() -> Self {
        RpcReply::Envelope {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        RpcReply::Envelope {
            success: false,
            error: Some(error.into()),
        }
    }

    /// Classify a raw JSON reply.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(rows) => RpcReply::Rows(rows),
            Value::Object(ref map) if map.contains_key("success") => RpcReply::Envelope {
                success: map
                    .get("success")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                error: map
                    .get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            other => RpcReply::Rows(vec![other]),
        }
    }

    pub fn success(&self) -> bool {
        match self {
            RpcReply::Envelope { success, .. } => *success,
            RpcReply::Rows(_) => true,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RpcReply::Envelope { error, .. } => error.as_deref(),
            RpcReply::Rows(_) => None,
        }
    }

    pub fn rows(&self) -> &[Value] {
        match self {
            RpcReply::Rows(rows) => rows,
            RpcReply::Envelope { .. } => &[],
        }
    }

    /// First row of a rows reply (stats-style procedures).
    pub fn first(&self) -> Option<&Value> {
        self.rows().first()
    }
}

/// Port over the remote-procedure surface.
#[async_trait]
pub trait RpcSurface: Send + Sync {
    async fn call(&self, procedure: &str, params: Value) -> Result<RpcReply, BackendError>;
}

type Handler = Box<dyn Fn(&Value) -> Result<RpcReply, BackendError> + Send + Sync>;

/// In-memory procedure registry for tests and local development.
#[derive(Default)]
pub struct InMemoryRpcSurface {
    handlers: RwLock<HashMap<String, Handler>>,
}

impl InMemoryRpcSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, procedure: &str, handler: F)
    where
        F: Fn(&Value) -> Result<RpcReply, BackendError> + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers.insert(procedure.to_string(), Box::new(handler));
        }
    }

    /// Register a procedure that always answers with a success envelope.
    pub fn register_ok(&self, procedure: &str) {
        self.register(procedure, |_| Ok(RpcReply::ok()));
    }
}

#[async_trait]
impl RpcSurface for InMemoryRpcSurface {
    async fn call(&self, procedure: &str, params: Value) -> Result<RpcReply, BackendError> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| BackendError::Unavailable("rpc registry unavailable".into()))?;
        let handler = handlers
            .get(procedure)
            .ok_or_else(|| BackendError::UnknownProcedure(procedure.to_string()))?;
        handler(&params)
    }
}
