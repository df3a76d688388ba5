//! Dashboard screens.
//!
//! Each screen is an independent fetch-render-mutate orchestrator over the
//! backend ports, scoped by the resolved tenant id. A `None` tenant means
//! "nothing to fetch": loads answer with empty view models, never errors.
//! Mutations surface the backend's `{success, error}` envelope as a result
//! for the notifier; a failed mutation never merges into local state.

pub mod assistant;
pub mod bookings;
pub mod calls;
pub mod clients;
pub mod home;
pub mod marketing;
pub mod settings;
pub mod staff;

use serde_json::Value;
use thiserror::Error;

use glowdesk_backend::BackendError;
use glowdesk_tenant::TenantError;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The backend accepted the call but rejected the mutation.
    #[error("{0}")]
    Rejected(String),

    /// Client-side validation failed before any call was made.
    #[error("{0}")]
    Invalid(String),
}

impl From<TenantError> for ScreenError {
    fn from(value: TenantError) -> Self {
        match value {
            TenantError::Backend(err) => ScreenError::Backend(err),
            TenantError::Rejected(msg) => ScreenError::Rejected(msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row parsing helpers
// ─────────────────────────────────────────────────────────────────────────────
//
// Rows arrive as loose JSON; screens read the columns they know and shrug at
// the rest. Missing scalars default rather than error so one bad row never
// takes a list view down.

pub(crate) fn text(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn opt_text(row: &Value, key: &str) -> Option<String> {
    row.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn number(row: &Value, key: &str) -> f64 {
    row.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

pub(crate) fn integer(row: &Value, key: &str) -> i64 {
    row.get(key).and_then(Value::as_i64).unwrap_or(0)
}

pub(crate) fn boolean(row: &Value, key: &str) -> bool {
    row.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Interpret an RPC reply envelope as a mutation result.
pub(crate) fn expect_success(
    reply: glowdesk_backend::RpcReply,
    what: &str,
) -> Result<(), ScreenError> {
    if reply.success() {
        Ok(())
    } else {
        Err(ScreenError::Rejected(
            reply
                .error()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{what} failed")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowdesk_backend::RpcReply;
    use serde_json::json;

    #[test]
    fn helpers_default_missing_columns() {
        let row = json!({"name": "Ana", "visits": 3, "vip": true});
        assert_eq!(text(&row, "name"), "Ana");
        assert_eq!(text(&row, "phone"), "");
        assert_eq!(opt_text(&row, "phone"), None);
        assert_eq!(integer(&row, "visits"), 3);
        assert_eq!(number(&row, "spend"), 0.0);
        assert!(boolean(&row, "vip"));
    }

    #[test]
    fn expect_success_maps_envelopes() {
        assert!(expect_success(RpcReply::ok(), "save").is_ok());
        let err = expect_success(RpcReply::failed("nope"), "save").unwrap_err();
        assert!(matches!(err, ScreenError::Rejected(msg) if msg == "nope"));
        let err = expect_success(
            RpcReply::Envelope {
                success: false,
                error: None,
            },
            "save",
        )
        .unwrap_err();
        assert!(matches!(err, ScreenError::Rejected(msg) if msg == "save failed"));
    }
}
