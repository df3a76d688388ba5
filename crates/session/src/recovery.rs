//! Principal recovery from persisted provider tokens.
//!
//! When the identity provider hangs or errors during bootstrap, the session
//! tokens it previously persisted often still identify the user. This module
//! is the single place that knows how to scrape them; the resolver only sees
//! `Option<Principal>`, so the brittle parsing stays swappable and testable
//! on its own.

use serde_json::Value;

use glowdesk_auth::Principal;
use glowdesk_backend::KeyValueStorage;
use glowdesk_core::PrincipalId;

/// Suffix the provider uses for its persisted session token keys.
const AUTH_TOKEN_SUFFIX: &str = "-auth-token";

/// Scan persisted provider tokens for an embedded id/email pair.
///
/// Token keys look like `<prefix><project>-auth-token` and hold JSON with the
/// user either at the top level (`user`) or nested under the legacy
/// `currentSession` shape. Malformed entries are skipped, never fatal.
pub fn recover_principal_from_storage(
    storage: &dyn KeyValueStorage,
    token_prefix: &str,
) -> Option<Principal> {
    for key in storage.keys() {
        if !key.starts_with(token_prefix) || !key.ends_with(AUTH_TOKEN_SUFFIX) {
            continue;
        }
        let Some(raw) = storage.get(&key) else {
            continue;
        };
        let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
            tracing::debug!("skipping unparseable token under '{key}'");
            continue;
        };
        let Some(user) = parsed
            .get("user")
            .or_else(|| parsed.get("currentSession").and_then(|s| s.get("user")))
        else {
            continue;
        };
        let (Some(id), Some(email)) = (
            user.get("id").and_then(Value::as_str),
            user.get("email").and_then(Value::as_str),
        ) else {
            continue;
        };
        if let Ok(principal_id) = id.parse::<PrincipalId>() {
            tracing::info!("recovered principal from persisted token '{key}'");
            return Some(Principal::new(principal_id, Some(email.to_string())));
        }
    }
    None
}
