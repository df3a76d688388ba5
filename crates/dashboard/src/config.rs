//! Application configuration, read once at composition time.

use std::time::Duration;

use glowdesk_auth::FallbackPolicy;
use glowdesk_core::TenantId;
use glowdesk_session::{SessionConfig, DEFAULT_QUERY_TIMEOUT};

/// Commission rate applied when a staff row carries none.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.15;

/// Salon-local timezone for schedule displays.
pub const DEFAULT_SALON_TIMEZONE: &str = "America/Chicago";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Statically configured tenant id (development convenience; lowest
    /// resolution priority).
    pub fallback_tenant_id: Option<TenantId>,
    /// Override for the designated super-admin fallback email.
    pub super_admin_email: Option<String>,
    pub query_timeout: Duration,
    pub commission_rate: f64,
    pub salon_timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fallback_tenant_id: None,
            super_admin_email: None,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            commission_rate: DEFAULT_COMMISSION_RATE,
            salon_timezone: DEFAULT_SALON_TIMEZONE.to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment:
    /// `GLOWDESK_TENANT_ID`, `GLOWDESK_SUPER_ADMIN_EMAIL`,
    /// `GLOWDESK_QUERY_TIMEOUT_MS`. Malformed values fall back to defaults
    /// with a warning rather than aborting startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("GLOWDESK_TENANT_ID") {
            match raw.parse::<TenantId>() {
                Ok(id) => config.fallback_tenant_id = Some(id),
                Err(err) => tracing::warn!("ignoring GLOWDESK_TENANT_ID: {err}"),
            }
        }
        if let Ok(email) = std::env::var("GLOWDESK_SUPER_ADMIN_EMAIL") {
            if !email.is_empty() {
                config.super_admin_email = Some(email);
            }
        }
        if let Ok(raw) = std::env::var("GLOWDESK_QUERY_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => config.query_timeout = Duration::from_millis(ms),
                _ => tracing::warn!("ignoring GLOWDESK_QUERY_TIMEOUT_MS '{raw}'"),
            }
        }
        config
    }

    /// Session-resolver configuration derived from this app config.
    pub fn session_config(&self) -> SessionConfig {
        let mut session = SessionConfig {
            query_timeout: self.query_timeout,
            ..SessionConfig::default()
        };
        if let Some(email) = &self.super_admin_email {
            session.fallback = FallbackPolicy::new(email.clone());
        }
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowdesk_auth::Role;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.query_timeout, DEFAULT_QUERY_TIMEOUT);
        assert_eq!(config.commission_rate, 0.15);
        assert!(config.fallback_tenant_id.is_none());
    }

    #[test]
    fn session_config_honors_email_override() {
        let config = AppConfig {
            super_admin_email: Some("root@ops.example".to_string()),
            ..Default::default()
        };
        let session = config.session_config();
        assert_eq!(
            session.fallback.role_for_email("root@ops.example"),
            Role::SuperAdmin
        );
    }
}
