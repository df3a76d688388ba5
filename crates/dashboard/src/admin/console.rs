//! Platform overview metrics.

use std::sync::Arc;

use glowdesk_backend::{DataStore, Query};

use crate::screens::ScreenError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformOverview {
    pub tenants: u64,
    pub profiles: u64,
    pub calls: u64,
}

pub struct ConsoleScreen {
    store: Arc<dyn DataStore>,
}

impl ConsoleScreen {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<PlatformOverview, ScreenError> {
        let (tenants, profiles, calls) = tokio::join!(
            self.store.count("tenants", Query::new()),
            self.store.count("profiles", Query::new()),
            self.store.count("call_logs", Query::new()),
        );
        Ok(PlatformOverview {
            tenants: tenants?,
            profiles: profiles?,
            calls: calls?,
        })
    }
}
