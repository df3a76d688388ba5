//! Application composition root.
//!
//! All cross-cutting state lives here, constructed explicitly at startup and
//! torn down on logout/shutdown; no module-level singletons. Impersonation
//! enter/exit and the timeout-recovery action funnel through
//! [`AppContext::reload`], the hard barrier that supersedes all in-flight
//! resolution.

use std::sync::Arc;

use glowdesk_auth::RoleGrant;
use glowdesk_backend::{DataStore, IdentityProvider, KeyValueStorage, RpcSurface};
use glowdesk_core::TenantId;
use glowdesk_session::{SessionError, SessionStore};
use glowdesk_tenant::{resolve, BrandingService, ImpersonationController, TenantSelection};

use crate::admin::{ConsoleScreen, TenantDirectory};
use crate::config::AppConfig;
use crate::nav::{visible_admin_entries, visible_entries, NavEntry};
use crate::notify::Notifier;
use crate::router::{select_layout, Layout, ViewState};
use crate::screens::assistant::AssistantScreen;
use crate::screens::bookings::BookingsScreen;
use crate::screens::calls::CallLogsScreen;
use crate::screens::clients::ClientsScreen;
use crate::screens::home::HomeScreen;
use crate::screens::marketing::MarketingScreen;
use crate::screens::settings::SettingsScreen;
use crate::screens::staff::StaffScreen;

pub struct AppContext {
    pub config: AppConfig,
    store: Arc<dyn DataStore>,
    rpc: Arc<dyn RpcSurface>,
    pub session: Arc<SessionStore>,
    pub impersonation: Arc<ImpersonationController>,
    pub branding: Arc<BrandingService>,
    pub notifier: Arc<Notifier>,
}

impl AppContext {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DataStore>,
        rpc: Arc<dyn RpcSurface>,
        storage: Arc<dyn KeyValueStorage>,
        config: AppConfig,
    ) -> Self {
        let session = Arc::new(SessionStore::new(
            identity,
            store.clone(),
            storage.clone(),
            config.session_config(),
        ));
        let impersonation = Arc::new(ImpersonationController::new(storage));
        let branding = Arc::new(BrandingService::new(store.clone(), rpc.clone()));
        Self {
            config,
            store,
            rpc,
            session,
            impersonation,
            branding,
            notifier: Arc::new(Notifier::new()),
        }
    }

    /// Start the session machinery and load branding for the active tenant.
    pub async fn bootstrap(&self) {
        self.session.initialize().await;
        self.session.spawn_listener();
        if let Some(tenant) = self.active_tenant() {
            self.branding.fetch(tenant).await;
        }
    }

    /// Hard barrier: drop derived state and re-resolve everything. Used
    /// after impersonation enter/exit and by the timeout-recovery action.
    pub async fn reload(&self) {
        tracing::info!("reloading application state");
        self.branding.reset();
        self.session.initialize().await;
        if let Some(tenant) = self.active_tenant() {
            self.branding.fetch(tenant).await;
        }
    }

    pub fn shutdown(&self) {
        self.session.shutdown();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tenant scoping
    // ─────────────────────────────────────────────────────────────────────

    /// Re-evaluated on every call; never cached.
    pub fn tenant_selection(&self) -> TenantSelection {
        resolve(
            self.impersonation.current().as_ref(),
            self.session.state().profile_tenant(),
            self.config.fallback_tenant_id,
        )
    }

    pub fn active_tenant(&self) -> Option<TenantId> {
        self.tenant_selection().tenant_id()
    }

    /// Typed role + tenant binding for the resolved session, when one exists.
    pub fn role_grant(&self) -> Option<RoleGrant> {
        let role = self.session.state().role()?;
        RoleGrant::new(role, self.active_tenant()).ok()
    }

    // ─────────────────────────────────────────────────────────────────────
    // View routing
    // ─────────────────────────────────────────────────────────────────────

    pub fn view_state(&self) -> ViewState {
        ViewState::from_session(&self.session.state(), self.impersonation.is_active())
    }

    pub fn layout(&self) -> Layout {
        select_layout(&self.view_state())
    }

    pub fn visible_nav(&self) -> Vec<&'static NavEntry> {
        match self.session.state().role() {
            Some(role) => visible_entries(role),
            None => vec![],
        }
    }

    pub fn visible_admin_nav(&self) -> Vec<&'static NavEntry> {
        match self.session.state().role() {
            Some(role) => visible_admin_entries(role),
            None => vec![],
        }
    }

    /// Banner text shown while impersonating, with the exit action implied.
    pub fn impersonation_banner(&self) -> Option<String> {
        let flag = self.impersonation.current()?;
        let target = flag
            .tenant_name
            .unwrap_or_else(|| flag.tenant_id.to_string());
        Some(format!(
            "Viewing {target} as platform operator. Exit to return to the console."
        ))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Impersonation and logout
    // ─────────────────────────────────────────────────────────────────────

    pub async fn enter_impersonation(&self, tenant_id: TenantId, tenant_name: Option<&str>) {
        self.impersonation.enter(tenant_id, tenant_name);
        self.reload().await;
    }

    pub async fn exit_impersonation(&self) {
        self.impersonation.exit();
        self.reload().await;
    }

    /// Logout clears session and impersonation together.
    pub async fn logout(&self) {
        self.session.force_logout().await;
        self.branding.reset();
    }

    /// Recovery action offered by the timed-out screen: purge every
    /// provider-namespaced storage key, force logout, re-resolve.
    pub async fn recover_from_timeout(&self) {
        self.session.purge_provider_storage();
        self.session.force_logout().await;
        self.reload().await;
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let result = self.session.sign_in(email, password).await;
        if result.is_ok() {
            if let Some(tenant) = self.active_tenant() {
                self.branding.fetch(tenant).await;
            }
        }
        result
    }

    // ─────────────────────────────────────────────────────────────────────
    // Screens
    // ─────────────────────────────────────────────────────────────────────

    pub fn home(&self) -> HomeScreen {
        HomeScreen::new(self.rpc.clone())
    }

    pub fn bookings(&self) -> BookingsScreen {
        BookingsScreen::new(self.store.clone(), self.rpc.clone())
    }

    pub fn clients(&self) -> ClientsScreen {
        ClientsScreen::new(self.store.clone())
    }

    pub fn staff(&self) -> StaffScreen {
        StaffScreen::new(
            self.store.clone(),
            self.rpc.clone(),
            self.config.commission_rate,
        )
    }

    pub fn marketing(&self) -> MarketingScreen {
        MarketingScreen::new(self.store.clone())
    }

    pub fn call_logs(&self) -> CallLogsScreen {
        CallLogsScreen::new(self.store.clone())
    }

    pub fn settings(&self) -> SettingsScreen {
        SettingsScreen::new(self.store.clone(), self.rpc.clone(), self.branding.clone())
    }

    pub fn assistant(&self) -> AssistantScreen {
        AssistantScreen::new(self.store.clone())
    }

    pub fn console(&self) -> ConsoleScreen {
        ConsoleScreen::new(self.store.clone())
    }

    pub fn tenant_directory(&self) -> TenantDirectory {
        TenantDirectory::new(
            self.store.clone(),
            self.rpc.clone(),
            self.impersonation.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowdesk_auth::{Principal, Role};
    use glowdesk_backend::{
        InMemoryDataStore, InMemoryIdentityProvider, InMemoryRpcSurface, InMemoryStorage,
        ProviderSession,
    };
    use glowdesk_core::PrincipalId;
    use serde_json::json;

    fn context_with_profile(role: &str, tenant: Option<TenantId>) -> AppContext {
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let principal = PrincipalId::new();
        identity.set_session(ProviderSession::new(Principal::new(
            principal,
            Some("gm@salon.example".to_string()),
        )));

        let store = Arc::new(InMemoryDataStore::new());
        let mut row = json!({
            "id": principal.to_string(),
            "role": role,
            "email": "gm@salon.example",
        });
        if let Some(tenant) = tenant {
            row["tenant_id"] = json!(tenant.to_string());
        }
        store.seed("profiles", vec![row]);

        AppContext::new(
            identity,
            store,
            Arc::new(InMemoryRpcSurface::new()),
            Arc::new(InMemoryStorage::new()),
            AppConfig::default(),
        )
    }

    #[tokio::test]
    async fn owner_bootstrap_lands_on_the_tenant_dashboard() {
        let tenant = TenantId::new();
        let ctx = context_with_profile("owner", Some(tenant));
        ctx.bootstrap().await;

        assert_eq!(ctx.layout(), Layout::TenantDashboard);
        assert_eq!(ctx.active_tenant(), Some(tenant));
        assert!(matches!(
            ctx.role_grant(),
            Some(RoleGrant::Tenant { .. })
        ));
        ctx.shutdown();
    }

    #[tokio::test]
    async fn tenant_selection_is_reevaluated_per_call() {
        let tenant = TenantId::new();
        let ctx = context_with_profile("super_admin", None);
        ctx.bootstrap().await;
        assert_eq!(ctx.active_tenant(), None);

        // Flag appears: the very next evaluation must see it.
        ctx.impersonation.enter(tenant, Some("Curl Up & Dye"));
        assert_eq!(ctx.active_tenant(), Some(tenant));
        assert!(ctx.tenant_selection().is_impersonated());
        ctx.shutdown();
    }

    #[tokio::test]
    async fn logout_clears_session_and_impersonation_together() {
        let ctx = context_with_profile("super_admin", None);
        ctx.bootstrap().await;
        ctx.impersonation.enter(TenantId::new(), None);

        ctx.logout().await;
        assert_eq!(ctx.layout(), Layout::Login);
        assert!(!ctx.impersonation.is_active());
        assert!(ctx.impersonation_banner().is_none());
        ctx.shutdown();
    }

    #[tokio::test]
    async fn role_grant_requires_a_tenant_for_tenant_roles() {
        let ctx = context_with_profile("manager", None);
        ctx.bootstrap().await;
        assert_eq!(ctx.session.state().role(), Some(Role::Manager));
        // No profile tenant, no fallback: a tenant role without a binding
        // yields no grant rather than a partially-formed one.
        assert_eq!(ctx.role_grant(), None);
        ctx.shutdown();
    }
}
