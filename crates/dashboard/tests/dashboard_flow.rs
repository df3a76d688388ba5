//! End-to-end flows through the composition root: session bootstrap, layout
//! selection, impersonation, and recovery, all against in-memory backends.

use std::sync::Arc;

use serde_json::json;

use glowdesk_auth::{Principal, Role, DEFAULT_SUPER_ADMIN_EMAIL};
use glowdesk_backend::{
    AuthEvent, DataStore, InMemoryDataStore, InMemoryIdentityProvider, InMemoryRpcSurface,
    InMemoryStorage, KeyValueStorage, ProviderSession, Query, SessionFetch,
};
use glowdesk_core::{PrincipalId, TenantId};
use glowdesk_dashboard::{AppConfig, AppContext, Layout};

struct Harness {
    identity: Arc<InMemoryIdentityProvider>,
    store: Arc<InMemoryDataStore>,
    rpc: Arc<InMemoryRpcSurface>,
    storage: Arc<InMemoryStorage>,
}

impl Harness {
    fn new() -> Self {
        Self {
            identity: Arc::new(InMemoryIdentityProvider::new()),
            store: Arc::new(InMemoryDataStore::new()),
            rpc: Arc::new(InMemoryRpcSurface::new()),
            storage: Arc::new(InMemoryStorage::new()),
        }
    }

    /// Seed a signed-in principal bound to `role` (and optionally a tenant).
    fn with_profile(self, role: &str, tenant: Option<TenantId>) -> Self {
        let principal = PrincipalId::new();
        self.identity.set_session(ProviderSession::new(Principal::new(
            principal,
            Some(format!("{role}@salon.example")),
        )));
        let mut row = json!({
            "id": principal.to_string(),
            "role": role,
            "email": format!("{role}@salon.example"),
        });
        if let Some(tenant) = tenant {
            row["tenant_id"] = json!(tenant.to_string());
        }
        self.store.seed("profiles", vec![row]);
        self
    }

    fn context(&self) -> AppContext {
        AppContext::new(
            self.identity.clone(),
            self.store.clone(),
            self.rpc.clone(),
            self.storage.clone(),
            AppConfig::default(),
        )
    }
}

// Scenario A: super admin without an impersonation flag gets the console.
#[tokio::test]
async fn super_admin_without_impersonation_gets_the_console() {
    let harness = Harness::new().with_profile("super_admin", None);
    let ctx = harness.context();
    ctx.bootstrap().await;

    assert_eq!(ctx.layout(), Layout::SuperAdminConsole);
    assert_eq!(ctx.active_tenant(), None);
    let admin_nav: Vec<&str> = ctx.visible_admin_nav().iter().map(|e| e.id).collect();
    assert_eq!(admin_nav, vec!["overview", "tenants"]);
    ctx.shutdown();
}

// Scenario B: impersonating super admin gets the tenant dashboard scoped to
// the flagged tenant, with an exit banner.
#[tokio::test]
async fn impersonating_super_admin_sees_the_flagged_tenant_dashboard() {
    let harness = Harness::new().with_profile("super_admin", None);
    let t1 = TenantId::new();
    harness.store.seed(
        "tenants",
        vec![json!({
            "id": t1.to_string(),
            "name": "curls",
            "salon_name": "Curl Up & Dye",
        })],
    );

    let ctx = harness.context();
    ctx.bootstrap().await;
    assert_eq!(ctx.layout(), Layout::SuperAdminConsole);

    ctx.tenant_directory().impersonate(t1, Some("Curl Up & Dye"));
    ctx.reload().await;

    assert_eq!(ctx.layout(), Layout::TenantDashboard);
    assert_eq!(ctx.session.state().role(), Some(Role::SuperAdmin));
    assert_eq!(ctx.active_tenant(), Some(t1));
    assert!(ctx.tenant_selection().is_impersonated());
    let banner = ctx.impersonation_banner().unwrap();
    assert!(banner.contains("Curl Up & Dye"));
    // Branding re-resolved under the impersonated tenant.
    assert_eq!(ctx.branding.current().salon_name, "Curl Up & Dye");

    ctx.exit_impersonation().await;
    assert_eq!(ctx.layout(), Layout::SuperAdminConsole);
    assert!(ctx.impersonation_banner().is_none());
    ctx.shutdown();
}

// Scenario C: staff do not see owner-gated navigation entries.
#[tokio::test]
async fn staff_navigation_omits_settings() {
    let harness = Harness::new().with_profile("staff", Some(TenantId::new()));
    let ctx = harness.context();
    ctx.bootstrap().await;

    assert_eq!(ctx.layout(), Layout::TenantDashboard);
    let nav: Vec<&str> = ctx.visible_nav().iter().map(|e| e.id).collect();
    assert!(!nav.contains(&"settings"));
    assert!(nav.contains(&"bookings"));
    assert!(ctx.visible_admin_nav().is_empty());
    ctx.shutdown();
}

// Scenario D: bootstrap timeout with no recoverable token shows the
// recovery screen, never an infinite spinner.
#[tokio::test(start_paused = true)]
async fn hung_bootstrap_without_token_shows_the_recovery_screen() {
    let harness = Harness::new();
    harness.identity.set_fetch_behavior(SessionFetch::Hang);

    let ctx = harness.context();
    ctx.bootstrap().await;

    assert_eq!(ctx.layout(), Layout::RecoveryScreen);

    // The recovery action purges provider keys and lands back on login.
    harness.storage.set("gd-main-auth-token", "{stale garbage");
    harness.identity.set_fetch_behavior(SessionFetch::Respond);
    ctx.recover_from_timeout().await;

    assert_eq!(ctx.layout(), Layout::Login);
    assert!(harness.storage.get("gd-main-auth-token").is_none());
    ctx.shutdown();
}

// Bootstrap with a hung provider but a valid persisted token recovers the
// principal and resolves normally.
#[tokio::test(start_paused = true)]
async fn hung_bootstrap_recovers_from_a_persisted_token() {
    let harness = Harness::new();
    harness.identity.set_fetch_behavior(SessionFetch::Hang);

    let principal = PrincipalId::new();
    let tenant = TenantId::new();
    harness.storage.set(
        "gd-main-auth-token",
        &json!({"user": {"id": principal.to_string(), "email": "gm@salon.example"}}).to_string(),
    );
    harness.store.seed(
        "profiles",
        vec![json!({
            "id": principal.to_string(),
            "tenant_id": tenant.to_string(),
            "role": "owner",
            "email": "gm@salon.example",
        })],
    );

    let ctx = harness.context();
    ctx.bootstrap().await;

    assert_eq!(ctx.layout(), Layout::TenantDashboard);
    assert_eq!(ctx.active_tenant(), Some(tenant));
    ctx.shutdown();
}

// The email fallback ladder: designated address ends up in the console even
// with the profile store unreachable.
#[tokio::test]
async fn designated_email_falls_back_to_the_console() {
    let harness = Harness::new();
    harness
        .identity
        .set_session(ProviderSession::new(Principal::new(
            PrincipalId::new(),
            Some(DEFAULT_SUPER_ADMIN_EMAIL.to_string()),
        )));
    // No profile row seeded: both keyed lookups miss.

    let ctx = harness.context();
    ctx.bootstrap().await;

    assert_eq!(ctx.session.state().role(), Some(Role::SuperAdmin));
    assert_eq!(ctx.layout(), Layout::SuperAdminConsole);
    ctx.shutdown();
}

// Static fallback tenant is the lowest-priority scope source.
#[tokio::test]
async fn static_fallback_tenant_scopes_fallback_sessions() {
    let harness = Harness::new();
    harness
        .identity
        .set_session(ProviderSession::new(Principal::new(
            PrincipalId::new(),
            Some("someone@salon.example".to_string()),
        )));

    let fallback_tenant = TenantId::new();
    let ctx = AppContext::new(
        harness.identity.clone(),
        harness.store.clone(),
        harness.rpc.clone(),
        harness.storage.clone(),
        AppConfig {
            fallback_tenant_id: Some(fallback_tenant),
            ..Default::default()
        },
    );
    ctx.bootstrap().await;

    // Email fallback made them an owner with no profile tenant; the static
    // id fills the gap.
    assert_eq!(ctx.session.state().role(), Some(Role::Owner));
    assert_eq!(ctx.active_tenant(), Some(fallback_tenant));
    ctx.shutdown();
}

// Logout is a hard barrier: session, impersonation, and branding all reset.
#[tokio::test]
async fn logout_resets_everything() {
    let harness = Harness::new().with_profile("super_admin", None);
    let tenant = TenantId::new();
    harness.store.seed(
        "tenants",
        vec![json!({"id": tenant.to_string(), "salon_name": "Shear Genius"})],
    );

    let ctx = harness.context();
    ctx.bootstrap().await;
    ctx.enter_impersonation(tenant, Some("Shear Genius")).await;
    assert_eq!(ctx.layout(), Layout::TenantDashboard);

    ctx.logout().await;

    assert_eq!(ctx.layout(), Layout::Login);
    assert!(!ctx.impersonation.is_active());
    assert_eq!(ctx.active_tenant(), None);
    assert_eq!(ctx.branding.current().salon_name, "My Salon");
    ctx.shutdown();
}

// A cross-tab push for a different principal re-scopes the dashboard.
#[tokio::test]
async fn pushed_sign_in_for_a_new_principal_rescopes() {
    let harness = Harness::new().with_profile("owner", Some(TenantId::new()));
    let ctx = harness.context();
    ctx.bootstrap().await;
    assert_eq!(ctx.session.state().role(), Some(Role::Owner));

    let other = PrincipalId::new();
    let other_tenant = TenantId::new();
    // Second profile appears alongside the first.
    let mut rows = harness.store.select("profiles", Query::new()).await.unwrap();
    rows.push(json!({
        "id": other.to_string(),
        "tenant_id": other_tenant.to_string(),
        "role": "receptionist",
        "email": "desk@salon.example",
    }));
    harness.store.seed("profiles", rows);

    ctx.session
        .handle_auth_event(AuthEvent::SignedIn(ProviderSession::new(Principal::new(
            other,
            Some("desk@salon.example".to_string()),
        ))))
        .await;

    assert_eq!(ctx.session.state().role(), Some(Role::Receptionist));
    assert_eq!(ctx.active_tenant(), Some(other_tenant));
    let nav: Vec<&str> = ctx.visible_nav().iter().map(|e| e.id).collect();
    assert_eq!(nav, vec!["clients", "calls"]);
    ctx.shutdown();
}
