//! Demo entrypoint: wires the dashboard against the in-memory backend,
//! signs in a seeded owner, and prints what the front end would paint.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use glowdesk_backend::{
    InMemoryDataStore, InMemoryIdentityProvider, InMemoryRpcSurface, InMemoryStorage, RpcReply,
};
use glowdesk_core::TenantId;
use glowdesk_dashboard::{AppConfig, AppContext};

/// Seed one salon with a few rows so every screen has something to show.
fn seed_demo_backend(
    store: &InMemoryDataStore,
    rpc: &InMemoryRpcSurface,
    identity: &InMemoryIdentityProvider,
    tenant: TenantId,
) {
    let owner = identity.register_user("owner@demo.glowdesk.app", "demo-password");

    store.seed(
        "profiles",
        vec![json!({
            "id": owner.to_string(),
            "tenant_id": tenant.to_string(),
            "role": "owner",
            "email": "owner@demo.glowdesk.app",
            "full_name": "Demo Owner",
        })],
    );
    store.seed(
        "tenants",
        vec![json!({
            "id": tenant.to_string(),
            "name": "demo",
            "salon_name": "Glow Demo Studio",
            "salon_tagline": "Hair & Beauty",
            "owner_name": "Demo Owner",
        })],
    );
    store.seed(
        "bookings",
        vec![
            json!({"id": "b1", "tenant_id": tenant.to_string(), "client_name": "Ana",
                   "service_name": "Balayage", "status": "confirmed",
                   "start_at": "2026-08-06T10:00:00Z", "total_price": 140.0,
                   "payment_status": "paid", "source": "receptionist_ai"}),
            json!({"id": "b2", "tenant_id": tenant.to_string(), "client_name": "Bo",
                   "service_name": "Cut", "status": "pending",
                   "start_at": "2026-08-06T14:00:00Z", "total_price": 45.0,
                   "payment_status": "unpaid", "source": "walk_in"}),
        ],
    );
    store.seed(
        "clients",
        vec![
            json!({"id": "c1", "tenant_id": tenant.to_string(), "name": "Ana",
                   "phone": "555-0100", "created_at": "2026-07-01T00:00:00Z"}),
            json!({"id": "c2", "tenant_id": tenant.to_string(), "name": "Bo",
                   "phone": "555-0101", "created_at": "2026-07-20T00:00:00Z"}),
        ],
    );
    store.seed(
        "call_logs",
        vec![json!({"id": "l1", "tenant_id": tenant.to_string(),
                    "caller_phone": "555-0199", "call_duration": 62,
                    "transcript": "Booked a balayage for Thursday.",
                    "action_taken": "booked", "booking_id": "b1",
                    "created_at": "2026-08-05T16:20:00Z"})],
    );

    rpc.register("rpc_dashboard_stats", |_| {
        Ok(RpcReply::from_value(json!({
            "bookings_today": 2, "revenue_today": 185.0,
            "new_clients": 1, "calls_today": 1,
        })))
    });
    rpc.register("rpc_weekly_revenue", |_| {
        Ok(RpcReply::Rows(
            ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
                .iter()
                .enumerate()
                .map(|(i, day)| json!({"day": day, "revenue": 120.0 + 35.0 * i as f64}))
                .collect(),
        ))
    });
    rpc.register("rpc_recent_activity", |_| {
        Ok(RpcReply::Rows(vec![json!({
            "id": "b1", "client_name": "Ana", "service_name": "Balayage",
            "stylist_name": "Max", "status": "confirmed",
            "created_at": "2026-08-05T16:20:00Z",
        })]))
    });
    rpc.register("rpc_staff_board", |_| {
        Ok(RpcReply::Rows(vec![json!({
            "id": "s1", "full_name": "Max", "role": "stylist",
            "is_active": true, "bookings_count": 14, "revenue": 1260.0,
            "is_blocked_today": false, "commission_rate": 20.0,
        })]))
    });
    rpc.register_ok("rpc_update_branding");
}

#[tokio::main]
async fn main() -> Result<()> {
    glowdesk_observability::init_pretty();

    let identity = Arc::new(InMemoryIdentityProvider::new());
    let store = Arc::new(InMemoryDataStore::new());
    let rpc = Arc::new(InMemoryRpcSurface::new());
    let storage = Arc::new(InMemoryStorage::new());

    let tenant = TenantId::new();
    seed_demo_backend(&store, &rpc, &identity, tenant);

    let ctx = AppContext::new(identity, store, rpc, storage, AppConfig::from_env());
    ctx.bootstrap().await;

    println!("layout before login: {:?}", ctx.layout());
    ctx.sign_in("owner@demo.glowdesk.app", "demo-password")
        .await?;

    println!("layout after login:  {:?}", ctx.layout());
    let branding = ctx.branding.current();
    println!("salon: {} — {}", branding.salon_name, branding.salon_tagline);

    let nav: Vec<&str> = ctx.visible_nav().iter().map(|e| e.id).collect();
    println!("navigation: {nav:?}");

    let home = ctx.home().load(ctx.active_tenant()).await;
    println!(
        "today: {} bookings, ${:.2} revenue, {} calls",
        home.stats.bookings_today, home.stats.revenue_today, home.stats.calls_today
    );

    for booking in ctx.bookings().load(ctx.active_tenant()).await? {
        println!(
            "booking {} — {} ({}) ${:.2}",
            booking.id, booking.client_name, booking.status, booking.total_price
        );
    }

    for member in ctx.staff().load(ctx.active_tenant()).await? {
        println!(
            "staff {} — {} bookings, ${:.2} commission",
            member.full_name,
            member.bookings_count,
            member.commission_earnings()
        );
    }

    ctx.logout().await;
    println!("layout after logout: {:?}", ctx.layout());
    ctx.shutdown();
    Ok(())
}
