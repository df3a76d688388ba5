//! Staff board: roster, commissions, day-blocks, logins.

use std::sync::Arc;

use serde_json::{json, Value};

use glowdesk_backend::{DataStore, Query, RpcSurface};
use glowdesk_core::{StaffId, TenantId};

use super::{boolean, expect_success, integer, number, opt_text, text, ScreenError};

#[derive(Debug, Clone, PartialEq)]
pub struct StaffMember {
    pub id: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub bookings_count: i64,
    pub revenue: f64,
    pub is_blocked_today: bool,
    /// Percentage, e.g. `15.0` for 15%.
    pub commission_rate: f64,
    pub email: Option<String>,
}

impl StaffMember {
    /// Commission earned on the revenue shown on the board.
    pub fn commission_earnings(&self) -> f64 {
        self.revenue * self.commission_rate / 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStaff {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    /// Percentage; defaults to the configured rate when `None`.
    pub commission: Option<f64>,
}

pub struct StaffScreen {
    store: Arc<dyn DataStore>,
    rpc: Arc<dyn RpcSurface>,
    /// Default commission as a fraction (0.15 == 15%).
    default_commission: f64,
}

impl StaffScreen {
    pub fn new(store: Arc<dyn DataStore>, rpc: Arc<dyn RpcSurface>, default_commission: f64) -> Self {
        Self {
            store,
            rpc,
            default_commission,
        }
    }

    fn default_rate_percent(&self) -> f64 {
        self.default_commission * 100.0
    }

    /// Roster with per-member booking counts and revenue, computed
    /// server-side by `rpc_staff_board`.
    pub async fn load(&self, tenant: Option<TenantId>) -> Result<Vec<StaffMember>, ScreenError> {
        let Some(tenant) = tenant else {
            return Ok(vec![]);
        };
        let reply = self
            .rpc
            .call(
                "rpc_staff_board",
                json!({ "p_tenant_id": tenant.to_string() }),
            )
            .await?;
        Ok(reply
            .rows()
            .iter()
            .map(|row| self.parse_member(row))
            .collect())
    }

    fn parse_member(&self, row: &Value) -> StaffMember {
        let commission_rate = match row.get("commission_rate").and_then(Value::as_f64) {
            Some(rate) => rate,
            None => self.default_rate_percent(),
        };
        StaffMember {
            id: text(row, "id"),
            full_name: text(row, "full_name"),
            role: text(row, "role"),
            is_active: boolean(row, "is_active"),
            bookings_count: integer(row, "bookings_count"),
            revenue: number(row, "revenue"),
            is_blocked_today: boolean(row, "is_blocked_today"),
            commission_rate,
            email: opt_text(row, "email"),
        }
    }

    pub async fn add_member(&self, tenant: TenantId, staff: NewStaff) -> Result<(), ScreenError> {
        if staff.name.trim().is_empty() {
            return Err(ScreenError::Invalid("name is required".into()));
        }
        let reply = self
            .rpc
            .call(
                "rpc_add_staff",
                json!({
                    "p_tenant_id": tenant.to_string(),
                    "p_name": staff.name.trim(),
                    "p_email": staff.email,
                    "p_phone": staff.phone,
                    "p_role": staff.role,
                    "p_commission": staff.commission.unwrap_or(self.default_rate_percent()),
                }),
            )
            .await?;
        expect_success(reply, "adding staff")
    }

    pub async fn set_commission(
        &self,
        tenant: TenantId,
        staff_id: StaffId,
        rate_percent: f64,
    ) -> Result<(), ScreenError> {
        if !(0.0..=100.0).contains(&rate_percent) {
            return Err(ScreenError::Invalid(
                "commission must be between 0 and 100 percent".into(),
            ));
        }
        let reply = self
            .rpc
            .call(
                "rpc_update_commission",
                json!({
                    "p_tenant_id": tenant.to_string(),
                    "p_staff_id": staff_id.to_string(),
                    "p_rate": rate_percent,
                }),
            )
            .await?;
        expect_success(reply, "commission update")
    }

    pub async fn block_today(&self, tenant: TenantId, staff_id: StaffId) -> Result<(), ScreenError> {
        self.day_toggle("rpc_block_staff_today", tenant, staff_id).await
    }

    pub async fn unblock_today(
        &self,
        tenant: TenantId,
        staff_id: StaffId,
    ) -> Result<(), ScreenError> {
        self.day_toggle("rpc_unblock_staff_today", tenant, staff_id).await
    }

    pub async fn deactivate(&self, tenant: TenantId, staff_id: StaffId) -> Result<(), ScreenError> {
        self.day_toggle("rpc_deactivate_staff", tenant, staff_id).await
    }

    pub async fn reactivate(&self, tenant: TenantId, staff_id: StaffId) -> Result<(), ScreenError> {
        self.day_toggle("rpc_reactivate_staff", tenant, staff_id).await
    }

    async fn day_toggle(
        &self,
        procedure: &str,
        tenant: TenantId,
        staff_id: StaffId,
    ) -> Result<(), ScreenError> {
        let reply = self
            .rpc
            .call(
                procedure,
                json!({
                    "p_tenant_id": tenant.to_string(),
                    "p_staff_id": staff_id.to_string(),
                }),
            )
            .await?;
        expect_success(reply, procedure)
    }

    /// Provision a dashboard login for a staff member.
    pub async fn create_login(
        &self,
        tenant: TenantId,
        staff_id: StaffId,
        email: &str,
        password: &str,
    ) -> Result<(), ScreenError> {
        if password.len() < 6 {
            return Err(ScreenError::Invalid(
                "password must be at least 6 characters".into(),
            ));
        }
        let reply = self
            .rpc
            .call(
                "rpc_create_staff_login",
                json!({
                    "p_tenant_id": tenant.to_string(),
                    "p_staff_id": staff_id.to_string(),
                    "p_email": email,
                    "p_password": password,
                }),
            )
            .await?;
        expect_success(reply, "login creation")
    }

    /// Rotate a staff member's password. The email is read from the staff
    /// row first since the board payload may omit it.
    pub async fn change_password(
        &self,
        staff_id: StaffId,
        new_password: &str,
    ) -> Result<(), ScreenError> {
        if new_password.len() < 6 {
            return Err(ScreenError::Invalid(
                "password must be at least 6 characters".into(),
            ));
        }
        let row = self
            .store
            .select_one("staff", Query::new().eq("id", staff_id.to_string()))
            .await?;
        let email = row
            .as_ref()
            .and_then(|r| r.get("email").and_then(Value::as_str))
            .ok_or_else(|| ScreenError::Rejected("staff member has no login email".into()))?;

        let reply = self
            .rpc
            .call(
                "rpc_change_staff_password",
                json!({
                    "p_staff_email": email,
                    "p_new_password": new_password,
                }),
            )
            .await?;
        expect_success(reply, "password change")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowdesk_backend::{InMemoryDataStore, InMemoryRpcSurface, RpcReply};

    fn screen() -> (Arc<InMemoryDataStore>, Arc<InMemoryRpcSurface>, StaffScreen) {
        let store = Arc::new(InMemoryDataStore::new());
        let rpc = Arc::new(InMemoryRpcSurface::new());
        let screen = StaffScreen::new(store.clone(), rpc.clone(), 0.15);
        (store, rpc, screen)
    }

    #[tokio::test]
    async fn load_defaults_missing_commission_to_the_configured_rate() {
        let (_store, rpc, screen) = screen();
        rpc.register("rpc_staff_board", |_| {
            Ok(RpcReply::Rows(vec![
                json!({"id": "s1", "full_name": "Max", "role": "stylist",
                       "is_active": true, "bookings_count": 12, "revenue": 900.0,
                       "is_blocked_today": false, "commission_rate": 20.0}),
                json!({"id": "s2", "full_name": "Nia", "role": "stylist",
                       "is_active": true, "bookings_count": 4, "revenue": 200.0,
                       "is_blocked_today": false}),
            ]))
        });

        let roster = screen.load(Some(TenantId::new())).await.unwrap();
        assert_eq!(roster[0].commission_rate, 20.0);
        assert_eq!(roster[0].commission_earnings(), 180.0);
        assert_eq!(roster[1].commission_rate, 15.0);
        assert_eq!(roster[1].commission_earnings(), 30.0);
    }

    #[tokio::test]
    async fn commission_rate_is_validated_client_side() {
        let (_store, _rpc, screen) = screen();
        let err = screen
            .set_commission(TenantId::new(), StaffId::new(), 140.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::Invalid(_)));
    }

    #[tokio::test]
    async fn short_login_password_never_reaches_the_backend() {
        let (_store, _rpc, screen) = screen();
        let err = screen
            .create_login(TenantId::new(), StaffId::new(), "nia@salon.example", "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::Invalid(_)));
    }

    #[tokio::test]
    async fn change_password_reads_the_email_from_the_staff_row() {
        let (store, rpc, screen) = screen();
        let staff_id = StaffId::new();
        store.seed(
            "staff",
            vec![json!({"id": staff_id.to_string(), "email": "max@salon.example"})],
        );
        rpc.register("rpc_change_staff_password", |params| {
            assert_eq!(params["p_staff_email"], "max@salon.example");
            Ok(RpcReply::ok())
        });

        screen.change_password(staff_id, "longenough").await.unwrap();
    }

    #[tokio::test]
    async fn change_password_without_email_is_rejected() {
        let (store, _rpc, screen) = screen();
        let staff_id = StaffId::new();
        store.seed("staff", vec![json!({"id": staff_id.to_string()})]);

        let err = screen
            .change_password(staff_id, "longenough")
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::Rejected(_)));
    }
}
