//! View router: pure mapping from session/impersonation state to a layout.

use glowdesk_auth::Role;
use glowdesk_session::SessionState;

/// Inputs the router looks at. Deliberately flat so the mapping below reads
/// exactly like its evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub loading: bool,
    pub timed_out: bool,
    pub authenticated: bool,
    pub role: Option<Role>,
    pub impersonating: bool,
}

impl ViewState {
    pub fn from_session(state: &SessionState, impersonating: bool) -> Self {
        Self {
            loading: state.is_loading(),
            timed_out: state.is_timed_out(),
            authenticated: state.is_ready(),
            role: state.role(),
            impersonating,
        }
    }
}

/// Top-level layout selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Bootstrap/resolution still in flight.
    Spinner,
    /// Recoverable error screen offering the destructive session purge.
    RecoveryScreen,
    Login,
    SuperAdminConsole,
    TenantDashboard,
}

/// Select the layout. Evaluation order is part of the contract: loading
/// beats everything, then the terminal error, then authentication, then the
/// role gate. Impersonation deliberately overrides the role gate so a super
/// admin sees the tenant dashboard while the flag is set.
pub fn select_layout(view: &ViewState) -> Layout {
    if view.loading {
        return Layout::Spinner;
    }
    if view.timed_out {
        return Layout::RecoveryScreen;
    }
    if !view.authenticated {
        return Layout::Login;
    }
    let Some(role) = view.role else {
        return Layout::RecoveryScreen;
    };
    if role == Role::SuperAdmin && !view.impersonating {
        return Layout::SuperAdminConsole;
    }
    Layout::TenantDashboard
}
