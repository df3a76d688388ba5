//! Role-filtered navigation.

use glowdesk_auth::Role;

/// One sidebar entry with its role allow-list. An entry renders only if the
/// current role is in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub allowed: &'static [Role],
}

use Role::{Manager, Owner, Receptionist, Staff, SuperAdmin};

/// Tenant-dashboard navigation.
pub const NAV_ENTRIES: &[NavEntry] = &[
    NavEntry {
        id: "dashboard",
        label: "Dashboard",
        allowed: &[SuperAdmin, Owner, Manager],
    },
    NavEntry {
        id: "bookings",
        label: "Bookings",
        allowed: &[SuperAdmin, Owner, Manager, Staff],
    },
    NavEntry {
        id: "clients",
        label: "Clients",
        allowed: &[SuperAdmin, Owner, Manager, Receptionist],
    },
    NavEntry {
        id: "stylists",
        label: "Stylists",
        allowed: &[SuperAdmin, Owner, Manager],
    },
    NavEntry {
        id: "analytics",
        label: "Analytics",
        allowed: &[SuperAdmin, Owner, Manager],
    },
    NavEntry {
        id: "calls",
        label: "Call Logs",
        allowed: &[SuperAdmin, Owner, Manager, Receptionist],
    },
    NavEntry {
        id: "marketing",
        label: "Marketing",
        allowed: &[SuperAdmin, Owner, Manager],
    },
    NavEntry {
        id: "assistant",
        label: "Receptionist AI",
        allowed: &[SuperAdmin, Owner, Manager],
    },
    NavEntry {
        id: "settings",
        label: "Settings",
        allowed: &[SuperAdmin, Owner],
    },
];

/// Console navigation, only ever shown to the platform operator.
pub const SUPER_ADMIN_ENTRIES: &[NavEntry] = &[
    NavEntry {
        id: "overview",
        label: "Platform Overview",
        allowed: &[SuperAdmin],
    },
    NavEntry {
        id: "tenants",
        label: "Tenants",
        allowed: &[SuperAdmin],
    },
];

pub fn visible_entries(role: Role) -> Vec<&'static NavEntry> {
    NAV_ENTRIES
        .iter()
        .filter(|entry| entry.allowed.contains(&role))
        .collect()
}

pub fn visible_admin_entries(role: Role) -> Vec<&'static NavEntry> {
    SUPER_ADMIN_ENTRIES
        .iter()
        .filter(|entry| entry.allowed.contains(&role))
        .collect()
}
