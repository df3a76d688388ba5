//! `glowdesk-dashboard` — the dashboard shell.
//!
//! Renders nothing itself: given the resolved session and tenant it selects
//! a layout, filters navigation by role, and produces typed view models for
//! each screen. Any front end (terminal, web view, tests) can paint the
//! result.

pub mod admin;
pub mod config;
pub mod context;
pub mod nav;
pub mod notify;
pub mod router;
pub mod screens;

pub use config::AppConfig;
pub use context::AppContext;
pub use nav::{visible_admin_entries, visible_entries, NavEntry, NAV_ENTRIES, SUPER_ADMIN_ENTRIES};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use router::{select_layout, Layout, ViewState};
