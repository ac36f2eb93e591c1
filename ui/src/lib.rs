//! Shared UI crate for Voiceboard. Views, charts and the editing flow
//! live here so the web and desktop launchers stay thin.

pub mod charts;
pub mod core;
pub mod flow;
pub mod i18n;
pub mod metrics;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::AppNavbar;
}

pub use views::Dashboard;
