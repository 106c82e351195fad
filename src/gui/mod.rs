//! GUI module - application window, sidebar and dashboard panels

mod app;
mod dashboard;
mod sidebar;

pub use app::SolarApp;
pub use dashboard::{Dashboard, DashboardView};
pub use sidebar::{FilterBound, Sidebar, SidebarAction};
