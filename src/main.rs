//! Solar Insights - GHI Data Exploration Dashboard
//!
//! Loads the per-country solar irradiance datasets, merges them into one
//! normalized table and displays filterable charts and tables.

mod charts;
mod data;
mod gui;
mod session;
mod stats;

use eframe::egui;
use gui::SolarApp;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("solar_insights=info".parse().unwrap_or_else(|_| "info".parse().unwrap()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> eframe::Result<()> {
    init_tracing();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Solar Insights"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Solar Insights",
        options,
        Box::new(|cc| Ok(Box::new(SolarApp::new(cc)))),
    )
}
