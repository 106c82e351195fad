//! Sidebar Widget
//! Left side panel: data source controls, country selection and the
//! optional numeric range filters.

use crate::session::SessionState;
use egui::{Color32, ComboBox, RichText};

/// Observed bounds for one optional filter column present in the data.
#[derive(Debug, Clone)]
pub struct FilterBound {
    pub column: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
}

/// Actions triggered by the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarAction {
    None,
    /// Country or a range filter changed; the dashboard must recompute.
    SelectionChanged,
    ReloadData,
    BrowseDataDir,
    OpenDataDir,
}

/// Left side panel with selection and filter controls.
pub struct Sidebar {
    pub countries: Vec<String>,
    pub filter_bounds: Vec<FilterBound>,
    pub data_dir_label: String,
    pub progress: f32,
    pub status: String,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            countries: Vec::new(),
            filter_bounds: Vec::new(),
            data_dir_label: String::new(),
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update country options after a load.
    pub fn update_countries(&mut self, countries: Vec<String>) {
        self.countries = countries;
    }

    /// Update the observed bounds for the optional filter columns.
    pub fn update_filter_bounds(&mut self, bounds: Vec<FilterBound>) {
        self.filter_bounds = bounds;
    }

    /// Set progress and status.
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    /// Draw the sidebar; selections land directly in `session`.
    pub fn show(&mut self, ui: &mut egui::Ui, session: &mut SessionState) -> SidebarAction {
        let mut action = SidebarAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("☀ Solar GHI Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(243, 156, 18)),
            );
            ui.label(
                RichText::new("Benin · Sierra Leone · Togo")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(&self.data_dir_label)
                        .size(12.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui.button("📂 Browse").clicked() {
                        action = SidebarAction::BrowseDataDir;
                    }
                    if ui.button("Open folder").clicked() {
                        action = SidebarAction::OpenDataDir;
                    }
                    if ui.button("⟳ Reload").clicked() {
                        action = SidebarAction::ReloadData;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Country Section =====
        ui.label(RichText::new("🌍 Select Country").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("country")
            .width(180.0)
            .selected_text(&session.country)
            .show_ui(ui, |ui| {
                for country in &self.countries {
                    if ui
                        .selectable_label(session.country == *country, country)
                        .clicked()
                        && session.country != *country
                    {
                        session.country = country.clone();
                        action = SidebarAction::SelectionChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Range Filters Section =====
        ui.label(RichText::new("🎚 Range Filters").size(14.0).strong());
        ui.add_space(5.0);

        if self.filter_bounds.is_empty() {
            ui.label(
                RichText::new("No optional columns in dataset")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }

        for bound in &self.filter_bounds {
            let (mut lower, mut upper) = session
                .ranges
                .get(&bound.column)
                .copied()
                .unwrap_or((bound.min, bound.max));

            ui.label(RichText::new(&bound.label).size(12.0));
            let low_resp = ui.add(
                egui::Slider::new(&mut lower, bound.min..=bound.max)
                    .text("min")
                    .fixed_decimals(2),
            );
            let high_resp = ui.add(
                egui::Slider::new(&mut upper, bound.min..=bound.max)
                    .text("max")
                    .fixed_decimals(2),
            );

            if low_resp.changed() || high_resp.changed() {
                if upper < lower {
                    upper = lower;
                }
                session.set_range(&bound.column, lower, upper);
                action = SidebarAction::SelectionChanged;
            }
            ui.add_space(6.0);
        }

        if !self.filter_bounds.is_empty() && ui.small_button("Reset filters").clicked() {
            session.ranges.clear();
            action = SidebarAction::SelectionChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}
