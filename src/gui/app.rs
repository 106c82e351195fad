//! Solar Insights Main Application
//! Main window wiring: background dataset loading, session handling and the
//! sidebar / dashboard panels.

use crate::data::{self, aggregate, DataLoader};
use crate::gui::{Dashboard, DashboardView, FilterBound, Sidebar, SidebarAction};
use crate::session::{SessionState, FILTER_COLUMNS};
use egui::SidePanel;
use polars::prelude::*;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info, warn};

/// Storage key for the persisted session selections.
const SESSION_KEY: &str = "solar_insights_session";

/// Dataset loading result from the background thread.
enum LoadResult {
    Progress(String),
    Complete(DataFrame),
    Error(String),
}

/// Main application window.
pub struct SolarApp {
    loader: DataLoader,
    sidebar: Sidebar,
    dashboard: Dashboard,
    session: SessionState,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl SolarApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let session: SessionState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, SESSION_KEY))
            .unwrap_or_default();

        let loader = DataLoader::new();
        let mut sidebar = Sidebar::new();
        sidebar.data_dir_label = loader.data_dir().display().to_string();

        let mut app = Self {
            loader,
            sidebar,
            dashboard: Dashboard::new(),
            session,
            load_rx: None,
            is_loading: false,
        };
        app.start_load();
        app
    }

    /// Kick off a dataset load in a background thread. The loader itself is
    /// synchronous; only the handoff to the UI is channel-based.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }

        self.dashboard.clear();
        self.sidebar.set_progress(5.0, "Loading datasets...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let data_dir = self.loader.data_dir().to_path_buf();

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV sources...".to_string()));

            match data::load_unified_table(&data_dir) {
                Ok(df) => {
                    let _ = tx.send(LoadResult::Complete(df));
                }
                Err(e) => {
                    error!("dataset load failed: {e}");
                    // anyhow's alternate formatting includes the source chain.
                    let err = anyhow::Error::new(e);
                    let _ = tx.send(LoadResult::Error(format!("{err:#}")));
                }
            }
        });
    }

    /// Check for dataset loading results.
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.sidebar.set_progress(20.0, &status);
                    }
                    LoadResult::Complete(df) => {
                        self.loader.set_dataframe(df);
                        self.refresh_selection_options();
                        self.recompute();
                        self.sidebar.set_progress(
                            100.0,
                            &format!(
                                "Loaded {} rows, {} columns",
                                self.loader.get_row_count(),
                                self.loader.get_columns().len()
                            ),
                        );
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(message) => {
                        self.sidebar.set_progress(0.0, &format!("Error: {message}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Rebuild the sidebar options from the freshly loaded table and drop
    /// session selections that no longer apply.
    fn refresh_selection_options(&mut self) {
        let countries = self.loader.countries();
        if !countries.contains(&self.session.country) {
            self.session.country = countries.first().cloned().unwrap_or_default();
        }
        self.sidebar.update_countries(countries);

        let bounds: Vec<FilterBound> = self
            .loader
            .get_dataframe()
            .map(|df| {
                FILTER_COLUMNS
                    .iter()
                    .filter_map(|(column, label)| {
                        let (min, max) = aggregate::column_min_max(df, column)?;
                        Some(FilterBound {
                            column: column.to_string(),
                            label: label.to_string(),
                            min,
                            max,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let known: Vec<&String> = bounds.iter().map(|b| &b.column).collect();
        self.session.ranges.retain(|column, _| known.contains(&column));
        self.sidebar.update_filter_bounds(bounds);
    }

    /// Re-derive the filtered view and rebuild every dashboard aggregate.
    /// Runs synchronously on each selection change.
    fn recompute(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };

        match self.session.apply(df) {
            Ok(view) => {
                info!(
                    country = %self.session.country,
                    rows = view.height(),
                    "recomputed dashboard view"
                );
                self.dashboard
                    .set_view(DashboardView::build(&view, &self.session.country));
            }
            Err(e) => {
                self.sidebar.set_progress(0.0, &format!("Error: {e}"));
            }
        }
    }

    /// Let the user point the app at a different data directory.
    fn handle_browse_data_dir(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            self.sidebar.data_dir_label = dir.display().to_string();
            self.loader.set_data_dir(dir);
            self.start_load();
        }
    }

    /// Reveal the data directory in the system file manager.
    fn handle_open_data_dir(&mut self) {
        if let Err(e) = open::that(self.loader.data_dir()) {
            warn!("could not open data directory: {e}");
        }
    }
}

impl eframe::App for SolarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("sidebar")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.sidebar.show(ui, &mut self.session);

                    match action {
                        SidebarAction::SelectionChanged => self.recompute(),
                        SidebarAction::ReloadData => self.start_load(),
                        SidebarAction::BrowseDataDir => self.handle_browse_data_dir(),
                        SidebarAction::OpenDataDir => self.handle_open_data_dir(),
                        SidebarAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SESSION_KEY, &self.session);
    }
}
