//! Dashboard Widget
//! Central scrollable panel: metric cards, the top-10 wind speed table and
//! all charts for the currently filtered view.

use crate::charts::{ChartPlotter, AREA_COLOR, BAR_COLOR, HISTOGRAM_COLOR};
use crate::data::aggregate::{self, AggregateError, Bin, Distribution, DEFAULT_BIN_COUNT};
use crate::data::COUNTRY_COL;
use crate::session::FILTER_COLUMNS;
use crate::stats::{linear_fit, ColumnSummary};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::*;
use rayon::prelude::*;
use tracing::warn;

/// Bin count for the GHI histogram.
const HISTOGRAM_BINS: usize = 30;

/// Rows shown in the raw data preview.
const PREVIEW_ROWS: usize = 20;

/// Scatter plots shown against GHI.
const SCATTER_COLUMNS: [(&str, &str); 2] = [
    ("tamb", "Ambient Temperature (°C)"),
    ("rh", "Relative Humidity (%)"),
];

/// Everything the dashboard renders, recomputed from the filtered view on
/// every country or range change.
pub struct DashboardView {
    pub country: String,
    pub record_count: usize,
    pub ghi_summary: ColumnSummary,
    pub top_table: Result<DataFrame, AggregateError>,
    pub ghi_histogram: Distribution,
    pub country_means: Vec<Bin>,
    pub wind_buckets: Distribution,
    /// (label, distribution, donut) per optional variable.
    pub variable_pies: Vec<(String, Distribution, bool)>,
    /// (label, points, least-squares fit) per scatter variable.
    pub scatters: Vec<(String, Vec<[f64; 2]>, Option<(f64, f64)>)>,
    pub preview: DataFrame,
}

impl DashboardView {
    /// Compute every aggregate the dashboard needs from one immutable
    /// filtered view. The per-variable pie distributions fan out over rayon;
    /// each worker only reads the shared frame.
    pub fn build(df: &DataFrame, country: &str) -> Self {
        let ghi_values = aggregate::numeric_values(df, "ghi");
        let ghi_summary = ColumnSummary::from_values(&ghi_values);

        let ghi_histogram = aggregate::bucketed_distribution(df, "ghi", HISTOGRAM_BINS);
        if ghi_histogram.is_empty() {
            warn!(country, "ghi column absent or empty, histogram skipped");
        }

        let country_means = match aggregate::mean_ghi_by_country(df) {
            Ok(means) => frame_to_bins(&means, COUNTRY_COL, "ghi"),
            Err(_) => Vec::new(),
        };

        let variable_pies: Vec<(String, Distribution, bool)> = FILTER_COLUMNS
            .par_iter()
            .enumerate()
            .map(|(i, (column, label))| {
                let dist = aggregate::bucketed_distribution(df, column, DEFAULT_BIN_COUNT);
                (label.to_string(), dist, i % 2 == 0)
            })
            .collect();

        let scatters = SCATTER_COLUMNS
            .iter()
            .map(|(column, label)| {
                let pairs = aggregate::xy_pairs(df, column, "ghi");
                let fit = linear_fit(&pairs);
                (label.to_string(), pairs, fit)
            })
            .collect();

        Self {
            country: country.to_string(),
            record_count: df.height(),
            ghi_summary,
            top_table: aggregate::top_regions_table(df),
            ghi_histogram,
            country_means,
            wind_buckets: aggregate::wind_bucket_ghi(df),
            variable_pies,
            scatters,
            preview: df.head(Some(PREVIEW_ROWS)),
        }
    }
}

/// Convert a two-column aggregation frame into labelled bins, skipping rows
/// with a null value.
fn frame_to_bins(df: &DataFrame, label_col: &str, value_col: &str) -> Vec<Bin> {
    let Ok(labels) = df.column(label_col) else {
        return Vec::new();
    };
    let values = match df
        .column(value_col)
        .and_then(|col| col.cast(&DataType::Float64))
    {
        Ok(values) => values,
        Err(_) => return Vec::new(),
    };
    let Ok(values) = values.f64() else {
        return Vec::new();
    };

    (0..df.height())
        .filter_map(|i| {
            let value = values.get(i)?;
            let label = labels
                .get(i)
                .map(|v| v.to_string().trim_matches('"').to_string())
                .unwrap_or_default();
            Some(Bin { label, value })
        })
        .collect()
}

/// Central panel rendering the current [`DashboardView`].
#[derive(Default)]
pub struct Dashboard {
    view: Option<DashboardView>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(format!("📊 Solar Insights - {}", view.country));
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    Self::metric_card(ui, "Total Records", view.record_count.to_string());
                    let avg = if view.ghi_summary.count > 0 {
                        format!("{:.2} kWh/m²/day", view.ghi_summary.mean)
                    } else {
                        "N/A".to_string()
                    };
                    Self::metric_card(ui, "Average GHI", avg);
                    if view.ghi_summary.count > 0 {
                        Self::metric_card(
                            ui,
                            "GHI Range",
                            format!("{:.2} - {:.2}", view.ghi_summary.min, view.ghi_summary.max),
                        );
                        Self::metric_card(
                            ui,
                            "GHI Std Dev",
                            format!("{:.2}", view.ghi_summary.std),
                        );
                    }
                });
                ui.add_space(12.0);

                Self::section_label(ui, "🔥 Top 10 Wind Speeds by Avg GHI");
                match &view.top_table {
                    Ok(table) => Self::draw_top_table(ui, table),
                    Err(e) => {
                        ui.colored_label(Color32::from_rgb(220, 53, 69), format!("Error: {e}"));
                    }
                }
                ui.add_space(12.0);

                Self::section_label(ui, "📈 GHI Distribution");
                if view.ghi_histogram.is_empty() {
                    Self::absent_label(ui, "Column 'ghi' not found or empty.");
                } else {
                    ChartPlotter::draw_bar_chart(
                        ui,
                        "ghi_histogram",
                        view.ghi_histogram.bins(),
                        HISTOGRAM_COLOR,
                    );
                }
                ui.add_space(12.0);

                Self::section_label(ui, "🏙 Average GHI by Region");
                if view.country_means.is_empty() {
                    Self::absent_label(ui, "No 'country' column available for plotting.");
                } else {
                    ChartPlotter::draw_bar_chart(ui, "region_avg", &view.country_means, BAR_COLOR);
                }
                ui.add_space(12.0);

                Self::section_label(ui, "🌪 Wind Speed Bucket Area Chart (GHI Contribution)");
                if view.wind_buckets.is_empty() {
                    Self::absent_label(ui, "Column 'ws' (wind speed) not found.");
                } else {
                    ChartPlotter::draw_area_chart(
                        ui,
                        "wind_buckets",
                        view.wind_buckets.bins(),
                        AREA_COLOR,
                    );
                }
                ui.add_space(12.0);

                Self::section_label(ui, "🥧 Variable Distributions");
                for row in view.variable_pies.chunks(2) {
                    ui.horizontal(|ui| {
                        for (label, dist, donut) in row {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(label).size(13.0).strong());
                                if dist.is_empty() {
                                    Self::absent_label(ui, "Column not found or empty.");
                                } else {
                                    ChartPlotter::draw_pie_chart(ui, dist.bins(), *donut);
                                }
                            });
                            ui.add_space(20.0);
                        }
                    });
                    ui.add_space(10.0);
                }

                for (label, points, fit) in &view.scatters {
                    Self::section_label(ui, &format!("📉 {} vs GHI", label));
                    if points.is_empty() {
                        Self::absent_label(ui, "Required columns not found or data empty.");
                    } else {
                        ChartPlotter::draw_scatter_chart(
                            ui,
                            &format!("scatter_{label}"),
                            points,
                            *fit,
                            label,
                            "GHI",
                        );
                    }
                    ui.add_space(12.0);
                }

                egui::CollapsingHeader::new("🔍 Raw Data Preview")
                    .default_open(false)
                    .show(ui, |ui| {
                        Self::draw_preview(ui, &view.preview);
                    });
                ui.add_space(20.0);
            });
    }

    fn section_label(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(15.0).strong());
        ui.add_space(4.0);
    }

    fn absent_label(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(12.0).color(Color32::GRAY));
    }

    fn metric_card(ui: &mut egui::Ui, title: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(6.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(11.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(18.0).strong());
                });
            });
    }

    fn draw_top_table(ui: &mut egui::Ui, table: &DataFrame) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("top_wind_speeds")
                    .striped(true)
                    .min_col_width(120.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Wind Speed (m/s)").strong().size(12.0));
                        ui.label(RichText::new("Avg GHI (kWh/m²/day)").strong().size(12.0));
                        ui.end_row();

                        for i in 0..table.height() {
                            ui.label(Self::numeric_cell(table, "ws", i));
                            ui.label(Self::numeric_cell(table, "ghi", i));
                            ui.end_row();
                        }
                    });
            });
    }

    fn numeric_cell(df: &DataFrame, column: &str, idx: usize) -> String {
        df.column(column)
            .ok()
            .and_then(|col| col.cast(&DataType::Float64).ok())
            .and_then(|col| col.f64().ok().and_then(|ca| ca.get(idx)))
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".to_string())
    }

    fn draw_preview(ui: &mut egui::Ui, df: &DataFrame) {
        ScrollArea::horizontal().show(ui, |ui| {
            egui::Grid::new("raw_preview")
                .striped(true)
                .min_col_width(70.0)
                .spacing([10.0, 3.0])
                .show(ui, |ui| {
                    for name in df.get_column_names() {
                        ui.label(RichText::new(name.to_string()).strong().size(11.0));
                    }
                    ui.end_row();

                    for i in 0..df.height() {
                        for col in df.get_columns() {
                            let cell = col
                                .get(i)
                                .map(|v| v.to_string().trim_matches('"').to_string())
                                .unwrap_or_default();
                            ui.label(RichText::new(cell).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });
    }
}
