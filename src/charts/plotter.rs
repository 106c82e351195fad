//! Chart Plotter Module
//! Interactive dashboard visualizations built on egui_plot, plus a
//! painter-drawn pie/donut widget (egui_plot has no pie primitive).

use crate::data::aggregate::Bin;
use egui::{Color32, RichText, Sense};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

/// Primary accent colors lifted from the dashboard theme.
pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(0, 204, 150);
pub const AREA_COLOR: Color32 = Color32::from_rgb(99, 110, 250);
pub const BAR_COLOR: Color32 = Color32::from_rgb(243, 156, 18);
pub const SCATTER_COLOR: Color32 = Color32::from_rgb(76, 120, 168);

/// Slice palette for the pie charts.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(244, 91, 105),  // Red
    Color32::from_rgb(46, 216, 182),  // Teal
    Color32::from_rgb(76, 120, 168),  // Blue
    Color32::from_rgb(160, 116, 196), // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

const CHART_HEIGHT: f32 = 260.0;
const PIE_DIAMETER: f32 = 170.0;

/// Creates the dashboard visualizations.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a vertical bar chart over labelled bins (histograms and the
    /// per-country averages share this widget).
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, bins: &[Bin], color: Color32) {
        let labels: Vec<String> = bins.iter().map(|b| b.label.clone()).collect();

        let bars: Vec<Bar> = bins
            .iter()
            .enumerate()
            .map(|(i, bin)| {
                Bar::new(i as f64, bin.value)
                    .width(0.85)
                    .name(&bin.label)
                    .fill(color.gamma_multiply(0.8))
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < f64::EPSILON && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color));
            });
    }

    /// Draw an area chart over labelled bins (line filled down to zero).
    pub fn draw_area_chart(ui: &mut egui::Ui, id: &str, bins: &[Bin], color: Color32) {
        let labels: Vec<String> = bins.iter().map(|b| b.label.clone()).collect();
        let points: PlotPoints = bins
            .iter()
            .enumerate()
            .map(|(i, bin)| [i as f64, bin.value])
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < f64::EPSILON && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(points).color(color).width(2.0).fill(0.0));
            });
    }

    /// Draw a scatter plot with an optional least-squares trendline.
    pub fn draw_scatter_chart(
        ui: &mut egui::Ui,
        id: &str,
        points: &[[f64; 2]],
        fit: Option<(f64, f64)>,
        x_label: &str,
        y_label: &str,
    ) {
        let plot_points: PlotPoints = points.iter().copied().collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(plot_points)
                        .radius(2.0)
                        .color(SCATTER_COLOR.gamma_multiply(0.7)),
                );

                if let Some((slope, intercept)) = fit {
                    let x_min = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
                    let x_max = points
                        .iter()
                        .map(|p| p[0])
                        .fold(f64::NEG_INFINITY, f64::max);
                    let line: PlotPoints = [x_min, x_max]
                        .iter()
                        .map(|&x| [x, slope * x + intercept])
                        .collect();
                    plot_ui.line(
                        Line::new(line)
                            .color(Color32::from_rgb(220, 53, 69))
                            .width(1.5)
                            .name("Trend"),
                    );
                }
            });
    }

    /// Draw a pie (or donut) chart with a legend of labels and percentages.
    /// Slices are fanned out of small triangles so reflex angles render fine.
    pub fn draw_pie_chart(ui: &mut egui::Ui, bins: &[Bin], donut: bool) {
        let total: f64 = bins.iter().map(|b| b.value).sum();
        if total <= 0.0 {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(PIE_DIAMETER, PIE_DIAMETER), Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0 - 4.0;

            // Start at 12 o'clock, sweep clockwise.
            let mut angle = -std::f64::consts::FRAC_PI_2;
            for (i, bin) in bins.iter().enumerate() {
                let sweep = bin.value / total * std::f64::consts::TAU;
                let color = PALETTE[i % PALETTE.len()];
                let steps = ((sweep / 0.05).ceil() as usize).max(1);

                for s in 0..steps {
                    let a0 = angle + sweep * s as f64 / steps as f64;
                    let a1 = angle + sweep * (s + 1) as f64 / steps as f64;
                    let p0 = center + radius * egui::vec2(a0.cos() as f32, a0.sin() as f32);
                    let p1 = center + radius * egui::vec2(a1.cos() as f32, a1.sin() as f32);
                    painter.add(egui::Shape::convex_polygon(
                        vec![center, p0, p1],
                        color,
                        egui::Stroke::NONE,
                    ));
                }
                angle += sweep;
            }

            if donut {
                painter.circle_filled(center, radius * 0.45, ui.visuals().panel_fill);
            }

            ui.add_space(8.0);

            ui.vertical(|ui| {
                for (i, bin) in bins.iter().enumerate() {
                    let color = PALETTE[i % PALETTE.len()];
                    ui.horizontal(|ui| {
                        let (swatch, _) =
                            ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                        ui.painter().rect_filled(swatch, 2.0, color);
                        ui.label(
                            RichText::new(format!(
                                "{} ({:.1}%)",
                                bin.label,
                                bin.value / total * 100.0
                            ))
                            .size(11.0),
                        );
                    });
                }
            });
        });
    }
}
