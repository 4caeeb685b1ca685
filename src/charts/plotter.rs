//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::{heat_rgb, PALETTE_RGB};
use crate::report::{DensityComparison, GroupAnalysis};
use crate::stats::{CorrelationMatrix, DescriptiveStats, GroupCount, Histogram};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

/// Bar colour for histograms and count plots
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// Color for the nth series.
pub fn series_color(index: usize) -> Color32 {
    let (r, g, b) = PALETTE_RGB[index % PALETTE_RGB.len()];
    Color32::from_rgb(r, g, b)
}

/// Creates the EDA charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Histogram as touching bars, one per bin.
    pub fn draw_histogram(ui: &mut egui::Ui, hist: &Histogram, height: f32) {
        let width = hist.bin_width();
        let bars: Vec<Bar> = hist
            .bin_centers()
            .into_iter()
            .zip(hist.counts.iter())
            .map(|(x, &count)| {
                Bar::new(x, count as f64)
                    .width(width)
                    .stroke(egui::Stroke::new(0.5, Color32::BLACK))
            })
            .collect();

        Plot::new(format!("hist_{}", hist.column))
            .height(height)
            .allow_scroll(false)
            .x_axis_label(hist.column.as_str())
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name(&hist.column));
            });
    }

    fn category_formatter(labels: Vec<String>) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let idx = mark.value.round();
            if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        }
    }

    /// Count plot: one bar per category.
    pub fn draw_count_chart(ui: &mut egui::Ui, id: &str, counts: &[GroupCount], height: f32) {
        let labels: Vec<String> = counts.iter().map(|c| c.group.clone()).collect();
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new(i as f64, c.count as f64)
                    .width(0.8)
                    .fill(series_color(i))
                    .name(&c.group)
            })
            .collect();

        Plot::new(format!("count_{id}"))
            .height(height)
            .allow_scroll(false)
            .y_axis_label("count")
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    /// Box plot of one score per category, outliers drawn as points.
    pub fn draw_box_chart(ui: &mut egui::Ui, analysis: &GroupAnalysis, height: f32) {
        let labels: Vec<String> = analysis.boxes.iter().map(|b| b.group.clone()).collect();

        Plot::new(format!("box_{}", analysis.column))
            .height(height)
            .allow_scroll(false)
            .y_axis_label(analysis.value_column.as_str())
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, stats) in analysis.boxes.iter().enumerate() {
                    let color = series_color(i);
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(
                            stats.whisker_low,
                            stats.q1,
                            stats.median,
                            stats.q3,
                            stats.whisker_high,
                        ),
                    )
                    .box_width(0.6)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&stats.group));

                    if !stats.outliers.is_empty() {
                        let points: PlotPoints =
                            stats.outliers.iter().map(|&y| [i as f64, y]).collect();
                        plot_ui.points(Points::new(points).radius(2.5).color(color));
                    }
                }
            });
    }

    /// Overlaid density curves for one subset.
    pub fn draw_density_chart(ui: &mut egui::Ui, comparison: &DensityComparison, height: f32) {
        Plot::new(format!("kde_{}", comparison.subset))
            .height(height)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("score")
            .y_axis_label("Density")
            .show(ui, |plot_ui| {
                for (i, curve) in comparison.curves.iter().enumerate() {
                    let points: PlotPoints = curve.points.iter().map(|&(x, y)| [x, y]).collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(series_color(i))
                            .width(2.0)
                            .name(&curve.label),
                    );
                }
            });
    }

    /// Annotated correlation heatmap as a coloured grid.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        egui::Grid::new(ui.make_persistent_id(format!("heatmap_{}", matrix.label)))
            .spacing([2.0, 2.0])
            .min_col_width(58.0)
            .show(ui, |ui| {
                ui.label("");
                for name in &matrix.columns {
                    ui.label(RichText::new(name).size(10.0).strong());
                }
                ui.end_row();

                for (i, name) in matrix.columns.iter().enumerate() {
                    ui.label(RichText::new(name).size(10.0).strong());
                    for &value in &matrix.values[i] {
                        let (r, g, b) = heat_rgb(value);
                        let text = if value.is_nan() {
                            "nan".to_string()
                        } else {
                            format!("{:.2}", value)
                        };
                        let text_color = if value.abs() > 0.6 {
                            Color32::WHITE
                        } else {
                            Color32::BLACK
                        };
                        ui.label(
                            RichText::new(format!(" {text} "))
                                .size(11.0)
                                .monospace()
                                .color(text_color)
                                .background_color(Color32::from_rgb(r, g, b)),
                        );
                    }
                    ui.end_row();
                }
            });
    }

    /// Draw descriptive statistics table
    pub fn draw_stats_table(ui: &mut egui::Ui, stats: &DescriptiveStats) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("describe_{}", stats.column)))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for label in DescriptiveStats::LABELS {
                            ui.label(RichText::new(label).strong().size(11.0));
                        }
                        ui.end_row();

                        for value in stats.values() {
                            ui.label(RichText::new(format!("{:.3}", value)).size(11.0));
                        }
                        ui.end_row();
                    });
            });
    }
}
