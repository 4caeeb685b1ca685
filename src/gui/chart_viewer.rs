//! Chart Viewer Widget
//! Right side scrollable panel showing the charts of the selected section.

use crate::charts::ChartPlotter;
use crate::gui::{outlier_note, ReportSection};
use crate::report::{EdaReport, GroupAnalysis};
use crate::stats::Histogram;
use egui::{Color32, RichText, ScrollArea};

/// Card configuration
const CHART_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 320.0;
const GRID_CHART_HEIGHT: f32 = 200.0;
const GRID_COLUMNS: usize = 2;

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer {
    pub report: Option<EdaReport>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_report(&mut self, report: EdaReport) {
        self.report = Some(report);
    }

    /// Draw the charts of one section
    pub fn show(&self, ui: &mut egui::Ui, section: ReportSection) {
        let Some(report) = &self.report else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(section.title()).size(20.0).strong());
                ui.add_space(CHART_SPACING);

                match section {
                    ReportSection::Overview => Self::show_overview(ui, report),
                    ReportSection::ScoreDistribution => {
                        Self::card(ui, "Total Cup Points", |ui| {
                            ChartPlotter::draw_histogram(ui, &report.score_histogram, CHART_HEIGHT);
                            ui.add_space(8.0);
                            ChartPlotter::draw_stats_table(ui, &report.score_stats);
                        });
                    }
                    ReportSection::NumericHistograms => {
                        Self::show_histogram_grid(ui, &report.histograms)
                    }
                    ReportSection::SensoryCorrelation => {
                        Self::card(ui, &report.correlation.label, |ui| {
                            ChartPlotter::draw_heatmap(ui, &report.correlation);
                        });
                    }
                    ReportSection::Origins => Self::show_groups(ui, &report.by_country),
                    ReportSection::ProcessingMethods => {
                        Self::show_groups(ui, &report.by_processing)
                    }
                    ReportSection::ProcessingCorrelations => {
                        for matrix in &report.subset_correlations {
                            Self::card(ui, &matrix.label, |ui| {
                                ChartPlotter::draw_heatmap(ui, matrix);
                            });
                            ui.add_space(CHART_SPACING);
                        }
                    }
                    ReportSection::DensityComparison => {
                        for comparison in &report.densities {
                            let title = format!(
                                "{} Process ({} reviews)",
                                comparison.subset, comparison.rows
                            );
                            Self::card(ui, &title, |ui| {
                                ChartPlotter::draw_density_chart(ui, comparison, CHART_HEIGHT);
                            });
                            ui.add_space(CHART_SPACING);
                        }
                    }
                }
            });
    }

    /// Framed card with a title
    fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(120, 120, 120)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(16.0).strong());
                ui.add_space(8.0);
                add_contents(ui);
            });
    }

    fn show_overview(ui: &mut egui::Ui, report: &EdaReport) {
        Self::card(ui, "Dataset", |ui| {
            ui.label(format!("Source: {}", report.source));
            ui.label(format!("{} rows, {} columns", report.rows, report.columns.len()));
            ui.label(format!("{} countries of origin", report.countries.len()));
            if let Some(note) = outlier_note(&report.suspect_rows) {
                ui.label(note);
            }
        });
        ui.add_space(CHART_SPACING);

        Self::card(ui, "Numeric columns", |ui| {
            egui::Grid::new("numeric_summary")
                .striped(true)
                .min_col_width(70.0)
                .show(ui, |ui| {
                    for header in ["column", "nulls", "mean", "min", "max"] {
                        ui.label(RichText::new(header).strong().size(11.0));
                    }
                    ui.end_row();

                    let fmt = |v: Option<f64>| v.map(|x| format!("{:.3}", x)).unwrap_or_else(|| "-".to_string());
                    for s in &report.summary.numeric {
                        ui.label(RichText::new(&s.column).size(11.0));
                        ui.label(RichText::new(s.null_count.to_string()).size(11.0));
                        ui.label(RichText::new(fmt(s.mean)).size(11.0));
                        ui.label(RichText::new(fmt(s.min)).size(11.0));
                        ui.label(RichText::new(fmt(s.max)).size(11.0));
                        ui.end_row();
                    }
                });
        });
        ui.add_space(CHART_SPACING);

        Self::card(ui, "Missing values", |ui| {
            let with_nulls = report.summary.columns_with_nulls();
            if with_nulls.is_empty() {
                ui.label("No missing values");
            }
            for (column, count) in with_nulls {
                ui.label(format!("{column}: {count}"));
            }
        });
    }

    fn show_histogram_grid(ui: &mut egui::Ui, histograms: &[Histogram]) {
        let width = (ui.available_width() - CHART_SPACING) / GRID_COLUMNS as f32;
        for row in histograms.chunks(GRID_COLUMNS) {
            ui.horizontal(|ui| {
                for hist in row {
                    ui.vertical(|ui| {
                        ui.set_width(width);
                        ui.label(RichText::new(&hist.column).size(13.0).strong());
                        ChartPlotter::draw_histogram(ui, hist, GRID_CHART_HEIGHT);
                    });
                }
            });
            ui.add_space(CHART_SPACING);
        }
    }

    fn show_groups(ui: &mut egui::Ui, analysis: &GroupAnalysis) {
        let title = match analysis.largest_group() {
            Some(largest) => format!(
                "Reviews by {} (largest: {}, {})",
                analysis.column, largest.group, largest.count
            ),
            None => format!("Reviews by {}", analysis.column),
        };
        Self::card(ui, &title, |ui| {
            ChartPlotter::draw_count_chart(ui, &analysis.column, &analysis.counts, CHART_HEIGHT);
        });
        ui.add_space(CHART_SPACING);

        let title = format!("{} by {}", analysis.value_column, analysis.column);
        Self::card(ui, &title, |ui| {
            ChartPlotter::draw_box_chart(ui, analysis, CHART_HEIGHT);
        });
    }
}
