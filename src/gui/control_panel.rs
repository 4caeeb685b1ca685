//! Control Panel Widget
//! Left side panel with dataset info, section selection and actions.

use crate::report::EdaReport;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Report sections, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportSection {
    #[default]
    Overview,
    ScoreDistribution,
    NumericHistograms,
    SensoryCorrelation,
    Origins,
    ProcessingMethods,
    ProcessingCorrelations,
    DensityComparison,
}

impl ReportSection {
    pub const ALL: [ReportSection; 8] = [
        ReportSection::Overview,
        ReportSection::ScoreDistribution,
        ReportSection::NumericHistograms,
        ReportSection::SensoryCorrelation,
        ReportSection::Origins,
        ReportSection::ProcessingMethods,
        ReportSection::ProcessingCorrelations,
        ReportSection::DensityComparison,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::Overview => "Overview",
            ReportSection::ScoreDistribution => "Total Cup Points",
            ReportSection::NumericHistograms => "Numeric Distributions",
            ReportSection::SensoryCorrelation => "Sensory Correlation",
            ReportSection::Origins => "Countries of Origin",
            ReportSection::ProcessingMethods => "Processing Methods",
            ReportSection::ProcessingCorrelations => "Correlation by Process",
            ReportSection::DensityComparison => "Clean Cup vs Uniformity",
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub selected: ReportSection,
    pub csv_path: PathBuf,
    pub export_dir: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub suspect_rows: Vec<usize>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(csv_path: PathBuf, export_dir: PathBuf) -> Self {
        Self {
            selected: ReportSection::default(),
            csv_path,
            export_dir,
            rows: 0,
            columns: 0,
            suspect_rows: Vec::new(),
            status: "Ready".to_string(),
        }
    }

    /// Refresh dataset info after a (re)load
    pub fn update_report(&mut self, report: &EdaReport) {
        self.rows = report.rows;
        self.columns = report.columns.len();
        self.suspect_rows = report.suspect_rows.clone();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("☕ Coffee EDA")
                    .size(22.0)
                    .color(Color32::from_rgb(166, 123, 91)),
            );
            ui.label(
                RichText::new("CQI arabica reviews")
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
                let file_name = self
                    .csv_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| self.csv_path.display().to_string());
                ui.label(RichText::new(file_name).size(12.0));
                ui.label(
                    RichText::new(format!("{} rows, {} columns", self.rows, self.columns))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                if let Some(note) = outlier_note(&self.suspect_rows) {
                    ui.label(
                        RichText::new(note)
                            .size(11.0)
                            .color(Color32::from_rgb(243, 156, 18)),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Section Selection =====
        ui.label(RichText::new("📊 Sections").size(14.0).strong());
        ui.add_space(5.0);

        for section in ReportSection::ALL {
            if ui
                .selectable_value(&mut self.selected, section, section.title())
                .clicked()
            {
                action = ControlPanelAction::SectionChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("⟳ Reload CSV").size(14.0))
                .min_size(egui::vec2(180.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Reload;
            }

            ui.add_space(8.0);

            let export_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                .min_size(egui::vec2(180.0, 30.0));
            if ui.add(export_button).clicked() {
                action = ControlPanelAction::ExportPng;
            }
            ui.label(
                RichText::new(format!("to {}", self.export_dir.display()))
                    .size(10.0)
                    .color(Color32::GRAY),
            );
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") || self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Describes the rows that exceeded the altitude threshold before the
/// correction table ran. These are not necessarily the patched rows.
pub fn outlier_note(suspect_rows: &[usize]) -> Option<String> {
    (!suspect_rows.is_empty())
        .then(|| format!("Altitude outliers before patching: rows {:?}", suspect_rows))
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SectionChanged,
    Reload,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_have_distinct_titles() {
        let mut titles: Vec<&str> = ReportSection::ALL.iter().map(|s| s.title()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), ReportSection::ALL.len());
    }

    #[test]
    fn test_outlier_note() {
        assert_eq!(outlier_note(&[]), None);
        assert_eq!(
            outlier_note(&[543]).as_deref(),
            Some("Altitude outliers before patching: rows [543]")
        );
    }

    #[test]
    fn test_new_panel_defaults() {
        let mut panel = ControlPanel::new(PathBuf::from("arabica_data_cleaned.csv"), PathBuf::from("charts"));
        assert_eq!(panel.selected, ReportSection::Overview);
        assert_eq!(panel.rows, 0);
        panel.set_status("Loaded 1311 rows");
        assert!(panel.status.starts_with("Loaded"));
    }
}
