//! Coffee EDA Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::EdaConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::report::EdaReport;
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{error, info};

/// Main application window.
pub struct EdaApp {
    config: EdaConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl EdaApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        csv_path: PathBuf,
        export_dir: PathBuf,
        config: EdaConfig,
        report: EdaReport,
    ) -> Self {
        let mut control_panel = ControlPanel::new(csv_path, export_dir);
        control_panel.update_report(&report);
        control_panel.set_status(format!("Loaded {} rows", report.rows));

        let mut chart_viewer = ChartViewer::new();
        chart_viewer.set_report(report);

        Self {
            config,
            control_panel,
            chart_viewer,
        }
    }

    /// Re-run the pipeline on the same file
    fn handle_reload(&mut self) {
        let path = self.control_panel.csv_path.clone();
        match EdaReport::from_csv(&path, &self.config) {
            Ok((_, report)) => {
                info!("Reloaded {}", path.display());
                self.control_panel.update_report(&report);
                self.control_panel
                    .set_status(format!("Loaded {} rows", report.rows));
                self.chart_viewer.set_report(report);
            }
            Err(e) => {
                error!("Reload failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Write every chart as PNG
    fn handle_export_png(&mut self) {
        let Some(report) = &self.chart_viewer.report else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let dir = self.control_panel.export_dir.clone();
        match StaticChartRenderer::export_report(report, &dir) {
            Ok(written) => self.control_panel.set_status(format!(
                "Exported {} charts to {}",
                written.len(),
                dir.display()
            )),
            Err(e) => {
                error!("Export failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for EdaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::SectionChanged | ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.control_panel.selected);
        });
    }
}
