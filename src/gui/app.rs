//! Sick-Day Analysis Main Application
//! Main window with control panel and report viewer. Every threshold change
//! or file pick recomputes the whole report synchronously.

use crate::charts::StaticChartRenderer;
use crate::config::Thresholds;
use crate::data::{DataLoader, Dataset, DatasetCache, LoadError, DEFAULT_TTL};
use crate::gui::{ControlPanel, ControlPanelAction, ReportViewer};
use crate::report::compute_report;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Startup settings, taken from the command line.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub data_path: PathBuf,
    pub loader: DataLoader,
    pub thresholds: Thresholds,
}

/// Uploaded file replacing the default dataset for the session.
struct Upload {
    path: PathBuf,
    dataset: Arc<Dataset>,
}

/// Main application window.
pub struct SickDayApp {
    loader: DataLoader,
    cache: DatasetCache,
    default_path: PathBuf,
    upload: Option<Upload>,
    control_panel: ControlPanel,
    report_viewer: ReportViewer,
}

impl SickDayApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        let mut app = Self {
            loader: settings.loader,
            cache: DatasetCache::new(settings.loader, DEFAULT_TTL),
            default_path: settings.data_path,
            upload: None,
            control_panel: ControlPanel::new(settings.thresholds),
            report_viewer: ReportViewer::new(),
        };
        app.recompute();
        app
    }

    /// Uploaded dataset if any, otherwise the (cached) default file.
    fn current_dataset(&mut self) -> Result<(String, Arc<Dataset>), LoadError> {
        if let Some(upload) = &self.upload {
            return Ok((Self::file_label(&upload.path), Arc::clone(&upload.dataset)));
        }
        let dataset = self.cache.get_or_load(&self.default_path)?;
        Ok((
            format!("{} (default)", Self::file_label(&self.default_path)),
            dataset,
        ))
    }

    fn recompute(&mut self) {
        match self.current_dataset() {
            Ok((label, dataset)) => {
                let report = compute_report(&dataset, &self.control_panel.thresholds);
                self.control_panel.source_label = label;
                self.control_panel.record_count = dataset.len();
                self.control_panel.export_enabled = true;
                self.control_panel.set_status("Report updated");
                self.report_viewer.set_report(report);
            }
            Err(e) => {
                error!(error = %e, "Dataset unavailable");
                self.control_panel.source_label = "No file loaded".to_string();
                self.control_panel.record_count = 0;
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(format!("Error: {}", e));
                self.report_viewer.set_error(e.to_string());
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match self.loader.load_file(&path) {
            Ok(dataset) => {
                info!(path = %path.display(), records = dataset.len(), "Uploaded dataset");
                self.upload = Some(Upload {
                    path,
                    dataset: Arc::new(dataset),
                });
                self.control_panel.using_upload = true;
                self.recompute();
            }
            Err(e) => {
                // A broken upload leaves the current dataset in place
                error!(path = %path.display(), error = %e, "Upload rejected");
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Drop the upload and re-read the default file from disk.
    fn handle_use_default(&mut self) {
        self.upload = None;
        self.cache.invalidate();
        self.control_panel.using_upload = false;
        self.recompute();
    }

    /// Save both charts as PNG files into a user-chosen folder
    fn handle_export_charts(&mut self) {
        let Some(report) = &self.report_viewer.report else {
            self.control_panel.set_status("No charts to export");
            return;
        };
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        match StaticChartRenderer::export_report_charts(report, &dir) {
            Ok(paths) => self
                .control_panel
                .set_status(format!("Saved {} charts to {}", paths.len(), dir.display())),
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }

    fn file_label(path: &std::path::Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }
}

impl eframe::App for SickDayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::UseDefault => self.handle_use_default(),
                        ControlPanelAction::ThresholdsChanged => self.recompute(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.report_viewer.show(ui);
        });
    }
}
