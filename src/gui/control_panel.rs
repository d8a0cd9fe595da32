//! Control Panel Widget
//! Left side panel with data source selection and the three threshold sliders.

use crate::config::{Thresholds, AGE_RANGE, ALPHA_RANGE, WORK_DAYS_RANGE};
use egui::{Color32, RichText};

/// Left side control panel.
pub struct ControlPanel {
    pub thresholds: Thresholds,
    pub source_label: String,
    pub using_upload: bool,
    pub record_count: usize,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds: thresholds.clamped_to_sliders(),
            source_label: "No file loaded".to_string(),
            using_upload: false,
            record_count: 0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Sick-Day Analysis")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Proportion z-tests")
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
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&self.source_label).size(12.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Upload CSV").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
                ui.label(
                    RichText::new(format!("{} employees", self.record_count))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                if self.using_upload && ui.small_button("Use default data").clicked() {
                    action = ControlPanelAction::UseDefault;
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Thresholds Section =====
        ui.label(RichText::new("⚙️ Thresholds").size(14.0).strong());
        ui.add_space(8.0);

        let mut changed = false;
        ui.label("Sick-day threshold (work_days)");
        changed |= ui
            .add(egui::Slider::new(
                &mut self.thresholds.work_days,
                WORK_DAYS_RANGE,
            ))
            .changed();
        ui.add_space(5.0);

        ui.label("Age threshold (age)");
        changed |= ui
            .add(egui::Slider::new(&mut self.thresholds.age, AGE_RANGE))
            .changed();
        ui.add_space(5.0);

        ui.label("Significance level (alpha)");
        changed |= ui
            .add(egui::Slider::new(&mut self.thresholds.alpha, ALPHA_RANGE).step_by(0.01))
            .changed();

        if changed {
            action = ControlPanelAction::ThresholdsChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Save Charts").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
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

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    UseDefault,
    ThresholdsChanged,
    ExportCharts,
}
