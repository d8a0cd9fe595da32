//! Report Viewer Widget
//! Central scrollable panel: one card per analysis with hypotheses,
//! the z-test verdict and a bar chart.

use crate::charts::ChartPlotter;
use crate::report::{AnalysisOutcome, AnalysisSection, ReportModel, TEST_INTRO};
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 260.0;

const REJECT_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const KEEP_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

#[derive(Default)]
pub struct ReportViewer {
    pub report: Option<ReportModel>,
    pub error: Option<String>,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_report(&mut self, report: ReportModel) {
        self.report = Some(report);
        self.error = None;
    }

    /// Replace the report with a load failure message.
    pub fn set_error(&mut self, error: String) {
        self.report = None;
        self.error = Some(error);
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        if let Some(error) = &self.error {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!("This file cannot be used: {}", error))
                        .size(16.0)
                        .color(REJECT_COLOR),
                );
            });
            return;
        }

        let Some(report) = &self.report else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Sick-day absence analysis");
                ui.add_space(CARD_SPACING);
                for section in &report.sections {
                    Self::draw_section_card(ui, section);
                    ui.add_space(CARD_SPACING);
                }
            });
    }

    fn draw_section_card(ui: &mut egui::Ui, section: &AnalysisSection) {
        let border_color = match &section.outcome {
            AnalysisOutcome::Completed(f) if f.reject_null => REJECT_COLOR,
            AnalysisOutcome::Completed(_) => KEEP_COLOR,
            AnalysisOutcome::Failed { .. } => Color32::GRAY,
        };

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, border_color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());

                ui.label(
                    RichText::new(&section.title)
                        .size(18.0)
                        .strong()
                        .color(border_color),
                );
                ui.add_space(6.0);
                ui.label(section.hypothesis.as_str());
                ui.label(format!("• {}", section.null_hypothesis));
                ui.label(format!("• {}", section.alternative_hypothesis));
                ui.add_space(6.0);

                match &section.outcome {
                    AnalysisOutcome::Completed(findings) => {
                        ui.label(TEST_INTRO);
                        ui.label(RichText::new(&findings.p_value_text).strong());
                        ui.label(RichText::new(&findings.interpretation).color(border_color));
                    }
                    AnalysisOutcome::Failed { message } => {
                        ui.label(
                            RichText::new(format!("Analysis failed: {}", message))
                                .color(REJECT_COLOR),
                        );
                    }
                }

                if let Some(chart) = &section.chart {
                    ui.add_space(8.0);
                    ui.label(RichText::new(&chart.title).size(14.0).strong());
                    ChartPlotter::draw_bar_chart(
                        ui,
                        section.kind.axis_label(),
                        chart,
                        CHART_HEIGHT,
                    );
                }
            });
    }
}
