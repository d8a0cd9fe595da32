//! Chart Plotter Module
//! Interactive bar charts of outcome rate per group using egui_plot.

use crate::report::BarChartData;
use egui::Color32;
use egui_plot::{Bar, BarChart, Plot};

/// Color palette for groups
pub const PALETTE: [Color32; 4] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
];

pub struct ChartPlotter;

impl ChartPlotter {
    pub fn group_color(group_index: usize) -> Color32 {
        PALETTE[group_index % PALETTE.len()]
    }

    /// Upper bound of the y axis: headroom above the tallest bar, never past 1.0.
    pub fn y_upper_bound(chart: &BarChartData) -> f64 {
        let max_rate = chart.bars.iter().map(|b| b.rate).fold(0.0_f64, f64::max);
        (max_rate * 1.15).clamp(0.05, 1.0)
    }

    /// Draw one bar per group. X-axis: group label, Y-axis: share exceeding the threshold.
    pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, chart: &BarChartData, height: f32) {
        let x_labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
        let y_max = Self::y_upper_bound(chart);

        let bars: Vec<Bar> = chart
            .bars
            .iter()
            .enumerate()
            .map(|(i, group)| {
                Bar::new(i as f64, group.rate)
                    .name(format!("{} ({}/{})", group.label, group.successes, group.nobs))
                    .width(0.6)
                    .fill(Self::group_color(i))
            })
            .collect();

        Plot::new(format!("bar_chart_{}", id))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-0.5)
            .include_x(chart.bars.len() as f64 - 0.5)
            .include_y(0.0)
            .include_y(y_max)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(chart.y_label.clone()));
            });
    }
}
