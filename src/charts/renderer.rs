//! Static Chart Renderer
//! Renders the per-group bar charts to PNG with plotters, for saving
//! charts next to the text report.
//!
//! Layout: title on top, one bar per group, x-axis = group label,
//! y-axis = share of the group exceeding the sick-day threshold.

use crate::charts::ChartPlotter;
use crate::report::{BarChartData, ReportModel};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 480;

// Same hues as the interactive palette
const BAR_COLORS: [RGBColor; 4] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart has no bars to draw")]
    Empty,
    #[error("Chart drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a bar chart into PNG bytes.
    pub fn render_png(chart: &BarChartData, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if chart.bars.is_empty() {
            return Err(RenderError::Empty);
        }

        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            Self::draw(&root, chart).map_err(|e| RenderError::Draw(e.to_string()))?;
            root.present()
                .map_err(|e| RenderError::Draw(e.to_string()))?;
        }

        let img = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| RenderError::Draw("pixel buffer does not match image size".into()))?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Write one PNG per section that has chart data. Returns the written paths.
    pub fn export_report_charts(
        report: &ReportModel,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for section in &report.sections {
            let Some(chart) = &section.chart else {
                continue;
            };
            let png = Self::render_png(chart, DEFAULT_WIDTH, DEFAULT_HEIGHT)?;
            let path = dir.join(Self::file_name(section.kind.axis_label()));
            std::fs::write(&path, png).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Chart written");
            written.push(path);
        }
        Ok(written)
    }

    pub fn file_name(axis_label: &str) -> String {
        format!("{}_chart.png", axis_label)
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &BarChartData,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
        let y_max = ChartPlotter::y_upper_bound(chart);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d((0..labels.len()).into_segmented(), 0f64..y_max)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&|v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|v: &f64| format!("{:.2}", v))
            .draw()?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let color = BAR_COLORS[i % BAR_COLORS.len()];
            let mut rect = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), bar.rate),
                ],
                color.filled(),
            );
            rect.set_margin(0, 0, 20, 20);
            rect
        }))?;

        Ok(())
    }
}
