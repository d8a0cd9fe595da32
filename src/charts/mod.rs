//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, PALETTE};
pub use renderer::{RenderError, StaticChartRenderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
