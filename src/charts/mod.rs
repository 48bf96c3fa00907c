//! Charts module - Interactive and static chart rendering

mod plotter;
mod renderer;
mod series;

pub use plotter::ChartPlotter;
pub use renderer::{StaticChartRenderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use series::{ScatterSeries, XAxis};
