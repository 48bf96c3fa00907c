//! Static Chart Renderer
//! Writes the scatter and bar charts to PNG files with plotters, using the
//! same series and colours as the interactive views.

use crate::charts::series::{palette_rgb, scatter_bounds, ScatterSeries, XAxis};
use crate::data::{columns, AggregateRow};
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 800;

const BAR_TITLE: &str = "Car Ownership Percentage by Household Type";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn rgb(index: usize) -> RGBColor {
    let (r, g, b) = palette_rgb(index);
    RGBColor(r, g, b)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a scatter chart, one colour per region, with a legend.
    pub fn render_scatter_png(
        path: &Path,
        axis: XAxis,
        series: &[ScatterSeries],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let ((x0, x1), (y0, y1)) = scatter_bounds(series);
        let mut chart = ChartBuilder::on(&root)
            .caption(axis.title(), ("sans-serif", 26))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(axis.column())
            .y_desc(columns::HASCAR_PERC)
            .draw()
            .map_err(draw_err)?;

        for s in series {
            let color = rgb(s.color_index);
            chart
                .draw_series(
                    s.points
                        .iter()
                        .map(move |p| Circle::new((p.x, p.y), 5, color.mix(0.8).filled())),
                )
                .map_err(draw_err)?
                .label(s.region.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        }

        if !series.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        log::info!("Saved chart to {}", path.display());
        Ok(())
    }

    /// Render the household type bar chart. Categories without a mean get no bar.
    pub fn render_bar_png(
        path: &Path,
        aggregates: &[AggregateRow],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let labels: Vec<&str> = aggregates.iter().map(|a| a.household_type_en.as_str()).collect();
        let y_max = bar_ceiling(aggregates);
        let n = labels.len().max(1) as i32;

        let mut chart = ChartBuilder::on(&root)
            .caption(BAR_TITLE, ("sans-serif", 26))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), 0.0..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(columns::HOUSEHOLD_TYPE_EN)
            .y_desc(columns::HASCAR_PERC)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels
                    .get(*i as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        let fill = rgb(0);
        chart
            .draw_series(aggregates.iter().enumerate().filter_map(|(i, a)| {
                let mean = a.mean_hascar_perc?;
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), mean)],
                    fill.filled(),
                );
                bar.set_margin(0, 0, 10, 10);
                Some(bar)
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        log::info!("Saved chart to {}", path.display());
        Ok(())
    }
}

/// Upper y bound: the largest mean plus headroom, at least 100 for percentages.
fn bar_ceiling(aggregates: &[AggregateRow]) -> f64 {
    let max = aggregates
        .iter()
        .filter_map(|a| a.mean_hascar_perc)
        .fold(0.0_f64, f64::max);
    (max * 1.1).max(100.0)
}
