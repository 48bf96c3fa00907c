//! Chart Plotter Module
//! Draws the interactive table, scatter and bar views with egui_plot.

use crate::charts::series::{palette_rgb, ScatterSeries, XAxis};
use crate::data::{columns, AggregateRow, JoinedRecord};
use egui::{Color32, RichText, ScrollArea};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, Points};

const PLOT_HEIGHT: f32 = 360.0;
const TABLE_HEIGHT: f32 = 320.0;
const ROW_HEIGHT: f32 = 20.0;

pub const BAR_COLOR: Color32 = Color32::from_rgb(100, 149, 237);

/// Table columns and their widths
const TABLE_COLUMNS: [(&str, f32); 9] = [
    (columns::CITY_ID, 70.0),
    (columns::YEAR, 90.0),
    (columns::HOUSEHOLD_TYPE, 150.0),
    (columns::HOUSEHOLD_TYPE_EN, 130.0),
    (columns::HASCAR_PERC, 200.0),
    (columns::CITY_NAME, 150.0),
    (columns::REGION, 150.0),
    (columns::POP_DENSITY, 100.0),
    (columns::PROSPERITY, 110.0),
];

/// Renders the dashboard views.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn region_color(color_index: usize) -> Color32 {
        let (r, g, b) = palette_rgb(color_index);
        Color32::from_rgb(r, g, b)
    }

    /// Draw the filtered table. Only visible rows are laid out.
    pub fn draw_table(ui: &mut egui::Ui, rows: &[&JoinedRecord]) {
        ScrollArea::horizontal()
            .id_salt("table_h")
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        for (name, width) in TABLE_COLUMNS {
                            ui.add_sized(
                                [width, ROW_HEIGHT],
                                egui::Label::new(RichText::new(name).strong().size(11.0)).truncate(),
                            );
                        }
                    });
                    ui.separator();

                    ScrollArea::vertical()
                        .id_salt("table_v")
                        .max_height(TABLE_HEIGHT)
                        .auto_shrink([false, true])
                        .show_rows(ui, ROW_HEIGHT, rows.len(), |ui, range| {
                            for row in &rows[range] {
                                ui.horizontal(|ui| {
                                    for ((_, width), cell) in TABLE_COLUMNS.iter().zip(Self::cells(row)) {
                                        ui.add_sized(
                                            [*width, ROW_HEIGHT],
                                            egui::Label::new(RichText::new(cell).size(11.0)).truncate(),
                                        );
                                    }
                                });
                            }
                        });
                });
            });
    }

    fn cells(row: &JoinedRecord) -> [String; 9] {
        fn opt_f64(v: Option<f64>) -> String {
            v.map(|v| v.to_string()).unwrap_or_default()
        }
        [
            row.city_id.to_string(),
            row.year.to_string(),
            row.household_type.clone().unwrap_or_default(),
            row.household_type_en.clone(),
            opt_f64(row.hascar_perc),
            row.name_nl.clone().unwrap_or_default(),
            row.region.clone().unwrap_or_default(),
            opt_f64(row.pop_per_km2),
            opt_f64(row.prosperity_index),
        ]
    }

    /// Scatter of ownership percentage against `axis`, one colour per region.
    pub fn draw_scatter(ui: &mut egui::Ui, axis: XAxis, series: &[ScatterSeries]) {
        let hover_series = series.to_vec();

        Plot::new(format!("scatter_{}", axis.column()))
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(axis.column())
            .y_axis_label(columns::HASCAR_PERC)
            .allow_scroll(false)
            .label_formatter(move |name, value| {
                hover_series
                    .iter()
                    .find(|s| s.region == name)
                    .and_then(|s| s.nearest(value.x, value.y).map(|p| s.tooltip(p, axis)))
                    .unwrap_or_else(|| format!("x = {:.1}\ny = {:.1}", value.x, value.y))
            })
            .show(ui, |plot_ui| {
                for s in series {
                    let points: Vec<[f64; 2]> = s.points.iter().map(|p| [p.x, p.y]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(4.0)
                            .color(Self::region_color(s.color_index))
                            .name(&s.region),
                    );
                }
            });
    }

    /// One bar per household type, height = mean ownership percentage.
    pub fn draw_bar_chart(ui: &mut egui::Ui, aggregates: &[AggregateRow]) {
        let labels: Vec<String> = aggregates.iter().map(|a| a.household_type_en.clone()).collect();
        let n = labels.len();

        let bars: Vec<Bar> = aggregates
            .iter()
            .enumerate()
            .filter_map(|(i, a)| {
                a.mean_hascar_perc.map(|mean| {
                    Bar::new(i as f64, mean)
                        .name(&a.household_type_en)
                        .width(0.6)
                        .fill(BAR_COLOR)
                })
            })
            .collect();

        Plot::new("bar_household_type")
            .height(PLOT_HEIGHT)
            .x_axis_label(columns::HOUSEHOLD_TYPE_EN)
            .y_axis_label(columns::HASCAR_PERC)
            .allow_scroll(false)
            .include_y(0.0)
            .x_grid_spacer(move |_input| {
                (0..n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(BAR_COLOR)
                        .name("mean")
                        .element_formatter(Box::new(|bar, _chart| {
                            format!("{}\n{:.2}", bar.name, bar.value)
                        })),
                );
            });
    }

    /// Placeholder for a view with nothing to show.
    pub fn draw_empty_notice(ui: &mut egui::Ui) {
        ui.label(
            RichText::new("No rows match the current selection")
                .size(12.0)
                .color(Color32::GRAY),
        );
    }
}
