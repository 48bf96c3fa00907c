//! Chart Viewer Widget
//! Central scrollable panel with the filtered table and the three charts.
//! Every view is derived from the current filter in `refresh`.

use crate::charts::{ChartPlotter, ScatterSeries, XAxis};
use crate::data::{AggregateRow, DataProcessor, FilterState, JoinedRecord, JoinedTable};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 25.0;

/// Charts that can be saved as PNG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Scatter(XAxis),
    HouseholdBars,
}

impl ChartKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Scatter(XAxis::PopulationDensity) => "ownership_vs_density.png",
            ChartKind::Scatter(XAxis::ProsperityIndex) => "prosperity_vs_ownership.png",
            ChartKind::HouseholdBars => "ownership_by_household_type.png",
        }
    }
}

/// Actions triggered from the views
#[derive(Debug, Clone, PartialEq)]
pub enum ChartViewerAction {
    None,
    ExportCsv,
    ExportChart(ChartKind),
}

/// Filtered rows and everything drawn from them.
pub struct ChartViewer {
    table: &'static JoinedTable,
    pub filtered: Vec<&'static JoinedRecord>,
    pub density_series: Vec<ScatterSeries>,
    pub prosperity_series: Vec<ScatterSeries>,
    pub aggregates: Vec<AggregateRow>,
}

impl ChartViewer {
    pub fn new(table: &'static JoinedTable, filter: &FilterState) -> Self {
        let mut viewer = Self {
            table,
            filtered: Vec::new(),
            density_series: Vec::new(),
            prosperity_series: Vec::new(),
            aggregates: Vec::new(),
        };
        viewer.refresh(filter);
        viewer
    }

    /// Recompute every view for a new filter.
    pub fn refresh(&mut self, filter: &FilterState) {
        self.filtered = filter.apply(self.table);
        self.density_series =
            ScatterSeries::build(&self.filtered, XAxis::PopulationDensity, &self.table.regions);
        self.prosperity_series =
            ScatterSeries::build(&self.filtered, XAxis::ProsperityIndex, &self.table.regions);
        self.aggregates = DataProcessor::mean_by_household_type(self.filtered.iter().copied());

        log::debug!(
            "Filter {} regions, {}..={}: {} of {} rows",
            filter.regions.len(),
            filter.min_year,
            filter.max_year,
            self.filtered.len(),
            self.table.row_count()
        );
    }

    pub fn series(&self, axis: XAxis) -> &[ScatterSeries] {
        match axis {
            XAxis::PopulationDensity => &self.density_series,
            XAxis::ProsperityIndex => &self.prosperity_series,
        }
    }

    /// Draw all views, top to bottom.
    pub fn show(&self, ui: &mut egui::Ui) -> ChartViewerAction {
        let mut action = ChartViewerAction::None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new("🚘 Car Ownership & City Data Dashboard").size(26.0).strong());
                ui.label(
                    "Explore data related to households, car ownership, population, and \
                     prosperity across different cities in Belgium.",
                );
                ui.add_space(SECTION_SPACING);

                // ===== Table =====
                if Self::section_header(ui, "City and Household Data Overview", "💾 Download CSV") {
                    action = ChartViewerAction::ExportCsv;
                }
                ui.label(
                    RichText::new(format!(
                        "{} of {} rows",
                        self.filtered.len(),
                        self.table.row_count()
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
                ChartPlotter::draw_table(ui, &self.filtered);
                if self.table.unmatched_rows > 0 {
                    ui.label(
                        RichText::new(format!(
                            "{} rows have no matching city",
                            self.table.unmatched_rows
                        ))
                        .size(11.0)
                        .color(Color32::from_rgb(243, 156, 18)),
                    );
                }
                ui.add_space(SECTION_SPACING);

                // ===== Scatter views =====
                for (axis, heading) in [
                    (
                        XAxis::PopulationDensity,
                        "Car Ownership Percentage vs. Population Density",
                    ),
                    (XAxis::ProsperityIndex, "Prosperity Index vs. Car Ownership"),
                ] {
                    if Self::section_header(ui, heading, "🖼 Save PNG") {
                        action = ChartViewerAction::ExportChart(ChartKind::Scatter(axis));
                    }
                    ui.label(RichText::new(axis.title()).size(13.0));
                    let series = self.series(axis);
                    if series.is_empty() {
                        ChartPlotter::draw_empty_notice(ui);
                    }
                    ChartPlotter::draw_scatter(ui, axis, series);
                    ui.add_space(SECTION_SPACING);
                }

                // ===== Bar view =====
                if Self::section_header(ui, "Car Ownership Percentage by Household Type", "🖼 Save PNG") {
                    action = ChartViewerAction::ExportChart(ChartKind::HouseholdBars);
                }
                if self.aggregates.is_empty() {
                    ChartPlotter::draw_empty_notice(ui);
                }
                ChartPlotter::draw_bar_chart(ui, &self.aggregates);
                ui.add_space(SECTION_SPACING);
            });

        action
    }

    /// Heading with a right-aligned button. Returns true when the button was clicked.
    fn section_header(ui: &mut egui::Ui, title: &str, button: &str) -> bool {
        let mut clicked = false;
        ui.horizontal(|ui| {
            ui.heading(title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                clicked = ui.button(button).clicked();
            });
        });
        ui.separator();
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaked_table() -> &'static JoinedTable {
        let rows = [
            (11002, "Antwerpen", "single", 2020, Some(62.5)),
            (11002, "Antwerpen", "family", 2021, Some(84.0)),
            (71022, "Limburg", "single", 2020, Some(70.0)),
            (71022, "Limburg", "family", 2021, None),
        ]
        .into_iter()
        .map(|(city_id, region, household, year, perc)| JoinedRecord {
            city_id,
            year,
            household_type: None,
            household_type_en: household.to_string(),
            hascar_perc: perc,
            name_nl: Some(region.to_string()),
            region: Some(region.to_string()),
            pop_per_km2: Some(1000.0),
            prosperity_index: Some(100.0),
        })
        .collect();
        Box::leak(Box::new(JoinedTable::new(rows, 0)))
    }

    #[test]
    fn test_views_follow_filter() {
        let table = leaked_table();
        let mut viewer = ChartViewer::new(table, &FilterState::full(table));

        assert_eq!(viewer.filtered.len(), 4);
        assert_eq!(viewer.density_series.len(), 2);
        assert_eq!(viewer.aggregates.len(), 2);

        let mut filter = FilterState::full(table);
        filter.regions.remove("Antwerpen");
        viewer.refresh(&filter);

        assert_eq!(viewer.filtered.len(), 2);
        assert_eq!(viewer.density_series.len(), 1);
        assert_eq!(viewer.density_series[0].points.len(), 1);
        assert_eq!(viewer.aggregates[0].household_type_en, "family");
        assert_eq!(viewer.aggregates[0].mean_hascar_perc, None);
        assert_eq!(viewer.aggregates[1].mean_hascar_perc, Some(70.0));
    }

    #[test]
    fn test_default_view_keeps_rows_without_city() {
        let base = leaked_table();
        let mut rows = base.rows.clone();
        let mut orphan = rows[0].clone();
        orphan.city_id = 99999;
        orphan.household_type_en = "student".to_string();
        orphan.name_nl = None;
        orphan.region = None;
        orphan.pop_per_km2 = None;
        orphan.prosperity_index = None;
        rows.push(orphan);
        let table: &'static JoinedTable = Box::leak(Box::new(JoinedTable::new(rows, 1)));

        let viewer = ChartViewer::new(table, &FilterState::full(table));

        assert_eq!(viewer.filtered.len(), table.row_count());
        assert!(viewer.aggregates.iter().any(|a| a.household_type_en == "student"));
        // No region and no city attributes to plot
        let plotted: usize = viewer.density_series.iter().map(|s| s.points.len()).sum();
        assert_eq!(plotted, 3);
    }

    #[test]
    fn test_empty_selection_empties_every_view() {
        let table = leaked_table();
        let mut filter = FilterState::full(table);
        filter.regions.clear();

        let viewer = ChartViewer::new(table, &filter);

        assert!(viewer.filtered.is_empty());
        assert!(viewer.density_series.is_empty());
        assert!(viewer.prosperity_series.is_empty());
        assert!(viewer.aggregates.is_empty());
    }
}
