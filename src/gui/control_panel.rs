//! Control Panel Widget
//! Left side panel with the region multi-select, the year range selector and
//! the status line.

use crate::data::{FilterState, JoinedTable};
use egui::{Color32, RichText, ScrollArea, Slider};

/// Left side control panel feeding the filter stage.
pub struct ControlPanel {
    pub regions: Vec<String>,
    pub selected_regions: Vec<bool>,
    /// Whether the table has rows without a matching city
    pub has_unmatched: bool,
    pub include_unmatched: bool,
    /// Observed year range, `None` before load or for an empty table
    pub year_bounds: Option<(i32, i32)>,
    pub min_year: i32,
    pub max_year: i32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            selected_regions: Vec::new(),
            has_unmatched: false,
            include_unmatched: false,
            year_bounds: None,
            min_year: 0,
            max_year: 0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset controls to their defaults for a freshly loaded table:
    /// every region selected, rows without a city included, and the full year range.
    pub fn configure(&mut self, table: &JoinedTable) {
        self.regions = table.regions.clone();
        self.selected_regions = vec![true; self.regions.len()];
        self.has_unmatched = table.unmatched_rows > 0;
        self.include_unmatched = true;
        self.year_bounds = table.year_bounds;
        let (lo, hi) = table.year_bounds.unwrap_or((0, 0));
        self.min_year = lo;
        self.max_year = hi;
    }

    /// Selection as a filter.
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            regions: self
                .regions
                .iter()
                .zip(&self.selected_regions)
                .filter(|(_, &selected)| selected)
                .map(|(region, _)| region.clone())
                .collect(),
            include_unmatched: self.include_unmatched,
            min_year: self.min_year,
            max_year: self.max_year,
        }
    }

    /// Keep the lower bound at or below the upper bound. The handle that moved wins.
    fn clamp_years(&mut self, lower_moved: bool) {
        if self.min_year > self.max_year {
            if lower_moved {
                self.max_year = self.min_year;
            } else {
                self.min_year = self.max_year;
            }
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚘 Filters")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Region Section =====
        ui.label(
            RichText::new("Which provinces or regions would you like to view?")
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                    for (region, selected) in self.regions.iter().zip(self.selected_regions.iter_mut()) {
                        if ui.checkbox(selected, region).changed() {
                            action = ControlPanelAction::FilterChanged;
                        }
                    }
                    if self.has_unmatched
                        && ui
                            .checkbox(&mut self.include_unmatched, "(no matching city)")
                            .changed()
                    {
                        action = ControlPanelAction::FilterChanged;
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.selected_regions.iter_mut().for_each(|v| *v = true);
                self.include_unmatched = true;
                action = ControlPanelAction::FilterChanged;
            }
            if ui.small_button("Clear All").clicked() {
                self.selected_regions.iter_mut().for_each(|v| *v = false);
                self.include_unmatched = false;
                action = ControlPanelAction::FilterChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Range Section =====
        ui.label(
            RichText::new("Select the year range for car data:")
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);

        let (lo, hi) = self.year_bounds.unwrap_or((self.min_year, self.max_year));
        ui.add_enabled_ui(self.year_bounds.is_some(), |ui| {
            if ui
                .add(Slider::new(&mut self.min_year, lo..=hi).text("From"))
                .changed()
            {
                self.clamp_years(true);
                action = ControlPanelAction::FilterChanged;
            }
            if ui
                .add(Slider::new(&mut self.max_year, lo..=hi).text("To"))
                .changed()
            {
                self.clamp_years(false);
                action = ControlPanelAction::FilterChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    FilterChanged,
}
