//! Dashboard Main Application
//! Main window: loads the data once, then re-filters and re-renders on every
//! control change.

use crate::charts::{StaticChartRenderer, XAxis, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::config::DashboardConfig;
use crate::data::{export, DataLoader, JoinedTable, LoadError};
use crate::gui::{ChartKind, ChartViewer, ChartViewerAction, ControlPanel, ControlPanelAction};
use anyhow::Context;
use egui::{Color32, RichText, SidePanel};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Data loading result from background thread
enum LoadResult {
    Complete(&'static JoinedTable),
    Error(LoadError),
}

/// Application lifecycle. `Ready` is never left once reached.
enum AppState {
    Loading,
    Ready(ChartViewer),
    Failed(String),
}

/// Main application window.
pub struct DashboardApp {
    state: AppState,
    control_panel: ControlPanel,
    load_rx: Option<Receiver<LoadResult>>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            state: AppState::Loading,
            control_panel: ControlPanel::new(),
            load_rx: None,
        };
        app.start_loading(config);
        app
    }

    /// Load and join both tables in a background thread.
    fn start_loading(&mut self, config: DashboardConfig) {
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.control_panel.set_status("Loading data...");

        thread::spawn(move || {
            let result = match DataLoader::shared(&config).load() {
                Ok(table) => LoadResult::Complete(table),
                Err(e) => LoadResult::Error(e),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for data loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(table)) => {
                self.control_panel.configure(table);
                let filter = self.control_panel.filter_state();
                let viewer = ChartViewer::new(table, &filter);
                self.control_panel.set_status(&format!(
                    "Loaded {} rows across {} regions",
                    table.row_count(),
                    table.regions.len()
                ));
                self.state = AppState::Ready(viewer);
            }
            Ok(LoadResult::Error(error)) => {
                log::error!("{error}");
                self.state = AppState::Failed(error.to_string());
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.state = AppState::Failed("Data loading thread stopped unexpectedly".to_string());
            }
        }
    }

    /// Save the filtered table to a user-chosen CSV file
    fn handle_export_csv(&mut self) {
        let AppState::Ready(viewer) = &self.state else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("filtered_cardata.csv")
            .save_file()
        else {
            return; // User cancelled
        };

        match export::write_csv(&viewer.filtered, &path) {
            Ok(()) => self.control_panel.set_status(&format!(
                "Exported {} rows to {}",
                viewer.filtered.len(),
                path.display()
            )),
            Err(e) => {
                log::error!("CSV export failed: {e}");
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    /// Save one chart to a user-chosen PNG file
    fn handle_export_chart(&mut self, kind: ChartKind) {
        let AppState::Ready(viewer) = &self.state else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(kind.file_name())
            .save_file()
        else {
            return;
        };

        match Self::render_chart(viewer, kind, &path) {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Chart saved to {}", path.display())),
            Err(e) => {
                log::error!("Chart export failed: {e:#}");
                self.control_panel.set_status(&format!("Error: {e:#}"));
            }
        }
    }

    fn render_chart(viewer: &ChartViewer, kind: ChartKind, path: &Path) -> anyhow::Result<()> {
        match kind {
            ChartKind::Scatter(axis) => StaticChartRenderer::render_scatter_png(
                path,
                axis,
                viewer.series(axis),
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT,
            ),
            ChartKind::HouseholdBars => StaticChartRenderer::render_bar_png(
                path,
                &viewer.aggregates,
                DEFAULT_WIDTH,
                DEFAULT_HEIGHT,
            ),
        }
        .with_context(|| format!("Failed to save {}", chart_label(kind)))
    }

    fn show_loading(ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading data...").size(20.0));
                });
            });
        });
    }

    fn show_failure(ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(
                    RichText::new("⚠ The dashboard cannot be shown")
                        .size(22.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                ui.add_space(10.0);
                ui.label(RichText::new(message).size(14.0));
            });
        });
    }
}

fn chart_label(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Scatter(XAxis::PopulationDensity) => "population density chart",
        ChartKind::Scatter(XAxis::ProsperityIndex) => "prosperity index chart",
        ChartKind::HouseholdBars => "household type chart",
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        match &self.state {
            AppState::Loading => {
                ctx.request_repaint();
                Self::show_loading(ctx);
                return;
            }
            AppState::Failed(message) => {
                Self::show_failure(ctx, message);
                return;
            }
            AppState::Ready(_) => {}
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if self.control_panel.show(ui) == ControlPanelAction::FilterChanged {
                        let filter = self.control_panel.filter_state();
                        if let AppState::Ready(viewer) = &mut self.state {
                            viewer.refresh(&filter);
                            self.control_panel.set_status(&format!(
                                "{} rows match the selection",
                                viewer.filtered.len()
                            ));
                        }
                    }
                });
            });

        // Central panel - Views
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| match &self.state {
                AppState::Ready(viewer) => viewer.show(ui),
                _ => ChartViewerAction::None,
            })
            .inner;

        match action {
            ChartViewerAction::ExportCsv => self.handle_export_csv(),
            ChartViewerAction::ExportChart(kind) => self.handle_export_chart(kind),
            ChartViewerAction::None => {}
        }
    }
}
