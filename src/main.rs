//! Car Ownership & City Data Dashboard
//!
//! Joins car ownership statistics with city metadata for Belgian cities and
//! lets the user filter and chart the result.

mod charts;
mod config;
mod data;
mod gui;

use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load();
    log::info!(
        "Reading {} and {}",
        config.cardata_path().display(),
        config.city_path().display()
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(&config.title),
        ..Default::default()
    };

    // Run the application
    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
