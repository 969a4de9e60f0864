mod app;
mod chart;
mod color;
mod config;
mod data;
mod pages;
mod state;
mod ui;

use app::RustyOutcomesApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let (config, status) = match DashboardConfig::load() {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Failed to load config, using defaults: {e:#}");
            (DashboardConfig::default(), Some(format!("Config error: {e:#}")))
        }
    };
    log::info!("Reading data from {}", config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Outcomes – Graduate Trends",
        options,
        Box::new(|_cc| Ok(Box::new(RustyOutcomesApp::new(config, status)))),
    )
}
