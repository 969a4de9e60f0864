use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyOutcomesApp {
    pub state: AppState,
}

impl RustyOutcomesApp {
    /// `status` carries a startup problem (e.g. a broken config file) to the top bar.
    pub fn new(config: DashboardConfig, status: Option<String>) -> Self {
        let mut state = AppState::new(config);
        state.status_message = status;
        Self { state }
    }
}

impl eframe::App for RustyOutcomesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Re-run the page pipeline after a page switch or reload.
        self.state.ensure_rendered();

        // ---- Top panel: menu bar + page selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: data source + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: trend + table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &self.state);
        });
    }
}
