use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::config::AppConfig;
use crate::data::api::WorldBankApi;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ClimateGdpApp {
    pub state: AppState,
}

impl ClimateGdpApp {
    pub fn new(config: AppConfig) -> Self {
        let source = Arc::new(WorldBankApi::new(config.api.clone()));
        let mut state = AppState::new(config, source);
        state.start();
        Self { state }
    }
}

impl Default for ClimateGdpApp {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl eframe::App for ClimateGdpApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();
        // Fetch threads don't wake the UI; keep polling while anything is in flight.
        if self.state.any_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: title and country selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: chart and year range ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::trend_chart(ui, &mut self.state);
            ui.add_space(8.0);
            panels::range_selector(ui, &mut self.state);
        });
    }
}
