mod app;
mod chart;
mod config;
mod data;
mod fetch;
mod state;
mod ui;

use app::ClimateGdpApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([680.0, 520.0])
            .with_min_inner_size([640.0, 460.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Climate and GDP Trends",
        options,
        Box::new(|_cc| Ok(Box::new(ClimateGdpApp::default()))),
    )
}
