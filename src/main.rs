mod app;
mod color;
mod config;
mod data;
mod email;
mod error;
mod export;
mod pairwise;
mod state;
mod ui;

use app::ComplexitySorterApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = config::load_config(None).unwrap_or_else(|e| {
        log::error!("{e:#}; falling back to defaults");
        config::AppConfig::default()
    });
    if let Err(e) = config.validate() {
        log::warn!("{e}");
    }

    let mut state = AppState::new(config);
    let dataset_path = state.config.dataset_path.clone();
    state.load_path(&dataset_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Complexity Sorter",
        options,
        Box::new(|_cc| Ok(Box::new(ComplexitySorterApp::new(state)))),
    )
}
