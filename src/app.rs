use eframe::egui;

use crate::state::{AppState, Phase, ViewMode};
use crate::ui::{email, pairwise, panels, sorter};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ComplexitySorterApp {
    pub state: AppState,
}

impl ComplexitySorterApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ComplexitySorterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        match self.state.phase.clone() {
            Phase::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    panels::loading_screen(ui);
                });
            }
            Phase::Failed(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    panels::error_screen(ui, &mut self.state, &error);
                });
            }
            Phase::Ready => {
                // ---- Left side panel: experiment setup ----
                egui::SidePanel::left("experiment_panel")
                    .default_width(240.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        panels::side_panel(ui, &mut self.state);
                    });

                // ---- Central panel: sorter or pairwise ----
                egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
                    ViewMode::Sort => sorter::sorter_view(ui, &mut self.state),
                    ViewMode::Pairwise => pairwise::pairwise_view(ui, &mut self.state),
                });

                email::email_window(ctx, &mut self.state);
            }
        }
    }
}
