use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::params;
use crate::export;
use crate::state::{AppState, Layout, MessageKind, Phase, SessionMode, ViewMode};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Left side panel – experiment setup
// ---------------------------------------------------------------------------

/// Render the left experiment panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Experiment Setup");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let total = state.ranked.len();
    let size = state.config.experiment_size;

    match state.mode {
        SessionMode::Experiment => {
            ui.label(format!("Currently sorting a random subset of {size} videos."));
            if ui
                .button(format!("Load New Random {size}"))
                .clicked()
            {
                state.start_experiment();
            }
            if ui
                .button(format!("Reset to Full Dataset ({total} videos)"))
                .clicked()
            {
                state.reset_to_full();
            }
        }
        SessionMode::Full => {
            ui.label(format!("Full dataset loaded ({total} unique complexity groups)."));
            let enabled = state.can_start_experiment();
            if ui
                .add_enabled(
                    enabled,
                    egui::Button::new(format!("Start {size}-Video Random Experiment")),
                )
                .clicked()
            {
                state.start_experiment();
            }
            if !enabled {
                ui.label(
                    RichText::new(format!(
                        "Need at least {size} unique videos to enable the experiment mode."
                    ))
                    .small()
                    .color(Color32::RED),
                );
            }
        }
    }

    ui.separator();
    ui.strong("Grouping");
    if let Some(ds) = &state.dataset {
        for name in state.grouping.params() {
            let values = ds
                .unique_values
                .get(name)
                .map(|set| {
                    set.iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            ui.label(format!("{}: {values}", params::param_label(name)));
        }
        ui.label(format!(
            "{} videos, {} parameters",
            ds.len(),
            ds.param_names.len()
        ));
    }

    ui.separator();
    egui::CollapsingHeader::new(RichText::new("Order agreement").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            plot::agreement_plot(ui, state);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            let ready = state.phase == Phase::Ready;
            if ui
                .add_enabled(ready, egui::Button::new("Download CSV…"))
                .clicked()
            {
                save_dialog(state, export::CSV_FILE_NAME, "CSV", "csv", AppState::export_csv);
                ui.close_menu();
            }
            if ui
                .add_enabled(ready, egui::Button::new("Export to Excel…"))
                .clicked()
            {
                save_dialog(state, export::XLSX_FILE_NAME, "Excel", "xlsx", AppState::export_xlsx);
                ui.close_menu();
            }
            let has_choices = state
                .pairwise
                .as_ref()
                .is_some_and(|s| !s.results().is_empty());
            if ui
                .add_enabled(has_choices, egui::Button::new("Export pairwise choices…"))
                .clicked()
            {
                save_dialog(
                    state,
                    "pairwise_results.json",
                    "JSON",
                    "json",
                    AppState::export_pairwise,
                );
                ui.close_menu();
            }
        });

        ui.separator();

        if ui
            .selectable_label(state.view == ViewMode::Sort, "Sort")
            .clicked()
        {
            state.set_view(ViewMode::Sort);
        }
        if ui
            .selectable_label(state.view == ViewMode::Pairwise, "Pairwise")
            .clicked()
        {
            state.set_view(ViewMode::Pairwise);
        }

        ui.separator();

        let layout_label = match state.layout {
            Layout::Vertical => "Grid layout",
            Layout::Horizontal => "List layout",
        };
        if ui.button(layout_label).clicked() {
            state.toggle_layout();
        }

        ui.separator();

        if state.phase == Phase::Ready {
            ui.label(format!(
                "Visual Sorting Control ({} Videos)",
                state.items.len()
            ));
        }

        if let Some(msg) = &state.message {
            if msg.kind == MessageKind::Info {
                ui.separator();
                ui.label(RichText::new(&msg.text).weak());
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Full-screen load states
// ---------------------------------------------------------------------------

pub fn loading_screen(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.spinner();
            ui.heading("Loading video metadata...");
        });
    });
}

pub fn error_screen(ui: &mut Ui, state: &mut AppState, error: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading(RichText::new("Error Loading Data").color(Color32::RED));
        ui.label(format!(
            "Failed to load video metadata from `{}`. Please ensure the file exists and is correctly formatted.",
            state.config.dataset_path.display()
        ));
        ui.label(RichText::new(error).monospace().weak());
        ui.add_space(12.0);
        if ui.button("Open another file…").clicked() {
            open_file_dialog(state);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open video metadata")
        .add_filter("Supported files", &["json", "JSON", "csv"])
        .add_filter("JSON", &["json", "JSON"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.config.dataset_path = path.clone();
        state.load_path(&path);
    }
}

fn save_dialog(
    state: &mut AppState,
    default_name: &str,
    filter_name: &str,
    extension: &str,
    export: fn(&mut AppState, &Path) -> anyhow::Result<()>,
) {
    let file = rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter(filter_name, &[extension])
        .save_file();

    if let Some(path) = file {
        if export(state, &path).is_ok() {
            log::debug!("Export written to {}", path.display());
        }
    }
}
