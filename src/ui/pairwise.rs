use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::pairwise::{PairStatus, Side};
use crate::state::AppState;
use crate::ui::sorter::pair_card;

// ---------------------------------------------------------------------------
// Pairwise comparison (central panel, pairwise mode)
// ---------------------------------------------------------------------------

pub fn pairwise_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Video Pairwise Sorter");

    let Some(session) = state.pairwise.as_ref() else {
        ui.label("No videos loaded.");
        return;
    };

    match session.status() {
        PairStatus::NotEnoughVideos => {
            ui.heading("Not enough videos to compare");
            if ui.button("Reload").clicked() {
                state.restart_pairwise();
            }
            return;
        }
        PairStatus::Finished => {
            finished_view(ui, state);
            return;
        }
        PairStatus::Comparing => {}
    }

    ui.label(format!(
        "Click the video that looks more complex (or press ← / →). Progress: {} completed",
        session.results().len()
    ));

    // Arrow keys are equivalent to clicking.
    let mut picked = None;
    ui.input(|i| {
        if i.key_pressed(egui::Key::ArrowLeft) {
            picked = Some(Side::Left);
        } else if i.key_pressed(egui::Key::ArrowRight) {
            picked = Some(Side::Right);
        }
    });

    if let Some((left, right)) = session.pair() {
        ui.columns(2, |cols| {
            for (col, item, side, label) in [
                (0, left, Side::Left, "← Choose left"),
                (1, right, Side::Right, "Choose right →"),
            ] {
                let ui = &mut cols[col];
                egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                    ui.set_width(ui.available_width());
                    pair_card(ui, item);
                    if ui.button(label).clicked() {
                        picked = Some(side);
                    }
                });
            }
        });
    }

    ui.add_space(12.0);
    let restart = ui.button("Restart").clicked();

    if let Some(side) = picked {
        state.choose_pair(side);
    }
    if restart {
        state.restart_pairwise();
    }
}

fn finished_view(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = state.pairwise.as_ref() else {
        return;
    };
    ui.heading("All done");
    ui.label(format!("You made {} choices.", session.results().len()));

    let restart = ui.button("Restart").clicked();
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::remainder())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["#", "Left", "Right", "Chosen"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (i, choice) in session.results().iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label((i + 1).to_string());
                    });
                    for text in [&choice.left, &choice.right, &choice.chosen] {
                        row.col(|ui| {
                            ui.label(RichText::new(text.as_str()).small());
                        });
                    }
                });
            }
        });

    if restart {
        state.restart_pairwise();
    }
}
