use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};

use crate::data::grouping::RankedVideo;
use crate::state::{AppState, Layout, MessageKind};

const GRID_CARD_WIDTH: f32 = 260.0;

/// Something the participant asked for during this frame.
enum Action {
    Move { from: usize, to: usize },
    ToggleDetails(String),
}

// ---------------------------------------------------------------------------
// Sortable list (central panel, sort mode)
// ---------------------------------------------------------------------------

pub fn sorter_view(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Video Complexity Sorter");
        ui.label(
            "Drag and drop the items below to arrange them from Least Complex (top) to Most Complex (bottom).",
        );
        ui.label(
            RichText::new(format!(
                "Currently displaying {} videos, each representing a unique combination of {} parameters.",
                state.items.len(),
                state.grouping.params().join(" and ")
            ))
            .italics()
            .small(),
        );
    });
    ui.add_space(6.0);

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("✔ Check Order").clicked() {
            state.check_order();
        }
        if ui.button("🔀 Shuffle List").clicked() {
            state.shuffle();
        }
        if ui.button("✉ Email the Order").clicked() {
            state.open_email();
        }
    });

    if let Some(msg) = &state.message {
        let color = match msg.kind {
            MessageKind::Success => Color32::from_rgb(0x4c, 0xaf, 0x50),
            MessageKind::Error => Color32::from_rgb(0xf4, 0x43, 0x36),
            MessageKind::Info => ui.visuals().weak_text_color(),
        };
        if msg.kind != MessageKind::Info {
            egui::Frame::group(ui.style())
                .stroke(Stroke::new(2.0, color))
                .show(ui, |ui: &mut Ui| {
                    ui.label(RichText::new(&msg.text).color(color));
                });
        }
    }
    ui.separator();

    let mut action = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.layout {
            Layout::Vertical => {
                action = sortable_items(ui, state, false);
            }
            Layout::Horizontal => {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    action = sortable_items(ui, state, true);
                });
            }
        });

    match action {
        Some(Action::Move { from, to }) => state.move_item(from, to),
        Some(Action::ToggleDetails(id)) => state.toggle_expanded(&id),
        None => {}
    }
}

fn sortable_items(ui: &mut Ui, state: &AppState, grid: bool) -> Option<Action> {
    let mut action = None;
    let count = state.items.len();
    let stroke = Stroke::new(2.0, ui.visuals().selection.stroke.color);

    for (index, item) in state.items.iter().enumerate() {
        let item_id = egui::Id::new(("video", &item.record.identifier));
        let expanded = state.expanded.contains(&item.record.identifier);

        let frame = egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            if grid {
                ui.set_width(GRID_CARD_WIDTH);
            } else {
                ui.set_width(ui.available_width());
            }
            ui.horizontal(|ui: &mut Ui| {
                ui.dnd_drag_source(item_id, index, |ui: &mut Ui| {
                    ui.label(RichText::new("☰").size(20.0));
                });
                ui.vertical(|ui: &mut Ui| {
                    if let Some(a) = video_card(ui, item, index, count, expanded) {
                        action = Some(a);
                    }
                });
            });
        });
        let response = frame.response;

        if let (Some(pointer), Some(hovered)) = (
            ui.input(|i| i.pointer.interact_pos()),
            response.dnd_hover_payload::<usize>(),
        ) {
            let rect = response.rect;
            let before = if grid {
                pointer.x < rect.center().x
            } else {
                pointer.y < rect.center().y
            };
            let insert_at = if *hovered == index || before {
                index
            } else {
                index + 1
            };

            if *hovered != index {
                match (grid, before) {
                    (false, true) => ui.painter().hline(rect.x_range(), rect.top(), stroke),
                    (false, false) => ui.painter().hline(rect.x_range(), rect.bottom(), stroke),
                    (true, true) => ui.painter().vline(rect.left(), rect.y_range(), stroke),
                    (true, false) => ui.painter().vline(rect.right(), rect.y_range(), stroke),
                };
            }

            if let Some(dragged) = response.dnd_release_payload::<usize>() {
                action = Some(Action::Move {
                    from: *dragged,
                    to: drop_target(*dragged, insert_at),
                });
            }
        }
    }
    action
}

/// Convert an insertion point (a gap between items) into an array-move
/// destination for the dragged item.
fn drop_target(from: usize, insert_at: usize) -> usize {
    if insert_at > from {
        insert_at - 1
    } else {
        insert_at
    }
}

/// Card body of one sortable item.
fn video_card(
    ui: &mut Ui,
    item: &RankedVideo,
    index: usize,
    count: usize,
    expanded: bool,
) -> Option<Action> {
    let mut action = None;
    let rec = &item.record;

    ui.label(RichText::new(&rec.display_name).strong());
    ui.label(RichText::new(format!("Current Rank: {}", index + 1)).weak());

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(index > 0, egui::Button::new("⬆").small())
            .on_hover_text("Move up")
            .clicked()
        {
            action = Some(Action::Move {
                from: index,
                to: index - 1,
            });
        }
        if ui
            .add_enabled(index + 1 < count, egui::Button::new("⬇").small())
            .on_hover_text("Move down")
            .clicked()
        {
            action = Some(Action::Move {
                from: index,
                to: index + 1,
            });
        }
        let toggle = if expanded { "Hide parameters" } else { "Show parameters" };
        if ui.small_button(toggle).clicked() {
            action = Some(Action::ToggleDetails(rec.identifier.clone()));
        }
    });

    if expanded {
        ui.label(
            RichText::new(rec.description())
                .color(Color32::from_rgb(0x00, 0x7b, 0xff))
                .small(),
        );
    }
    ui.label(RichText::new(&rec.original_name).italics().small().weak());
    action
}

/// Read-only card used by the pairwise view.
pub fn pair_card(ui: &mut Ui, item: &RankedVideo) {
    let rec = &item.record;
    ui.label(RichText::new(&rec.display_name).strong().size(18.0));
    ui.label(RichText::new(rec.description()).small());
    ui.label(RichText::new(&rec.identifier).small().weak());
}
