use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Order agreement plot (side panel)
// ---------------------------------------------------------------------------

/// Scatter of current position against target complexity rank. A perfect
/// order puts every point on the diagonal.
pub fn agreement_plot(ui: &mut Ui, state: &AppState) {
    if state.items.is_empty() {
        ui.label("Nothing to plot.");
        return;
    }

    let max_rank = state
        .items
        .iter()
        .map(|item| item.complexity_rank)
        .max()
        .unwrap_or(1) as f64;

    Plot::new("agreement_plot")
        .height(200.0)
        .x_axis_label("Position")
        .y_axis_label("Complexity rank")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(vec![[1.0, 1.0], [max_rank, max_rank]]))
                    .name("ideal")
                    .color(Color32::GRAY)
                    .width(1.0),
            );

            for (position, item) in state.items.iter().enumerate() {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(item.complexity_rank))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let point = [(position + 1) as f64, item.complexity_rank as f64];
                plot_ui.points(
                    Points::new(PlotPoints::new(vec![point]))
                        .name(&item.record.display_name)
                        .color(color)
                        .radius(4.0),
                );
            }
        });
}
