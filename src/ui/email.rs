use eframe::egui::{self, Color32, RichText, Ui};

use crate::email::EmailJsClient;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Email dialog
// ---------------------------------------------------------------------------

pub fn email_window(ctx: &egui::Context, state: &mut AppState) {
    if !state.email.open {
        return;
    }

    let mut open = true;
    let mut send = false;
    let mut cancel = false;
    let configured = state.email_configured();

    egui::Window::new("Email the Video Complexity Order")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            if !configured {
                ui.label(
                    RichText::new(
                        "Email is not configured. Set the EmailJS service, template and public key first.",
                    )
                    .color(Color32::from_rgb(0xf4, 0x43, 0x36)),
                );
                ui.separator();
            }

            let form = &mut state.email.form;
            egui::Grid::new("email_form")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("Your Name:");
                    ui.text_edit_singleline(&mut form.from_name);
                    ui.end_row();

                    ui.label("Your Email:");
                    ui.text_edit_singleline(&mut form.from_email);
                    ui.end_row();

                    ui.label("Notes (Optional):");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.message)
                            .desired_rows(4)
                            .hint_text("Add any notes or context here..."),
                    );
                    ui.end_row();
                });

            ui.label(
                RichText::new("The current video order will be appended to your notes.")
                    .small()
                    .weak(),
            );

            if let Some(err) = &state.email.error {
                ui.label(RichText::new(err).color(Color32::RED));
            }

            ui.add_space(6.0);
            ui.horizontal(|ui: &mut Ui| {
                if ui.add_enabled(configured, egui::Button::new("Send")).clicked() {
                    send = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if send {
        match EmailJsClient::new() {
            Ok(client) => {
                state.submit_email(&client);
            }
            Err(e) => {
                log::error!("Could not build email client: {e}");
                state.email.error = Some(e.to_string());
            }
        }
    }
    if cancel || !open {
        state.close_email();
    }
}
