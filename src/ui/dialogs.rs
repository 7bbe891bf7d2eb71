// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Modal dialogs: naming a new annotation and naming a saved capture.

use crate::io::export::validate_capture_name;
use crate::recorder::handler::NameForm;

/// State of a dialog after a frame.
pub enum DialogOutcome<T> {
    Open,
    Confirmed(T),
    Cancelled,
}

/// Asks for the name and display name of a new annotation.
#[derive(Default)]
pub struct NamingDialog {
    form: NameForm,
    error: Option<String>,
    focused: bool,
}

impl NamingDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an error from the last confirm attempt.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogOutcome<NameForm> {
        let mut outcome = DialogOutcome::Open;
        let validation = self.form.validate();

        egui::Window::new("Edit annotation")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("naming_form").num_columns(2).show(ui, |ui| {
                    ui.label("Name");
                    let name = ui.add(
                        egui::TextEdit::singleline(&mut self.form.name)
                            .hint_text("Identifier used in code"),
                    );
                    if !self.focused {
                        name.request_focus();
                        self.focused = true;
                    }
                    ui.end_row();

                    ui.label("Display name");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.form.display_name)
                            .hint_text("Shown on the canvas"),
                    );
                    ui.end_row();
                });

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::from_rgb(255, 68, 68), error);
                } else if let Err(e) = &validation {
                    ui.label(egui::RichText::new(e.to_string()).weak());
                }

                ui.horizontal(|ui| {
                    let can_confirm = validation.is_ok();
                    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui
                        .add_enabled(can_confirm, egui::Button::new("OK"))
                        .clicked()
                        || (can_confirm && enter)
                    {
                        outcome = DialogOutcome::Confirmed(self.form.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = DialogOutcome::Cancelled;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            outcome = DialogOutcome::Cancelled;
        }
        outcome
    }
}

/// Asks for the base file name of a capture.
#[derive(Default)]
pub struct SaveDialog {
    name: String,
    error: Option<String>,
    focused: bool,
}

impl SaveDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogOutcome<String> {
        let mut outcome = DialogOutcome::Open;
        let validation = validate_capture_name(&self.name);

        egui::Window::new("Save capture")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Name");
                    let field = ui.add(
                        egui::TextEdit::singleline(&mut self.name).hint_text("File name without .png"),
                    );
                    if !self.focused {
                        field.request_focus();
                        self.focused = true;
                    }
                });

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::from_rgb(255, 68, 68), error);
                }

                ui.horizontal(|ui| {
                    let can_confirm = validation.is_ok();
                    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui
                        .add_enabled(can_confirm, egui::Button::new("Save"))
                        .clicked()
                        || (can_confirm && enter)
                    {
                        outcome = DialogOutcome::Confirmed(self.name.trim().to_string());
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = DialogOutcome::Cancelled;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            outcome = DialogOutcome::Cancelled;
        }
        outcome
    }
}
