// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Script editor panel.

use crate::script::buffer::ScriptBuffer;
use egui::text::{CCursor, CCursorRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Run,
    CopyAll,
    CutAll,
}

pub struct EditorOutput {
    pub action: EditorAction,
    /// The user edited the text this frame
    pub changed: bool,
}

/// Show the editor toolbar and the script text.
pub fn show(ui: &mut egui::Ui, script: &mut ScriptBuffer, running: bool) -> EditorOutput {
    let mut action = EditorAction::None;

    ui.horizontal(|ui| {
        let run_label = if running { "⏳ Running..." } else { "▶ Run" };
        if ui.add_enabled(!running, egui::Button::new(run_label)).clicked() {
            action = EditorAction::Run;
        }
        ui.separator();
        if ui.button("📋 Copy all").clicked() {
            action = EditorAction::CopyAll;
        }
        if ui.button("✂ Cut all").clicked() {
            action = EditorAction::CutAll;
        }
    });
    ui.separator();

    let id = egui::Id::new("script_editor");
    if let Some(caret) = script.take_caret_request() {
        let mut state = egui::TextEdit::load_state(ui.ctx(), id).unwrap_or_default();
        state
            .cursor
            .set_char_range(Some(CCursorRange::one(CCursor::new(caret))));
        state.store(ui.ctx(), id);
    }

    let mut changed = false;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let output = egui::TextEdit::multiline(script.text_mut())
                .id(id)
                .code_editor()
                .lock_focus(true)
                .desired_width(f32::INFINITY)
                .desired_rows(30)
                .show(ui);

            changed = output.response.changed();
            if let Some(range) = output.cursor_range {
                script.set_caret(range.primary.ccursor.index);
            }
        });

    EditorOutput { action, changed }
}
