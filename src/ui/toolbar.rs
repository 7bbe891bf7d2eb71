// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbars above the canvas.
//!
//! Outside edit mode the toolbar controls the folder, the device and the
//! capture loop. In edit mode it selects the annotation tool and finishes
//! or cancels the edit.

use crate::models::tool::Tool;
use crate::recorder::session::Session;

/// Something the user asked for from a toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    OpenDirectory,
    CaptureNow,
    EnterEdit,
    ConfirmEdit,
    CancelEdit,
}

/// Toolbar shown while watching the device.
pub fn show_view(ui: &mut egui::Ui, session: &mut Session, capturing: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("📁 Open folder").clicked() {
            action = ToolbarAction::OpenDirectory;
        }

        let status = if session.connected {
            egui::RichText::new("📱 Device connected")
        } else {
            egui::RichText::new("📱 Device disconnected").color(egui::Color32::from_rgb(255, 68, 68))
        };
        ui.label(status);

        let auto_label = if session.auto_capture {
            "⏸ Auto capture ON"
        } else {
            "▶ Auto capture OFF"
        };
        if ui.selectable_label(session.auto_capture, auto_label).clicked() {
            session.auto_capture = !session.auto_capture;
        }

        if !session.auto_capture
            && ui
                .add_enabled(!capturing, egui::Button::new("🔄 Capture now"))
                .clicked()
        {
            action = ToolbarAction::CaptureNow;
        }

        ui.separator();

        if ui
            .add_enabled(session.directory.is_some(), egui::Button::new("✏ Edit"))
            .on_disabled_hover_text("Open a folder first")
            .clicked()
        {
            action = ToolbarAction::EnterEdit;
        }

        if let Some(dir) = &session.directory {
            ui.separator();
            ui.label(egui::RichText::new(dir.display().to_string()).weak());
        }
    });
    action
}

/// Toolbar shown in edit mode.
pub fn show_edit(ui: &mut egui::Ui, session: &mut Session) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");
        ui.separator();

        for tool in Tool::ALL {
            let label = format!("{} ({})", tool.label(), tool.hotkey().to_ascii_uppercase());
            if ui.selectable_label(session.tool == tool, label).clicked() {
                session.select_tool(tool);
            }
        }

        ui.separator();

        let naming = session.pending().is_some();
        if ui
            .add_enabled(!naming, egui::Button::new("✔ Done"))
            .on_disabled_hover_text("Name the new annotation first")
            .clicked()
        {
            action = ToolbarAction::ConfirmEdit;
        }
        if ui.button("✖ Cancel").clicked() {
            action = ToolbarAction::CancelEdit;
        }

        ui.separator();

        // Tool description
        let tool_text = match session.tool {
            Tool::Drag => "Click to select an annotation, drag to move it",
            Tool::Template | Tool::TemplateClick => "Drag a box around the image to find",
            Tool::Ocr | Tool::OcrClick => "Drag a box around the text to read",
            Tool::HintBox => "Drag a box to mark a region",
        };
        ui.label(egui::RichText::new(tool_text).italics().weak());
    });
    action
}
