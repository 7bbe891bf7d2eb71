// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation list panel.
//!
//! Lists the definitions on the current image in drawing order, with
//! their type and names, and lets the user select or remove them.

use crate::models::{definition::DefinitionType, metadata::ImageMetaData};

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    SelectAnnotation(String),
    DeleteAnnotation(String),
}

pub fn show(
    ui: &mut egui::Ui,
    metadata: &ImageMetaData,
    selected: Option<&str>,
    editable: bool,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Annotations");
    ui.separator();

    if metadata.annotations.is_empty() {
        ui.label(egui::RichText::new("No annotations").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for definition in metadata.ordered_definitions() {
            let id = &definition.annotation_id;
            let kind = match definition.definition_type {
                DefinitionType::Template => "template",
                DefinitionType::Ocr => "ocr",
                DefinitionType::HintBox => "hint-box",
            };
            let title = if definition.name.is_empty() {
                "(unnamed)".to_string()
            } else {
                format!("{} · {}", definition.name, definition.display_name)
            };

            ui.horizontal(|ui| {
                if ui
                    .selectable_label(selected == Some(id.as_str()), title)
                    .clicked()
                {
                    action = PropertiesAction::SelectAnnotation(id.clone());
                }
                ui.label(egui::RichText::new(kind).weak());
                if editable && ui.small_button("🗑").on_hover_text("Remove").clicked() {
                    action = PropertiesAction::DeleteAnnotation(id.clone());
                }
            });
        }
    });

    action
}
