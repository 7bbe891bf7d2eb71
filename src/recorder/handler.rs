// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reacting to annotation changes from the canvas.
//!
//! Adding an annotation is a two step operation. [`handle_event`] stages the
//! annotation and a draft definition and hands back a [`PendingAdd`] holding
//! the tool that was active at that moment. Once the naming dialog closes the
//! pending add is either committed, which finalizes the definition and
//! generates code, or rolled back, which removes both again.

use crate::models::{
    annotation::Annotation,
    definition::{is_valid_identifier, Definition},
    metadata::ImageMetaData,
    tool::Tool,
};
use crate::script::{buffer::ScriptBuffer, template};
use thiserror::Error;

/// Change reported by the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEvent {
    Add(Annotation),
    Update(Annotation),
    Remove(String),
}

/// Names entered in the naming dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameForm {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Name is required")]
    MissingName,
    #[error("Display name is required")]
    MissingDisplayName,
    #[error("\"{0}\" is not a valid identifier")]
    InvalidName(String),
}

impl NameForm {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        if !is_valid_identifier(name) {
            return Err(FormError::InvalidName(name.to_string()));
        }
        if self.display_name.trim().is_empty() {
            return Err(FormError::MissingDisplayName);
        }
        Ok(())
    }
}

/// A staged annotation waiting for its names.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAdd {
    annotation_id: String,
    tool: Tool,
}

impl PendingAdd {
    pub fn annotation_id(&self) -> &str {
        &self.annotation_id
    }

    /// Tool that was active when the annotation was drawn.
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Finalize the staged definition and insert the generated snippet into
    /// `script`. Returns the snippet, if the tool produces one.
    ///
    /// The form must already be valid.
    pub fn commit(
        self,
        store: &mut ImageMetaData,
        form: &NameForm,
        script: &mut ScriptBuffer,
    ) -> Option<String> {
        let Some(draft) = store.definition(&self.annotation_id).cloned() else {
            log::warn!(
                "Annotation {} disappeared before it was named",
                self.annotation_id
            );
            return None;
        };

        let definition = Definition {
            name: form.name.trim().to_string(),
            display_name: form.display_name.trim().to_string(),
            ..draft
        };
        store.update_definition(definition.clone());
        store.set_tip(&self.annotation_id, definition.display_name.clone());

        let annotation = store.annotation(&self.annotation_id)?;
        let snippet = template::render(self.tool, &definition, annotation)?;
        script.insert_snippet(&snippet);
        log::info!("Inserted {:?} snippet for {}", self.tool, definition.name);
        Some(snippet)
    }

    /// Remove the staged annotation and definition.
    pub fn rollback(self, store: &mut ImageMetaData) {
        store.remove(&self.annotation_id);
        log::info!("Discarded unnamed annotation {}", self.annotation_id);
    }
}

/// What the caller has to do after an event.
#[derive(Debug, PartialEq)]
pub enum Handled {
    /// Nothing changed
    Ignored,
    /// The store was updated
    Applied,
    /// An annotation was staged; ask for its names
    Prompt(PendingAdd),
}

/// Apply a canvas event to the store, with `tool` being the active tool.
pub fn handle_event(store: &mut ImageMetaData, event: AnnotationEvent, tool: Tool) -> Handled {
    match event {
        AnnotationEvent::Add(annotation) => {
            let Some(definition_type) = tool.definition_type() else {
                return Handled::Ignored;
            };
            let id = annotation.id.clone();
            store.insert(annotation, Definition::draft(id.clone(), definition_type));
            log::info!("Staged annotation {} with {:?}", id, tool);
            Handled::Prompt(PendingAdd {
                annotation_id: id,
                tool,
            })
        }
        AnnotationEvent::Update(annotation) => {
            if store.update_annotation(&annotation.id, annotation.geometry, annotation.tip) {
                Handled::Applied
            } else {
                log::warn!("Update for unknown annotation {}", annotation.id);
                Handled::Ignored
            }
        }
        AnnotationEvent::Remove(id) => {
            if store.remove(&id) {
                log::info!("Removed annotation {}, total: {}", id, store.annotations.len());
                Handled::Applied
            } else {
                Handled::Ignored
            }
        }
    }
}
