// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation and definition store.
//!
//! Holds every annotation drawn on the current image together with the
//! definition describing it. This is also the exact shape written to the
//! `.png.json` sidecar next to a saved capture.

use super::annotation::{Annotation, Geometry};
use super::definition::Definition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotations plus their definitions, keyed by annotation id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetaData {
    #[serde(default)]
    pub definitions: BTreeMap<String, Definition>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ImageMetaData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.definitions.is_empty()
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    /// Insert an annotation and its definition together.
    pub fn insert(&mut self, annotation: Annotation, definition: Definition) {
        debug_assert_eq!(annotation.id, definition.annotation_id);
        self.definitions
            .insert(definition.annotation_id.clone(), definition);
        self.annotations.retain(|a| a.id != annotation.id);
        self.annotations.push(annotation);
    }

    /// Replace the geometry of an existing annotation, and its tip when one
    /// is given. Returns false if the id is unknown.
    pub fn update_annotation(&mut self, id: &str, geometry: Geometry, tip: Option<String>) -> bool {
        match self.annotations.iter_mut().find(|a| a.id == id) {
            Some(annotation) => {
                annotation.geometry = geometry;
                if tip.is_some() {
                    annotation.tip = tip;
                }
                true
            }
            None => false,
        }
    }

    pub fn set_tip(&mut self, id: &str, tip: impl Into<String>) -> bool {
        match self.annotations.iter_mut().find(|a| a.id == id) {
            Some(annotation) => {
                annotation.tip = Some(tip.into());
                true
            }
            None => false,
        }
    }

    /// Replace a stored definition. Returns false if none exists for its id.
    pub fn update_definition(&mut self, definition: Definition) -> bool {
        match self.definitions.get_mut(&definition.annotation_id) {
            Some(slot) => {
                *slot = definition;
                true
            }
            None => false,
        }
    }

    /// Remove an annotation and its definition. Returns true if anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        let removed_definition = self.definitions.remove(id).is_some();
        removed_definition || self.annotations.len() != before
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
        self.definitions.clear();
    }

    /// Definitions in the order their annotations were drawn.
    pub fn ordered_definitions(&self) -> impl Iterator<Item = &Definition> {
        self.annotations
            .iter()
            .filter_map(move |a| self.definitions.get(&a.id))
    }
}
