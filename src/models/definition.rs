// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Semantic definitions attached to annotations.

use serde::{Deserialize, Serialize};

/// Kind of resource an annotation describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefinitionType {
    Template,
    Ocr,
    HintBox,
}

/// Code generation metadata for one annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub annotation_id: String,
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub definition_type: DefinitionType,
    #[serde(default)]
    pub use_hint_rect: bool,
}

impl Definition {
    /// A draft definition with empty names, as created before the naming prompt.
    pub fn draft(annotation_id: impl Into<String>, definition_type: DefinitionType) -> Self {
        Self {
            annotation_id: annotation_id.into(),
            name: String::new(),
            display_name: String::new(),
            definition_type,
            use_hint_rect: false,
        }
    }
}

/// Whether `name` can be used as an identifier in a generated script.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("StartButton"));
        assert!(is_valid_identifier("_hidden2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2fast"));
        assert!(!is_valid_identifier("with space"));
        assert!(!is_valid_identifier("dash-name"));
    }

    #[test]
    fn test_json_field_names() {
        let def = Definition::draft("abc", DefinitionType::HintBox);
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["annotationId"], "abc");
        assert_eq!(json["displayName"], "");
        assert_eq!(json["type"], "hint-box");
        assert_eq!(json["useHintRect"], false);
    }
}
