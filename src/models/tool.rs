// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interaction tools.

use super::definition::DefinitionType;

/// Current interaction tool. Decides what kind of definition new
/// annotations get and which snippet is generated for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Drag,
    Template,
    TemplateClick,
    Ocr,
    OcrClick,
    HintBox,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Drag,
        Tool::Template,
        Tool::TemplateClick,
        Tool::Ocr,
        Tool::OcrClick,
        Tool::HintBox,
    ];

    /// Definition type assigned to annotations drawn with this tool.
    pub fn definition_type(self) -> Option<DefinitionType> {
        match self {
            Tool::Drag => None,
            Tool::Template | Tool::TemplateClick => Some(DefinitionType::Template),
            Tool::Ocr | Tool::OcrClick => Some(DefinitionType::Ocr),
            Tool::HintBox => Some(DefinitionType::HintBox),
        }
    }

    /// Whether the canvas should draw new shapes with this tool.
    pub fn draws(self) -> bool {
        self.definition_type().is_some()
    }

    pub fn hotkey(self) -> char {
        match self {
            Tool::Drag => 'v',
            Tool::Template => 't',
            Tool::TemplateClick => 'r',
            Tool::Ocr => 's',
            Tool::OcrClick => 'a',
            Tool::HintBox => 'b',
        }
    }

    pub fn from_hotkey(key: char) -> Option<Tool> {
        let key = key.to_ascii_lowercase();
        Tool::ALL.into_iter().find(|t| t.hotkey() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Drag => "✋ Drag",
            Tool::Template => "🔍 Find image",
            Tool::TemplateClick => "👆 Find & click",
            Tool::Ocr => "🔤 OCR",
            Tool::OcrClick => "📝 OCR & click",
            Tool::HintBox => "⬚ Hint box",
        }
    }

    /// Tool selected after the user picks `picked` while `self` is active.
    /// Picking the active tool again toggles back to drag.
    pub fn toggled(self, picked: Tool) -> Tool {
        if self == picked {
            Tool::Drag
        } else {
            picked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_type_mapping() {
        assert_eq!(Tool::Drag.definition_type(), None);
        assert_eq!(Tool::TemplateClick.definition_type(), Some(DefinitionType::Template));
        assert_eq!(Tool::OcrClick.definition_type(), Some(DefinitionType::Ocr));
        assert_eq!(Tool::HintBox.definition_type(), Some(DefinitionType::HintBox));
    }

    #[test]
    fn test_hotkeys() {
        assert_eq!(Tool::from_hotkey('v'), Some(Tool::Drag));
        assert_eq!(Tool::from_hotkey('R'), Some(Tool::TemplateClick));
        assert_eq!(Tool::from_hotkey('b'), Some(Tool::HintBox));
        assert_eq!(Tool::from_hotkey('x'), None);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Tool::Ocr.toggled(Tool::Ocr), Tool::Drag);
        assert_eq!(Tool::Drag.toggled(Tool::Ocr), Tool::Ocr);
    }
}
