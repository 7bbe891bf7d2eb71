// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Code snippets generated for each tool.

use crate::models::{annotation::Annotation, definition::Definition, tool::Tool};

/// Script loaded when nothing has been saved yet.
pub const DEFAULT_SCRIPT: &str = "from kotonebot import *
from kotonebot.tasks import R
from kotonebot.backend.context import ContextStackVars

ContextStackVars.screenshot_mode = 'manual'

device.screenshot()
";

type Template = fn(&Definition, &Annotation) -> String;

fn find_image(d: &Definition, _a: &Annotation) -> String {
    format!("image.find(R.{})", d.name)
}

fn find_image_and_click(d: &Definition, _a: &Annotation) -> String {
    format!("if image.find(R.{}):\n\tdevice.click()", d.name)
}

fn find_text(d: &Definition, _a: &Annotation) -> String {
    format!("ocr.ocr(R.{})", d.name)
}

fn find_text_and_click(d: &Definition, _a: &Annotation) -> String {
    format!("if ocr.ocr(R.{}):\n\tdevice.click()", d.name)
}

fn template_for(tool: Tool) -> Option<Template> {
    match tool {
        Tool::Template => Some(find_image),
        Tool::TemplateClick => Some(find_image_and_click),
        Tool::Ocr => Some(find_text),
        Tool::OcrClick => Some(find_text_and_click),
        Tool::Drag | Tool::HintBox => None,
    }
}

/// Render the snippet for `tool`, if the tool generates code.
pub fn render(tool: Tool, definition: &Definition, annotation: &Annotation) -> Option<String> {
    template_for(tool).map(|t| t(definition, annotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::Geometry;
    use crate::models::definition::DefinitionType;

    fn named(name: &str) -> (Definition, Annotation) {
        let mut d = Definition::draft("id", DefinitionType::Template);
        d.name = name.to_string();
        (d, Annotation::with_id("id", Geometry::Point { x: 0.0, y: 0.0 }))
    }

    #[test]
    fn test_snippets() {
        let (d, a) = named("X");
        assert_eq!(render(Tool::Template, &d, &a).unwrap(), "image.find(R.X)");
        assert_eq!(
            render(Tool::TemplateClick, &d, &a).unwrap(),
            "if image.find(R.X):\n\tdevice.click()"
        );
        assert_eq!(render(Tool::Ocr, &d, &a).unwrap(), "ocr.ocr(R.X)");
        assert_eq!(
            render(Tool::OcrClick, &d, &a).unwrap(),
            "if ocr.ocr(R.X):\n\tdevice.click()"
        );
    }

    #[test]
    fn test_no_code_tools() {
        let (d, a) = named("X");
        assert!(render(Tool::Drag, &d, &a).is_none());
        assert!(render(Tool::HintBox, &d, &a).is_none());
    }
}
