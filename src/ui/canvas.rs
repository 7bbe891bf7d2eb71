// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the screenshot and its annotations.
//!
//! This module shows the current frame scaled to fit, draws the
//! annotations on top and turns mouse gestures into annotation events:
//! with a drawing tool a drag creates a rectangle and a click creates a
//! point; with the drag tool annotations can be selected and moved.

use crate::io::media::Frame;
use crate::models::{
    annotation::{Annotation, Geometry, Point},
    definition::DefinitionType,
    metadata::ImageMetaData,
    tool::Tool,
};
use crate::recorder::handler::AnnotationEvent;
use crate::util::geometry::ImageView;

/// Shapes smaller than this (in screen units) become points.
const MIN_RECT_SIZE: f32 = 4.0;
/// Hit test tolerance in screen units.
const HIT_TOLERANCE: f64 = 6.0;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    Changed(AnnotationEvent),
    Select(Option<String>),
}

/// Canvas state kept between frames.
#[derive(Default)]
pub struct CanvasState {
    texture: Option<(u64, egui::TextureHandle)>,
    /// Image position where the current rectangle started
    draw_start: Option<Point>,
    /// Annotation being moved and where it was grabbed
    grab: Option<(String, Point)>,
    pub selected: Option<String>,
}

impl CanvasState {
    fn texture_for(&mut self, ctx: &egui::Context, frame: &Frame) -> egui::TextureHandle {
        match &self.texture {
            Some((revision, handle)) if *revision == frame.revision() => handle.clone(),
            _ => {
                let size = [frame.width() as usize, frame.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, frame.pixels());
                let handle = ctx.load_texture("screenshot", color_image, egui::TextureOptions::LINEAR);
                self.texture = Some((frame.revision(), handle.clone()));
                handle
            }
        }
    }

    /// Forget any gesture in progress.
    pub fn reset_gesture(&mut self) {
        self.draw_start = None;
        self.grab = None;
    }
}

/// Display the canvas and handle mouse interactions.
///
/// `editable` is false outside edit mode and while a dialog is open.
pub fn show(
    ui: &mut egui::Ui,
    state: &mut CanvasState,
    frame: Option<&Frame>,
    metadata: &ImageMetaData,
    tool: Tool,
    editable: bool,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let Some(frame) = frame else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Waiting for a screenshot, or drop an image here")
                        .color(egui::Color32::from_gray(180)),
                );
            });
            return;
        };

        let texture = state.texture_for(ui.ctx(), frame);
        let area = ui.max_rect();
        let view = ImageView::fit(
            frame.width(),
            frame.height(),
            (
                area.min.x as f64,
                area.min.y as f64,
                area.width() as f64,
                area.height() as f64,
            ),
        );
        let (display_width, display_height) = view.display_size();
        let image_rect = egui::Rect::from_min_size(
            egui::pos2(view.origin_x as f32, view.origin_y as f32),
            egui::vec2(display_width as f32, display_height as f32),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if editable {
            action = interact(ui, state, &view, image_rect, metadata, tool);
        } else {
            state.reset_gesture();
        }

        let painter = ui.painter_at(image_rect);
        let grab_offset = state.grab.as_ref().and_then(|(id, start)| {
            let pos = ui.ctx().pointer_interact_pos()?;
            let now = view.to_image(pos.x as f64, pos.y as f64);
            Some((id.clone(), now.x - start.x, now.y - start.y))
        });

        for annotation in &metadata.annotations {
            let definition_type = metadata
                .definition(&annotation.id)
                .map(|d| d.definition_type);
            let selected = state.selected.as_deref() == Some(annotation.id.as_str());
            let geometry = match &grab_offset {
                Some((id, dx, dy)) if *id == annotation.id => annotation.geometry.translated(*dx, *dy),
                _ => annotation.geometry,
            };
            draw_annotation(
                &painter,
                &view,
                &geometry,
                annotation.tip.as_deref(),
                color_for(definition_type),
                selected,
            );
        }

        // Rectangle being drawn
        if let (Some(start), Some(pos)) = (state.draw_start, ui.ctx().pointer_interact_pos()) {
            let end = view.clamp(view.to_image(pos.x as f64, pos.y as f64));
            let preview = Geometry::rect_from_corners(start, end);
            draw_annotation(&painter, &view, &preview, None, egui::Color32::WHITE, false);
        }
    });

    action
}

fn interact(
    ui: &mut egui::Ui,
    state: &mut CanvasState,
    view: &ImageView,
    image_rect: egui::Rect,
    metadata: &ImageMetaData,
    tool: Tool,
) -> CanvasAction {
    let response = ui.allocate_rect(image_rect, egui::Sense::click_and_drag());
    let to_image = |pos: egui::Pos2| view.clamp(view.to_image(pos.x as f64, pos.y as f64));
    let press_origin = ui.input(|i| i.pointer.press_origin());
    let pointer = response
        .interact_pointer_pos()
        .or_else(|| ui.input(|i| i.pointer.latest_pos()));

    if tool.draws() {
        if response.drag_started() {
            state.draw_start = press_origin.map(to_image);
        }
        if response.drag_stopped() {
            if let (Some(start), Some(pos)) = (state.draw_start.take(), pointer) {
                let end = to_image(pos);
                let (sx, sy) = view.to_screen(&start);
                let (ex, ey) = view.to_screen(&end);
                let geometry = if ((ex - sx).abs() as f32) < MIN_RECT_SIZE
                    && ((ey - sy).abs() as f32) < MIN_RECT_SIZE
                {
                    Geometry::Point { x: end.x, y: end.y }
                } else {
                    Geometry::rect_from_corners(start, end)
                };
                return CanvasAction::Changed(AnnotationEvent::Add(Annotation::new(geometry)));
            }
        }
        if response.clicked() {
            if let Some(pos) = pointer {
                let p = to_image(pos);
                return CanvasAction::Changed(AnnotationEvent::Add(Annotation::new(
                    Geometry::Point { x: p.x, y: p.y },
                )));
            }
        }
        return CanvasAction::None;
    }

    let tolerance = HIT_TOLERANCE / view.scale;
    if response.drag_started() {
        if let Some(origin) = press_origin.map(to_image) {
            if let Some(hit) = hit_test(metadata, origin, tolerance) {
                state.selected = Some(hit.id.clone());
                state.grab = Some((hit.id.clone(), origin));
            }
        }
    }
    if response.drag_stopped() {
        if let (Some((id, start)), Some(pos)) = (state.grab.take(), pointer) {
            let end = view.to_image(pos.x as f64, pos.y as f64);
            if let Some(annotation) = metadata.annotation(&id) {
                let moved = Annotation {
                    geometry: annotation.geometry.translated(end.x - start.x, end.y - start.y),
                    tip: None,
                    id,
                };
                return CanvasAction::Changed(AnnotationEvent::Update(moved));
            }
        }
    }
    if response.clicked() {
        let hit = pointer
            .map(to_image)
            .and_then(|p| hit_test(metadata, p, tolerance))
            .map(|a| a.id.clone());
        state.selected = hit.clone();
        return CanvasAction::Select(hit);
    }
    CanvasAction::None
}

/// Topmost annotation under `point`.
fn hit_test(metadata: &ImageMetaData, point: Point, tolerance: f64) -> Option<&Annotation> {
    metadata
        .annotations
        .iter()
        .rev()
        .find(|a| a.geometry.contains(point, tolerance))
}

fn color_for(definition_type: Option<DefinitionType>) -> egui::Color32 {
    match definition_type {
        Some(DefinitionType::Template) => egui::Color32::YELLOW,
        Some(DefinitionType::Ocr) => egui::Color32::LIGHT_BLUE,
        Some(DefinitionType::HintBox) => egui::Color32::LIGHT_GREEN,
        None => egui::Color32::GRAY,
    }
}

/// Draw an annotation on the canvas.
fn draw_annotation(
    painter: &egui::Painter,
    view: &ImageView,
    geometry: &Geometry,
    tip: Option<&str>,
    color: egui::Color32,
    selected: bool,
) {
    let width = if selected { 3.0 } else { 2.0 };
    let to_pos = |p: Point| {
        let (x, y) = view.to_screen(&p);
        egui::pos2(x as f32, y as f32)
    };

    let anchor = match *geometry {
        Geometry::Rect { x1, y1, x2, y2 } => {
            let rect = egui::Rect::from_min_max(to_pos(Point::new(x1, y1)), to_pos(Point::new(x2, y2)));
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(width, color));
            rect.left_top()
        }
        Geometry::Point { x, y } => {
            let center = to_pos(Point::new(x, y));
            painter.circle_filled(center, 4.0, color);
            painter.circle_stroke(center, 4.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
            center - egui::vec2(0.0, 6.0)
        }
    };

    if let Some(tip) = tip {
        painter.text(
            anchor - egui::vec2(0.0, 2.0),
            egui::Align2::LEFT_BOTTOM,
            tip,
            egui::FontId::proportional(13.0),
            color,
        );
    }
}
