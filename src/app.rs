// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the session, the capture loop and the code
//! runner, and routes actions from the views into them.

use crate::config::RecorderConfig;
use crate::device::{
    capture::CaptureLoop,
    runner::{CodeRunner, RunRequest},
    DeviceClient,
};
use crate::io::media::{self, Frame};
use crate::io::{
    export,
    storage::{verify_directory_permission, SessionStorage},
};
use crate::models::{metadata::ImageMetaData, tool::Tool};
use crate::recorder::handler::AnnotationEvent;
use crate::recorder::session::{NoticeLevel, Session};
use crate::script::template::DEFAULT_SCRIPT;
use crate::ui::{
    canvas,
    dialogs::{DialogOutcome, NamingDialog, SaveDialog},
    editor, properties, toolbar,
};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

/// Result of background image loading operation.
type LoadedCapture = Result<(Frame, Option<ImageMetaData>), String>;

/// Main application state.
pub struct RecorderApp {
    session: Session,
    storage: SessionStorage,
    capture: CaptureLoop,
    runner: CodeRunner,
    canvas: canvas::CanvasState,

    /// Open while a new annotation waits for its names
    naming: Option<NamingDialog>,
    /// Open while asking for the capture file name
    saving: Option<SaveDialog>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<LoadedCapture>>,
    /// Loading state message
    loading_message: Option<String>,
}

impl RecorderApp {
    pub fn new(config: &RecorderConfig, client: Arc<dyn DeviceClient>, storage: SessionStorage) -> Self {
        let code = storage
            .load_code()
            .unwrap_or_else(|| DEFAULT_SCRIPT.to_string());
        let directory = storage.restore_directory();

        let mut session = Session::new(code, directory.clone(), config.auto_capture_on_start);
        if let Some(dir) = directory {
            session.notify(NoticeLevel::Info, format!("Loaded folder {}", dir.display()));
        }

        log::info!("Using device at {}", client.host());
        let capture = CaptureLoop::new(
            client.clone(),
            config.capture_delay(),
            config.capture_error_backoff(),
        );

        Self {
            session,
            storage,
            capture,
            runner: CodeRunner::new(client),
            canvas: canvas::CanvasState::default(),
            naming: None,
            saving: None,
            image_loader: None,
            loading_message: None,
        }
    }

    fn dialog_open(&self) -> bool {
        self.naming.is_some() || self.saving.is_some()
    }

    /// Ask for a capture folder and remember it.
    fn open_directory(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        if !verify_directory_permission(&dir) {
            self.session.notify(
                NoticeLevel::Error,
                format!("Cannot write to {}", dir.display()),
            );
            return;
        }
        if let Err(e) = self.storage.save_directory(&dir) {
            log::warn!("Failed to remember folder: {:#}", e);
        }
        self.session
            .notify(NoticeLevel::Info, format!("Opened folder {}", dir.display()));
        self.session.directory = Some(dir);
    }

    /// Load an image file and its sidecar (asynchronously).
    fn open_capture_file(&mut self, path: PathBuf) {
        if self.session.edit_mode {
            self.session.notify(
                NoticeLevel::Warning,
                "Finish or cancel editing before opening another image",
            );
            return;
        }

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some(format!("Loading {}...", path.display()));

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = export::load_capture(&path).map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let image = dropped
            .into_iter()
            .filter_map(|f| f.path)
            .find(|p| media::is_image_path(p));
        if let Some(path) = image {
            log::info!("Image dropped: {}", path.display());
            self.open_capture_file(path);
        }
    }

    fn handle_hotkeys(&mut self, ctx: &egui::Context) {
        if self.dialog_open() || ctx.wants_keyboard_input() {
            return;
        }

        for tool in Tool::ALL {
            let Some(key) = egui::Key::from_name(&tool.hotkey().to_ascii_uppercase().to_string()) else {
                continue;
            };
            if ctx.input(|i| i.modifiers.is_none() && i.key_pressed(key)) {
                self.session.tool = tool;
            }
        }

        if self.session.edit_mode
            && ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace))
        {
            if let Some(id) = self.canvas.selected.take() {
                self.handle_annotation_event(AnnotationEvent::Remove(id));
            }
        }
    }

    fn handle_annotation_event(&mut self, event: AnnotationEvent) {
        if let AnnotationEvent::Remove(id) = &event {
            if self.canvas.selected.as_deref() == Some(id.as_str()) {
                self.canvas.selected = None;
            }
        }
        if self.session.on_annotation_event(event) {
            self.naming = Some(NamingDialog::new());
        }
    }

    fn show_naming_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.naming.as_mut() else {
            return;
        };
        match dialog.show(ctx) {
            DialogOutcome::Open => {}
            DialogOutcome::Confirmed(form) => match self.session.confirm_pending(&form) {
                Ok(_) => {
                    self.naming = None;
                    self.persist_code();
                }
                Err(e) => dialog.set_error(e.to_string()),
            },
            DialogOutcome::Cancelled => {
                self.session.cancel_pending();
                self.naming = None;
            }
        }
    }

    fn show_save_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.saving.as_mut() else {
            return;
        };
        match dialog.show(ctx) {
            DialogOutcome::Open => {}
            DialogOutcome::Confirmed(name) => match self.session.save_edit(&name) {
                Ok(saved) => {
                    self.saving = None;
                    self.canvas.selected = None;
                    self.session.notify(
                        NoticeLevel::Info,
                        format!("Saved {}", saved.image.display()),
                    );
                }
                Err(e) => {
                    let message = format!("Failed to save capture: {:#}", e);
                    dialog.set_error(message.clone());
                    self.session.notify(NoticeLevel::Error, message);
                }
            },
            DialogOutcome::Cancelled => self.saving = None,
        }
    }

    fn handle_toolbar(&mut self, action: toolbar::ToolbarAction) {
        use toolbar::ToolbarAction;
        match action {
            ToolbarAction::None => {}
            ToolbarAction::OpenDirectory => self.open_directory(),
            ToolbarAction::CaptureNow => self.capture.capture_once(),
            ToolbarAction::EnterEdit => {
                self.session.enter_edit_mode();
            }
            ToolbarAction::ConfirmEdit => {
                if self.naming.is_some() {
                    self.session
                        .notify(NoticeLevel::Warning, "Name the new annotation before saving");
                } else if self.session.directory.is_none() {
                    self.session
                        .notify(NoticeLevel::Warning, "Open a folder before saving");
                } else {
                    self.saving = Some(SaveDialog::new());
                }
            }
            ToolbarAction::CancelEdit => {
                self.naming = None;
                self.canvas.selected = None;
                self.session.cancel_edit();
            }
        }
    }

    fn handle_editor(&mut self, ctx: &egui::Context, output: editor::EditorOutput) {
        if output.changed {
            self.persist_code();
        }
        match output.action {
            editor::EditorAction::None => {}
            editor::EditorAction::Run => match self.runner.start(self.session.script.text()) {
                RunRequest::Started => {}
                RunRequest::Blank => self
                    .session
                    .notify(NoticeLevel::Warning, "Write some code first"),
                RunRequest::Busy => {}
            },
            editor::EditorAction::CopyAll => {
                let text = self.session.script.text().to_string();
                ctx.output_mut(|o| o.copied_text = text);
            }
            editor::EditorAction::CutAll => {
                let text = self.session.script.text().to_string();
                ctx.output_mut(|o| o.copied_text = text);
                self.session.script.replace("");
                self.persist_code();
            }
        }
    }

    fn persist_code(&mut self) {
        if let Err(e) = self.storage.save_code(self.session.script.text()) {
            log::warn!("Failed to save script: {:#}", e);
        }
    }

    /// Collect results from background work.
    fn poll_background(&mut self) {
        for event in self.capture.poll() {
            self.session.apply_capture(event);
        }

        if let Some(outcome) = self.runner.poll() {
            self.session.apply_run(outcome);
        }

        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;
                match result {
                    Ok((frame, metadata)) => {
                        if self.session.open_capture(frame, metadata) {
                            self.canvas.selected = None;
                            log::info!("Image loaded successfully");
                        }
                    }
                    Err(e) => self
                        .session
                        .notify(NoticeLevel::Error, format!("Failed to open image: {}", e)),
                }
            }
        }
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mode = if self.session.edit_mode { "Editing" } else { "Viewing" };
            ui.label(format!("{} · Tool: {:?}", mode, self.session.tool));
            ui.separator();
            ui.label(format!("{} annotations", self.session.metadata.annotations.len()));
            if let Some(frame) = &self.session.frame {
                ui.separator();
                ui.label(format!("{}x{}", frame.width(), frame.height()));
            }
            if let Some(notice) = &self.session.notice {
                ui.separator();
                let color = match notice.level {
                    NoticeLevel::Info => ui.visuals().text_color(),
                    NoticeLevel::Warning => egui::Color32::from_rgb(255, 200, 0),
                    NoticeLevel::Error => egui::Color32::from_rgb(255, 68, 68),
                };
                ui.colored_label(color, &notice.text);
            }
        });
    }

    fn show_drop_overlay(&self, ctx: &egui::Context) {
        if !ctx.input(|i| !i.raw.hovered_files.is_empty()) {
            return;
        }
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drop_overlay"),
        ));
        let screen = ctx.screen_rect();
        painter.rect_filled(screen, 0.0, egui::Color32::from_black_alpha(180));
        painter.text(
            screen.center(),
            egui::Align2::CENTER_CENTER,
            "Drop image here",
            egui::FontId::proportional(24.0),
            egui::Color32::WHITE,
        );
    }
}

impl eframe::App for RecorderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.capture.set_enabled(self.session.auto_capture);
        self.poll_background();
        self.handle_dropped_files(ctx);
        self.handle_hotkeys(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Folder...").clicked() {
                        self.open_directory();
                        ui.close_menu();
                    }
                    if ui.button("Open Capture...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "webp"])
                            .pick_file()
                        {
                            self.open_capture_file(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                if self.session.edit_mode {
                    toolbar::show_edit(ui, &mut self.session)
                } else {
                    toolbar::show_view(ui, &mut self.session, self.capture.manual_in_flight())
                }
            })
            .inner;
        self.handle_toolbar(toolbar_action);

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.show_status_bar(ui);
        });

        // Script editor (right side)
        let running = self.runner.is_busy();
        let editor_output = egui::SidePanel::right("script_editor")
            .default_width(480.0)
            .resizable(true)
            .show(ctx, |ui| editor::show(ui, &mut self.session.script, running))
            .inner;
        self.handle_editor(ctx, editor_output);

        // Annotation list (left side)
        if self.session.edit_mode || !self.session.metadata.is_empty() {
            let editable = self.session.edit_mode && !self.dialog_open();
            let properties_action = egui::SidePanel::left("annotations")
                .default_width(220.0)
                .show(ctx, |ui| {
                    properties::show(
                        ui,
                        &self.session.metadata,
                        self.canvas.selected.as_deref(),
                        editable,
                    )
                })
                .inner;
            match properties_action {
                properties::PropertiesAction::SelectAnnotation(id) => {
                    self.canvas.selected = Some(id);
                }
                properties::PropertiesAction::DeleteAnnotation(id) => {
                    self.handle_annotation_event(AnnotationEvent::Remove(id));
                }
                properties::PropertiesAction::None => {}
            }
        }

        // Main canvas (center)
        let editable = self.session.edit_mode && !self.dialog_open();
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.spinner();
                            ui.label(message);
                        });
                    });
                    canvas::CanvasAction::None
                } else {
                    canvas::show(
                        ui,
                        &mut self.canvas,
                        self.session.frame.as_ref(),
                        &self.session.metadata,
                        self.session.tool,
                        editable,
                    )
                }
            })
            .inner;

        match canvas_action {
            canvas::CanvasAction::Changed(event) => self.handle_annotation_event(event),
            canvas::CanvasAction::Select(id) => self.canvas.selected = id,
            canvas::CanvasAction::None => {}
        }

        self.show_naming_dialog(ctx);
        self.show_save_dialog(ctx);
        self.show_drop_overlay(ctx);

        // Stop or start capturing before the next frame arrives
        self.capture.set_enabled(self.session.auto_capture);

        if self.capture.is_enabled()
            || self.capture.manual_in_flight()
            || self.runner.is_busy()
            || self.image_loader.is_some()
        {
            ctx.request_repaint_after(Duration::from_millis(30));
        }
    }
}
