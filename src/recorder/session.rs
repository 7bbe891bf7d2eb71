// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state.
//!
//! Everything the recorder UI mutates lives here: the active tool, the
//! script, the displayed frame, the annotation store and the mode flags.
//! The app owns one `Session` and hands it to views by reference.

use super::handler::{handle_event, AnnotationEvent, FormError, Handled, NameForm, PendingAdd};
use crate::device::capture::{CaptureEvent, CaptureOrigin};
use crate::device::{DeviceError, RunResult};
use crate::io::export::{save_capture, SavedCapture};
use crate::io::media::Frame;
use crate::models::{metadata::ImageMetaData, tool::Tool};
use crate::script::buffer::ScriptBuffer;
use anyhow::{anyhow, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

pub struct Session {
    pub tool: Tool,
    pub script: ScriptBuffer,
    pub metadata: ImageMetaData,
    pub frame: Option<Frame>,
    pub edit_mode: bool,
    pub auto_capture: bool,
    pub connected: bool,
    pub directory: Option<PathBuf>,
    pub notice: Option<Notice>,
    pending: Option<PendingAdd>,
}

impl Session {
    pub fn new(script: impl Into<String>, directory: Option<PathBuf>, auto_capture: bool) -> Self {
        Self {
            tool: Tool::Drag,
            script: ScriptBuffer::new(script),
            metadata: ImageMetaData::new(),
            frame: None,
            edit_mode: false,
            auto_capture,
            connected: false,
            directory,
            notice: None,
            pending: None,
        }
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            NoticeLevel::Info => log::info!("{}", text),
            NoticeLevel::Warning => log::warn!("{}", text),
            NoticeLevel::Error => log::error!("{}", text),
        }
        self.notice = Some(Notice { level, text });
    }

    /// Pick a tool from the toolbar or a hotkey.
    pub fn select_tool(&mut self, picked: Tool) {
        self.tool = self.tool.toggled(picked);
    }

    pub fn pending(&self) -> Option<&PendingAdd> {
        self.pending.as_ref()
    }

    /// Apply a canvas event. Returns true when the naming dialog must open.
    pub fn on_annotation_event(&mut self, event: AnnotationEvent) -> bool {
        if self.pending.is_some() && matches!(event, AnnotationEvent::Add(_)) {
            log::warn!("Ignoring new annotation while another one is being named");
            return false;
        }
        match handle_event(&mut self.metadata, event, self.tool) {
            Handled::Prompt(pending) => {
                self.pending = Some(pending);
                true
            }
            Handled::Applied | Handled::Ignored => false,
        }
    }

    /// Name the pending annotation. An invalid form keeps it pending.
    pub fn confirm_pending(&mut self, form: &NameForm) -> Result<Option<String>, FormError> {
        form.validate()?;
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        let snippet = pending.commit(&mut self.metadata, form, &mut self.script);
        self.tool = Tool::Drag;
        Ok(snippet)
    }

    /// Drop the pending annotation as if it was never drawn.
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.rollback(&mut self.metadata);
        }
        self.tool = Tool::Drag;
    }

    /// Freeze the current frame for annotating. Needs a directory to save into.
    pub fn enter_edit_mode(&mut self) -> bool {
        if self.directory.is_none() {
            self.notify(NoticeLevel::Warning, "Open a folder before editing");
            return false;
        }
        if self.frame.is_none() {
            self.notify(NoticeLevel::Warning, "No screenshot to edit yet");
            return false;
        }
        self.edit_mode = true;
        self.auto_capture = false;
        log::info!("Entered edit mode");
        true
    }

    /// Leave edit mode throwing away all annotations.
    pub fn cancel_edit(&mut self) {
        self.cancel_pending();
        self.metadata.clear();
        self.tool = Tool::Drag;
        self.edit_mode = false;
        log::info!("Left edit mode without saving");
    }

    /// Save the frame and its annotations as `<name>.png` and `<name>.png.json`.
    /// Only on success is the store cleared and edit mode left.
    pub fn save_edit(&mut self, name: &str) -> Result<SavedCapture> {
        if self.pending.is_some() {
            return Err(anyhow!("Name the new annotation before saving"));
        }
        let dir = self
            .directory
            .clone()
            .ok_or_else(|| anyhow!("No folder selected"))?;
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| anyhow!("No screenshot to save"))?;

        let saved = save_capture(&dir, name, frame, &self.metadata)?;
        self.metadata.clear();
        self.tool = Tool::Drag;
        self.edit_mode = false;
        Ok(saved)
    }

    /// Apply a finished capture. Frames never replace the image being edited.
    pub fn apply_capture(&mut self, event: CaptureEvent) {
        match event.result {
            Ok(frame) => {
                if !self.connected {
                    log::info!("Device connected");
                }
                self.connected = true;
                if self.edit_mode {
                    log::debug!("Ignoring {:?} capture in edit mode", event.origin);
                    return;
                }
                // Annotations opened from disk belong to the old image
                if !self.metadata.is_empty() {
                    log::info!("Live screenshot replaced the opened capture");
                    self.metadata.clear();
                }
                self.frame = Some(frame);
            }
            Err(e) => {
                if self.connected || event.origin == CaptureOrigin::Manual {
                    self.notify(NoticeLevel::Warning, format!("Screenshot failed: {e}"));
                }
                self.connected = false;
            }
        }
    }

    /// Report a finished script run. Any answer from the device proves it
    /// is reachable; a transport failure proves it is not.
    pub fn apply_run(&mut self, outcome: Result<RunResult, DeviceError>) {
        match outcome {
            Ok(RunResult::Ok { result }) => {
                self.connected = true;
                match result {
                    Some(value) => self.notify(NoticeLevel::Info, format!("Run finished: {}", value)),
                    None => self.notify(NoticeLevel::Info, "Run finished"),
                }
            }
            Ok(RunResult::Error { message, traceback }) => {
                self.connected = true;
                if let Some(traceback) = traceback {
                    log::error!("Script traceback:\n{}", traceback);
                }
                self.notify(NoticeLevel::Error, format!("Run failed: {}", message));
            }
            Err(e) => {
                self.connected =
                    !matches!(e, DeviceError::Transport { .. } | DeviceError::Disconnected);
                self.notify(NoticeLevel::Error, format!("Failed to run script: {}", e));
            }
        }
    }

    /// Show an image opened from disk, with its metadata if it had any.
    pub fn open_capture(&mut self, frame: Frame, metadata: Option<ImageMetaData>) -> bool {
        if self.edit_mode {
            self.notify(
                NoticeLevel::Warning,
                "Finish or cancel editing before opening another image",
            );
            return false;
        }
        self.auto_capture = false;
        self.frame = Some(frame);
        self.metadata = metadata.unwrap_or_default();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Annotation, Geometry};

    fn frame() -> Frame {
        Frame::from_rgba(image::RgbaImage::new(4, 4))
    }

    fn editing_session(dir: PathBuf) -> Session {
        let mut session = Session::new("", Some(dir), true);
        session.frame = Some(frame());
        assert!(session.enter_edit_mode());
        session
    }

    fn add(session: &mut Session, id: &str) -> bool {
        session.on_annotation_event(AnnotationEvent::Add(Annotation::with_id(
            id,
            Geometry::Point { x: 2.0, y: 2.0 },
        )))
    }

    #[test]
    fn test_drag_add_produces_no_prompt() {
        let mut session = Session::new("", None, false);
        assert!(!add(&mut session, "a"));
        assert!(session.metadata.is_empty());
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_tool_is_pinned_at_add_time() {
        let mut session = Session::new("", None, false);
        session.select_tool(Tool::TemplateClick);
        assert!(add(&mut session, "a"));

        // Tool changes while the dialog is open.
        session.select_tool(Tool::Ocr);
        let snippet = session
            .confirm_pending(&NameForm::new("Go", "Go button"))
            .unwrap();
        assert_eq!(snippet.as_deref(), Some("if image.find(R.Go):\n\tdevice.click()"));
        assert_eq!(session.tool, Tool::Drag);
    }

    #[test]
    fn test_cancel_restores_store_and_resets_tool() {
        let mut session = Session::new("", None, false);
        session.select_tool(Tool::Template);
        assert!(add(&mut session, "a"));
        session.confirm_pending(&NameForm::new("A", "a")).unwrap();
        let before = session.metadata.clone();

        session.select_tool(Tool::Ocr);
        assert!(add(&mut session, "c"));
        session.cancel_pending();
        assert_eq!(session.metadata, before);
        assert_eq!(session.tool, Tool::Drag);
    }

    #[test]
    fn test_invalid_form_keeps_pending() {
        let mut session = Session::new("", None, false);
        session.select_tool(Tool::Ocr);
        add(&mut session, "a");
        assert!(session.confirm_pending(&NameForm::new("", "")).is_err());
        assert!(session.pending().is_some());
        assert_eq!(session.tool, Tool::Ocr);
    }

    #[test]
    fn test_second_add_while_pending_is_ignored() {
        let mut session = Session::new("", None, false);
        session.select_tool(Tool::Ocr);
        assert!(add(&mut session, "a"));
        assert!(!add(&mut session, "b"));
        assert!(session.metadata.annotation("b").is_none());
    }

    #[test]
    fn test_snippet_goes_to_caret() {
        let mut session = Session::new("device.screenshot()", None, false);
        session.select_tool(Tool::Template);
        add(&mut session, "a");
        session
            .confirm_pending(&NameForm::new("Logo", "Logo"))
            .unwrap();
        assert_eq!(session.script.text(), "device.screenshot()\nimage.find(R.Logo)");
    }

    #[test]
    fn test_enter_edit_requires_directory() {
        let mut session = Session::new("", None, true);
        session.frame = Some(frame());
        assert!(!session.enter_edit_mode());
        assert!(!session.edit_mode);
        assert!(session.auto_capture);
        assert_eq!(session.notice.as_ref().unwrap().level, NoticeLevel::Warning);
    }

    #[test]
    fn test_enter_edit_stops_auto_capture() {
        let tmp = tempfile::tempdir().unwrap();
        let session = editing_session(tmp.path().to_path_buf());
        assert!(session.edit_mode);
        assert!(!session.auto_capture);
    }

    #[test]
    fn test_save_writes_files_and_clears() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = editing_session(tmp.path().to_path_buf());
        session.select_tool(Tool::Ocr);
        add(&mut session, "a");
        session.confirm_pending(&NameForm::new("Title", "Title")).unwrap();
        let snapshot = session.metadata.clone();

        let saved = session.save_edit("foo").unwrap();
        assert!(tmp.path().join("foo.png").is_file());
        let json = std::fs::read_to_string(saved.metadata).unwrap();
        let restored: ImageMetaData = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);

        assert!(session.metadata.is_empty());
        assert!(!session.edit_mode);
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("removed");
        std::fs::create_dir(&dir).unwrap();
        let mut session = editing_session(dir.clone());
        session.select_tool(Tool::Ocr);
        add(&mut session, "a");
        session.confirm_pending(&NameForm::new("Title", "Title")).unwrap();
        std::fs::remove_dir(&dir).unwrap();

        assert!(session.save_edit("foo").is_err());
        assert!(session.edit_mode);
        assert!(session.metadata.annotation("a").is_some());
    }

    #[test]
    fn test_cancel_edit_clears_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = editing_session(tmp.path().to_path_buf());
        session.select_tool(Tool::Ocr);
        add(&mut session, "a");
        session.cancel_edit();
        assert!(session.metadata.is_empty());
        assert!(session.pending().is_none());
        assert!(!session.edit_mode);
        assert_eq!(session.tool, Tool::Drag);
    }

    #[test]
    fn test_capture_ignored_in_edit_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = editing_session(tmp.path().to_path_buf());
        let shown = session.frame.as_ref().unwrap().revision();

        session.apply_capture(CaptureEvent {
            origin: CaptureOrigin::Manual,
            result: Ok(frame()),
        });
        assert_eq!(session.frame.as_ref().unwrap().revision(), shown);
        assert!(session.connected);
    }

    #[test]
    fn test_capture_failure_marks_disconnected() {
        let mut session = Session::new("", None, true);
        session.apply_capture(CaptureEvent {
            origin: CaptureOrigin::Auto,
            result: Ok(frame()),
        });
        assert!(session.connected);
        session.apply_capture(CaptureEvent {
            origin: CaptureOrigin::Auto,
            result: Err("timed out".into()),
        });
        assert!(!session.connected);
        assert!(session.notice.is_some());
    }

    #[test]
    fn test_open_capture_loads_metadata() {
        let mut session = Session::new("", None, true);
        let mut meta = ImageMetaData::new();
        meta.insert(
            Annotation::with_id("x", Geometry::Point { x: 0.0, y: 0.0 }),
            crate::models::definition::Definition::draft(
                "x",
                crate::models::definition::DefinitionType::HintBox,
            ),
        );
        assert!(session.open_capture(frame(), Some(meta.clone())));
        assert!(!session.auto_capture);
        assert_eq!(session.metadata, meta);
    }
    #[test]
    fn test_save_refused_while_naming() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = editing_session(tmp.path().to_path_buf());
        session.select_tool(Tool::Ocr);
        assert!(add(&mut session, "draft"));

        assert!(session.save_edit("foo").is_err());
        assert!(!tmp.path().join("foo.png.json").exists());
        assert!(session.edit_mode);

        // The pending annotation can still be named afterwards.
        let snippet = session
            .confirm_pending(&NameForm::new("Late", "Late"))
            .unwrap();
        assert_eq!(snippet.as_deref(), Some("ocr.ocr(R.Late)"));
        assert_eq!(session.metadata.definition("draft").unwrap().name, "Late");
    }

    #[test]
    fn test_live_frame_drops_opened_metadata() {
        let mut session = Session::new("", None, true);
        let mut meta = ImageMetaData::new();
        meta.insert(
            Annotation::with_id("x", Geometry::Point { x: 0.0, y: 0.0 }),
            crate::models::definition::Definition::draft(
                "x",
                crate::models::definition::DefinitionType::HintBox,
            ),
        );
        assert!(session.open_capture(frame(), Some(meta)));

        session.auto_capture = true;
        session.apply_capture(CaptureEvent {
            origin: CaptureOrigin::Auto,
            result: Ok(frame()),
        });
        assert!(session.metadata.is_empty());
    }

    #[test]
    fn test_run_results_update_connectivity() {
        let mut session = Session::new("", None, false);
        session.apply_run(Ok(RunResult::Ok { result: None }));
        assert!(session.connected);

        session.apply_run(Err(DeviceError::Transport {
            url: "http://127.0.0.1:8000/api/code/run".into(),
            message: "connection refused".into(),
        }));
        assert!(!session.connected);
        assert_eq!(session.notice.as_ref().unwrap().level, NoticeLevel::Error);

        session.apply_run(Ok(RunResult::Error {
            message: "NameError".into(),
            traceback: Some("Traceback".into()),
        }));
        assert!(session.connected);
    }
}
