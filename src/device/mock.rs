// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scripted device used by tests.

use super::{DeviceClient, DeviceError, RunResult};
use crate::io::media::Frame;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

pub struct MockClient {
    calls: Mutex<Sender<()>>,
    gate: Mutex<Option<Receiver<()>>>,
    fail_screenshots: bool,
    run_reply: Mutex<Option<Result<RunResult, DeviceError>>>,
}

impl MockClient {
    /// A device that answers immediately. The receiver sees one message per
    /// screenshot request.
    pub fn new() -> (Self, Receiver<()>) {
        let (calls, seen) = channel();
        (
            Self {
                calls: Mutex::new(calls),
                gate: Mutex::new(None),
                fail_screenshots: false,
                run_reply: Mutex::new(None),
            },
            seen,
        )
    }

    /// A device whose screenshots block until the returned sender is signalled.
    pub fn gated() -> (Self, Receiver<()>, Sender<()>) {
        let (client, seen) = Self::new();
        let (open, gate) = channel();
        *client.gate.lock().unwrap() = Some(gate);
        (client, seen, open)
    }

    pub fn failing() -> (Self, Receiver<()>) {
        let (mut client, seen) = Self::new();
        client.fail_screenshots = true;
        (client, seen)
    }

    pub fn reply_with(self, reply: Result<RunResult, DeviceError>) -> Self {
        *self.run_reply.lock().unwrap() = Some(reply);
        self
    }
}

impl DeviceClient for MockClient {
    fn host(&self) -> &str {
        "mock:0"
    }

    fn screenshot(&self) -> Result<Frame, DeviceError> {
        let _ = self.calls.lock().unwrap().send(());
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            let _ = gate.recv_timeout(Duration::from_secs(5));
        }
        if self.fail_screenshots {
            return Err(DeviceError::Transport {
                url: "http://mock:0/api/screenshot".into(),
                message: "connection refused".into(),
            });
        }
        Ok(Frame::from_rgba(image::RgbaImage::new(4, 4)))
    }

    fn run_code(&self, _code: &str) -> Result<RunResult, DeviceError> {
        self.run_reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(RunResult::Ok { result: None }))
    }
}
