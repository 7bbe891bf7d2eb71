// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Runs the script on the device without blocking the UI.

use super::{DeviceClient, DeviceError, RunResult};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

/// Answer to a run request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunRequest {
    Started,
    /// Nothing to run
    Blank,
    /// A previous run is still going
    Busy,
}

pub struct CodeRunner {
    client: Arc<dyn DeviceClient>,
    pending: Option<Receiver<Result<RunResult, DeviceError>>>,
}

impl CodeRunner {
    pub fn new(client: Arc<dyn DeviceClient>) -> Self {
        Self {
            client,
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self, code: &str) -> RunRequest {
        if self.is_busy() {
            return RunRequest::Busy;
        }
        if code.trim().is_empty() {
            return RunRequest::Blank;
        }

        let (sender, receiver) = channel();
        self.pending = Some(receiver);

        log::info!("Running script ({} bytes)", code.len());
        let client = self.client.clone();
        let code = code.to_string();
        std::thread::spawn(move || {
            let _ = sender.send(client.run_code(&code));
        });
        RunRequest::Started
    }

    /// The outcome of the current run once it is finished. The runner is
    /// idle again after this returns `Some`, whatever the outcome.
    pub fn poll(&mut self) -> Option<Result<RunResult, DeviceError>> {
        let receiver = self.pending.as_ref()?;
        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(DeviceError::Disconnected),
        };
        self.pending = None;
        Some(outcome)
    }
}
