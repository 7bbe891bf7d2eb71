// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Screenshot capture loop.
//!
//! While enabled, a worker thread repeatedly sleeps for a short delay,
//! requests a screenshot and sends it back over a channel. The next request
//! is only scheduled after the previous one finished, so a slow device
//! throttles the loop instead of piling up requests.
//!
//! Cancellation is cooperative. Every run owns a flag that is checked before
//! each request and again before its result is published, and every run has
//! an epoch so [`CaptureLoop::poll`] can drop results from a run that has
//! already been switched off.

use super::DeviceClient;
use crate::io::media::Frame;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

/// Where a capture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOrigin {
    Auto,
    Manual,
}

/// A finished capture, as seen by the UI thread.
#[derive(Debug)]
pub struct CaptureEvent {
    pub origin: CaptureOrigin,
    pub result: Result<Frame, String>,
}

struct Message {
    epoch: u64,
    event: CaptureEvent,
}

pub struct CaptureLoop {
    client: Arc<dyn DeviceClient>,
    delay: Duration,
    error_backoff: Duration,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    /// Flag of the active run, if any
    run: Option<Arc<AtomicBool>>,
    epoch: u64,
    manual_in_flight: bool,
}

impl CaptureLoop {
    pub fn new(client: Arc<dyn DeviceClient>, delay: Duration, error_backoff: Duration) -> Self {
        let (sender, receiver) = channel();
        Self {
            client,
            delay,
            error_backoff,
            sender,
            receiver,
            run: None,
            epoch: 0,
            manual_in_flight: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.run.is_some()
    }

    pub fn manual_in_flight(&self) -> bool {
        self.manual_in_flight
    }

    /// Start or stop the loop. Does nothing if already in the requested state.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.is_enabled() {
            return;
        }

        if let Some(run) = self.run.take() {
            run.store(false, Ordering::Release);
            log::info!("Auto capture stopped");
            return;
        }

        self.epoch += 1;
        let run = Arc::new(AtomicBool::new(true));
        self.run = Some(run.clone());

        let client = self.client.clone();
        let sender = self.sender.clone();
        let epoch = self.epoch;
        let delay = self.delay;
        let backoff = self.error_backoff;

        std::thread::spawn(move || {
            capture_worker(client, sender, run, epoch, delay, backoff);
        });
        log::info!("Auto capture started (run {})", epoch);
    }

    /// Take a single screenshot in the background.
    pub fn capture_once(&mut self) {
        if self.manual_in_flight {
            return;
        }
        self.manual_in_flight = true;

        let client = self.client.clone();
        let sender = self.sender.clone();
        let epoch = self.epoch;
        std::thread::spawn(move || {
            let result = client.screenshot().map_err(|e| e.to_string());
            let _ = sender.send(Message {
                epoch,
                event: CaptureEvent {
                    origin: CaptureOrigin::Manual,
                    result,
                },
            });
        });
    }

    /// Drain finished captures. Automatic captures from a run that is no
    /// longer active are discarded here.
    pub fn poll(&mut self) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            match message.event.origin {
                CaptureOrigin::Manual => {
                    self.manual_in_flight = false;
                    events.push(message.event);
                }
                CaptureOrigin::Auto => {
                    if self.is_enabled() && message.epoch == self.epoch {
                        events.push(message.event);
                    } else {
                        log::debug!("Dropped stale capture from run {}", message.epoch);
                    }
                }
            }
        }
        events
    }
}

impl Drop for CaptureLoop {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.store(false, Ordering::Release);
        }
    }
}

fn capture_worker(
    client: Arc<dyn DeviceClient>,
    sender: Sender<Message>,
    run: Arc<AtomicBool>,
    epoch: u64,
    delay: Duration,
    error_backoff: Duration,
) {
    let mut wait = delay;
    loop {
        std::thread::sleep(wait);
        if !run.load(Ordering::Acquire) {
            break;
        }

        let result = client.screenshot();
        if !run.load(Ordering::Acquire) {
            log::debug!("Capture run {} stopped during a request; result dropped", epoch);
            break;
        }

        let result = match result {
            Ok(frame) => {
                wait = delay;
                Ok(frame)
            }
            Err(e) => {
                wait = error_backoff;
                Err(e.to_string())
            }
        };

        let message = Message {
            epoch,
            event: CaptureEvent {
                origin: CaptureOrigin::Auto,
                result,
            },
        };
        if sender.send(message).is_err() {
            break;
        }
    }
    log::debug!("Capture run {} finished", epoch);
}
