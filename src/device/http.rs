// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! HTTP client for the device debug server.

use super::{DeviceClient, DeviceError, RunResult};
use crate::io::media::{decode_frame, Frame};
use std::io::Read;
use std::time::Duration;

/// Largest screenshot body accepted.
const MAX_SCREENSHOT_BYTES: u64 = 64 * 1024 * 1024;

pub struct HttpDeviceClient {
    host: String,
    agent: ureq::Agent,
}

impl HttpDeviceClient {
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            host: host.into(),
            agent,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.host, path)
    }
}

fn map_error(url: &str, error: ureq::Error) -> DeviceError {
    match error {
        ureq::Error::Status(status, _) => DeviceError::Status {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(t) => DeviceError::Transport {
            url: url.to_string(),
            message: t.to_string(),
        },
    }
}

impl DeviceClient for HttpDeviceClient {
    fn host(&self) -> &str {
        &self.host
    }

    fn screenshot(&self) -> Result<Frame, DeviceError> {
        let url = self.url("/api/screenshot");
        let response = self.agent.get(&url).call().map_err(|e| map_error(&url, e))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_SCREENSHOT_BYTES)
            .read_to_end(&mut bytes)?;

        log::debug!("Received screenshot ({} bytes)", bytes.len());
        Ok(decode_frame(&bytes)?)
    }

    fn run_code(&self, code: &str) -> Result<RunResult, DeviceError> {
        let url = self.url("/api/code/run");
        let response = self
            .agent
            .post(&url)
            .send_json(serde_json::json!({ "code": code }))
            .map_err(|e| map_error(&url, e))?;

        let body = response.into_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}
