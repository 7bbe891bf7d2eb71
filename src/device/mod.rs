// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Connection to the device debug server.
//!
//! The [`DeviceClient`] trait is the only way the rest of the application
//! talks to a device: grab a screenshot, or run a piece of script. The
//! capture loop and the code runner drive it from worker threads.

pub mod capture;
pub mod http;
pub mod runner;

#[cfg(test)]
pub mod mock;

use crate::io::media::Frame;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while talking to the device.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("device returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read response: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode screenshot: {0}")]
    Decode(#[from] image::ImageError),

    #[error("malformed response: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("worker stopped before reporting a result")]
    Disconnected,
}

/// Result of running a script on the device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunResult {
    Ok {
        #[serde(default)]
        result: Option<serde_json::Value>,
    },
    Error {
        #[serde(default)]
        message: String,
        #[serde(default)]
        traceback: Option<String>,
    },
}

/// A connected device.
pub trait DeviceClient: Send + Sync {
    /// Address of the debug server, `host:port`.
    fn host(&self) -> &str;

    /// Take a fresh screenshot.
    fn screenshot(&self) -> Result<Frame, DeviceError>;

    /// Execute script source on the device.
    fn run_code(&self, code: &str) -> Result<RunResult, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_result_parsing() {
        let ok: RunResult = serde_json::from_str(r#"{"status":"ok","result":[1,2]}"#).unwrap();
        assert_eq!(
            ok,
            RunResult::Ok {
                result: Some(serde_json::json!([1, 2]))
            }
        );

        let done: RunResult = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(done, RunResult::Ok { result: None });

        let err: RunResult = serde_json::from_str(
            r#"{"status":"error","message":"boom","traceback":"Traceback..."}"#,
        )
        .unwrap();
        assert_eq!(
            err,
            RunResult::Error {
                message: "boom".into(),
                traceback: Some("Traceback...".into())
            }
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_str::<RunResult>(r#"{"status":"maybe"}"#).is_err());
    }
}
