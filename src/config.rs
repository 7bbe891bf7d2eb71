// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Read from `config.yaml` in the user's config directory (or an explicit
//! path). Every field has a default, so partial files are fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Debug server address, `host:port`
    #[serde(default = "default_device_host")]
    pub device_host: String,
    /// Pause between automatic screenshots
    #[serde(default = "default_capture_delay_ms")]
    pub capture_delay_ms: u64,
    /// Pause after a failed screenshot
    #[serde(default = "default_capture_error_backoff_ms")]
    pub capture_error_backoff_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_true")]
    pub auto_capture_on_start: bool,
}

fn default_device_host() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_capture_delay_ms() -> u64 {
    10
}

fn default_capture_error_backoff_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            device_host: default_device_host(),
            capture_delay_ms: default_capture_delay_ms(),
            capture_error_backoff_ms: default_capture_error_backoff_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            auto_capture_on_start: true,
        }
    }
}

impl RecorderConfig {
    pub fn capture_delay(&self) -> Duration {
        Duration::from_millis(self.capture_delay_ms)
    }

    pub fn capture_error_backoff(&self) -> Duration {
        Duration::from_millis(self.capture_error_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Default location of the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("script-recorder/config.yaml"))
        .unwrap_or_else(|| PathBuf::from("config.yaml"))
}

/// Parse a config file.
pub fn read_config(path: &Path) -> Result<RecorderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file is missing
/// or broken.
pub fn load_config(path: &Path) -> RecorderConfig {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return RecorderConfig::default();
    }
    match read_config(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{:#}. Using defaults.", e);
            RecorderConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: RecorderConfig = serde_yaml::from_str("device_host: 10.0.0.2:9000\n").unwrap();
        assert_eq!(config.device_host, "10.0.0.2:9000");
        assert_eq!(config.capture_delay_ms, 10);
        assert_eq!(config.capture_error_backoff_ms, 1000);
        assert!(config.auto_capture_on_start);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(&tmp.path().join("config.yaml"));
        assert_eq!(config, RecorderConfig::default());
    }

    #[test]
    fn test_broken_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "capture_delay_ms: [not, a, number]").unwrap();
        assert!(read_config(&path).is_err());
        assert_eq!(load_config(&path), RecorderConfig::default());
    }

    #[test]
    fn test_durations() {
        let config = RecorderConfig {
            capture_delay_ms: 25,
            ..Default::default()
        };
        assert_eq!(config.capture_delay(), Duration::from_millis(25));
    }
}
