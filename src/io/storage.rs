// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Durable session storage.
//!
//! A small JSON key/value file in the user's config directory. It keeps the
//! script text and the last chosen capture directory between sessions.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const CODE_KEY: &str = "scriptRecorder.code";
pub const DIRECTORY_KEY: &str = "scriptRecorder.directory";

/// Prefix of the throwaway file written by [`verify_directory_permission`].
const PROBE_PREFIX: &str = ".script-recorder-probe";

pub struct SessionStorage {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl SessionStorage {
    /// Location of the storage file for the current user.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("script-recorder/storage.json"))
            .unwrap_or_else(|| PathBuf::from("storage.json"))
    }

    /// Open the storage file. A missing or unreadable file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring corrupt storage file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Failed to read storage file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn load_code(&self) -> Option<String> {
        self.values
            .get(CODE_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    pub fn save_code(&mut self, code: &str) -> Result<()> {
        self.values
            .insert(CODE_KEY.to_string(), Value::String(code.to_string()));
        self.flush()
    }

    /// The stored directory, without checking it is still usable.
    pub fn load_directory(&self) -> Option<PathBuf> {
        self.values
            .get(DIRECTORY_KEY)
            .and_then(Value::as_str)
            .map(PathBuf::from)
    }

    pub fn save_directory(&mut self, dir: &Path) -> Result<()> {
        self.values.insert(
            DIRECTORY_KEY.to_string(),
            Value::String(dir.to_string_lossy().into_owned()),
        );
        self.flush()
    }

    /// The stored directory, only if it can still be read and written.
    pub fn restore_directory(&self) -> Option<PathBuf> {
        let dir = self.load_directory()?;
        if verify_directory_permission(&dir) {
            log::info!("Restored capture directory {}", dir.display());
            Some(dir)
        } else {
            log::warn!(
                "Stored capture directory {} is no longer writable; ignoring it",
                dir.display()
            );
            None
        }
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Whether `dir` is a directory we can list and create files in.
pub fn verify_directory_permission(dir: &Path) -> bool {
    if !dir.is_dir() || std::fs::read_dir(dir).is_err() {
        return false;
    }
    // A fresh name plus create_new never touches an existing file
    let probe = dir.join(format!("{}-{}", PROBE_PREFIX, uuid::Uuid::new_v4()));
    match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(file) => {
            drop(file);
            if let Err(e) = std::fs::remove_file(&probe) {
                log::warn!("Failed to remove {}: {}", probe.display(), e);
            }
            true
        }
        Err(e) => {
            log::debug!("{} is not writable: {}", dir.display(), e);
            false
        }
    }
}
