// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Screenshot and image handling.
//!
//! This module decodes screenshots and image files into frames and
//! converts them to formats suitable for display in egui or for saving
//! as PNG.

use anyhow::{Context, Result};
use image::RgbaImage;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// A decoded image shown on the canvas.
///
/// Every frame gets a unique revision so views can tell when the texture
/// needs to be uploaded again. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Frame {
    image: Arc<RgbaImage>,
    revision: u64,
}

impl Frame {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Encode the frame as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .context("Failed to encode frame as PNG")?;
        Ok(png)
    }
}

/// Decode image bytes of any supported format into a frame.
pub fn decode_frame(bytes: &[u8]) -> image::ImageResult<Frame> {
    let img = image::load_from_memory(bytes)?;
    Ok(Frame::from_rgba(img.to_rgba8()))
}

/// Load an image file into a frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let frame = decode_frame(&bytes)
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    log::info!(
        "Loaded image: {} ({}x{})",
        path.display(),
        frame.width(),
        frame.height()
    );
    Ok(frame)
}

/// Whether a path looks like an image file we can open.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| matches!(e.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "webp" | "gif"))
}
