// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Saving and loading captures.
//!
//! A capture is a `<name>.png` image with a `<name>.png.json` sidecar
//! holding the annotation metadata.

use super::media::{load_frame, Frame};
use crate::models::metadata::ImageMetaData;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Files written by [`save_capture`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCapture {
    pub image: PathBuf,
    pub metadata: PathBuf,
}

/// Path of the metadata sidecar for an image.
pub fn sidecar_path(image: &Path) -> PathBuf {
    let mut name = image.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

/// Check a capture base name is usable as a file name.
pub fn validate_capture_name(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Name must not be empty");
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        bail!("Name must be a plain file name: {name}");
    }
    Ok(())
}

/// Export metadata to pretty-printed JSON.
pub fn export_json(data: &ImageMetaData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Import metadata from JSON.
pub fn import_json(path: &Path) -> Result<ImageMetaData> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(data)
}

/// Write `frame` as `<dir>/<name>.png` and `metadata` next to it.
pub fn save_capture(
    dir: &Path,
    name: &str,
    frame: &Frame,
    metadata: &ImageMetaData,
) -> Result<SavedCapture> {
    validate_capture_name(name)?;
    let image = dir.join(format!("{}.png", name.trim()));
    let sidecar = sidecar_path(&image);

    let png = frame.to_png()?;
    std::fs::write(&image, png)
        .with_context(|| format!("Failed to write {}", image.display()))?;
    export_json(metadata, &sidecar)?;

    log::info!(
        "Saved capture {} with {} annotations",
        image.display(),
        metadata.annotations.len()
    );
    Ok(SavedCapture {
        image,
        metadata: sidecar,
    })
}

/// Load an image and, if one exists, its metadata sidecar.
pub fn load_capture(image: &Path) -> Result<(Frame, Option<ImageMetaData>)> {
    let frame = load_frame(image)?;
    let sidecar = sidecar_path(image);
    let metadata = if sidecar.is_file() {
        let data = import_json(&sidecar)?;
        log::info!(
            "Imported {} annotations from {}",
            data.annotations.len(),
            sidecar.display()
        );
        Some(data)
    } else {
        None
    };
    Ok((frame, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Annotation, Geometry};
    use crate::models::definition::{Definition, DefinitionType};

    fn sample_metadata() -> ImageMetaData {
        let mut meta = ImageMetaData::new();
        let mut def = Definition::draft("a1", DefinitionType::Ocr);
        def.name = "Title".into();
        def.display_name = "Title text".into();
        let mut ann = Annotation::with_id(
            "a1",
            Geometry::Rect {
                x1: 1.0,
                y1: 2.0,
                x2: 30.0,
                y2: 40.0,
            },
        );
        ann.tip = Some("Title text".into());
        meta.insert(ann, def);
        meta
    }

    fn sample_frame() -> Frame {
        Frame::from_rgba(image::RgbaImage::from_pixel(
            8,
            6,
            image::Rgba([200, 100, 50, 255]),
        ))
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/tmp/foo.png")),
            PathBuf::from("/tmp/foo.png.json")
        );
    }

    #[test]
    fn test_save_writes_both_files() {
        let tmp = tempfile::tempdir().unwrap();
        let meta = sample_metadata();

        let saved = save_capture(tmp.path(), "foo", &sample_frame(), &meta).unwrap();
        assert_eq!(saved.image, tmp.path().join("foo.png"));
        assert_eq!(saved.metadata, tmp.path().join("foo.png.json"));

        let json = std::fs::read_to_string(&saved.metadata).unwrap();
        assert!(json.contains('\n'), "metadata should be pretty-printed");
        let restored: ImageMetaData = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, meta);
    }

    #[test]
    fn test_load_capture_reads_sidecar() {
        let tmp = tempfile::tempdir().unwrap();
        let meta = sample_metadata();
        let saved = save_capture(tmp.path(), "shot", &sample_frame(), &meta).unwrap();

        let (frame, loaded) = load_capture(&saved.image).unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));
        assert_eq!(loaded, Some(meta));
    }

    #[test]
    fn test_load_capture_without_sidecar() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bare.png");
        std::fs::write(&path, sample_frame().to_png().unwrap()).unwrap();

        let (_, loaded) = load_capture(&path).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let result = save_capture(&missing, "foo", &sample_frame(), &sample_metadata());
        assert!(result.is_err());
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_capture_name("home_button").is_ok());
        assert!(validate_capture_name("  ").is_err());
        assert!(validate_capture_name("..").is_err());
        assert!(validate_capture_name("a/b").is_err());
        assert!(validate_capture_name("a\\b").is_err());
    }
}
