// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the transformation between screen coordinates on
//! the canvas and pixel coordinates in the displayed image.

use crate::models::annotation::Point;

/// Placement of an image scaled to fit a viewport and centered in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageView {
    pub origin_x: f64,
    pub origin_y: f64,
    /// Screen units per image pixel
    pub scale: f64,
    pub image_width: u32,
    pub image_height: u32,
}

impl ImageView {
    /// Fit an image into the viewport `(x, y, width, height)`, keeping its aspect ratio.
    pub fn fit(image_width: u32, image_height: u32, viewport: (f64, f64, f64, f64)) -> Self {
        let (vx, vy, vw, vh) = viewport;
        let iw = image_width.max(1) as f64;
        let ih = image_height.max(1) as f64;
        let scale = (vw / iw).min(vh / ih);
        Self {
            origin_x: vx + (vw - iw * scale) / 2.0,
            origin_y: vy + (vh - ih * scale) / 2.0,
            scale,
            image_width,
            image_height,
        }
    }

    /// Size of the image on screen.
    pub fn display_size(&self) -> (f64, f64) {
        (
            self.image_width as f64 * self.scale,
            self.image_height as f64 * self.scale,
        )
    }

    /// Convert screen coordinates to image pixel coordinates.
    pub fn to_image(&self, screen_x: f64, screen_y: f64) -> Point {
        Point {
            x: (screen_x - self.origin_x) / self.scale,
            y: (screen_y - self.origin_y) / self.scale,
        }
    }

    /// Convert image pixel coordinates to screen coordinates.
    pub fn to_screen(&self, point: &Point) -> (f64, f64) {
        (
            self.origin_x + point.x * self.scale,
            self.origin_y + point.y * self.scale,
        )
    }

    /// Clamp a point to the image bounds.
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.clamp(0.0, self.image_width as f64),
            y: point.y.clamp(0.0, self.image_height as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_image_roundtrip() {
        let view = ImageView::fit(1920, 1080, (10.0, 20.0, 800.0, 600.0));
        let p = Point::new(960.0, 540.0);
        let (sx, sy) = view.to_screen(&p);
        let back = view.to_image(sx, sy);
        assert!((back.x - p.x).abs() < 0.0001);
        assert!((back.y - p.y).abs() < 0.0001);
    }

    #[test]
    fn test_fit_wide_image_centers_vertically() {
        // 2:1 image in a square viewport fits the width
        let view = ImageView::fit(200, 100, (0.0, 0.0, 100.0, 100.0));
        assert_eq!(view.scale, 0.5);
        assert_eq!(view.origin_x, 0.0);
        assert_eq!(view.origin_y, 25.0);
        assert_eq!(view.display_size(), (100.0, 50.0));
    }

    #[test]
    fn test_corners() {
        let view = ImageView::fit(720, 1280, (0.0, 0.0, 360.0, 640.0));
        let tl = view.to_image(0.0, 0.0);
        assert_eq!((tl.x, tl.y), (0.0, 0.0));
        let br = view.to_image(360.0, 640.0);
        assert_eq!((br.x, br.y), (720.0, 1280.0));
    }

    #[test]
    fn test_clamp() {
        let view = ImageView::fit(100, 100, (0.0, 0.0, 100.0, 100.0));
        let p = view.clamp(Point::new(-5.0, 150.0));
        assert_eq!((p.x, p.y), (0.0, 100.0));
    }
}
