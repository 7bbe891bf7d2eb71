// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! An annotation is a shape drawn over the screenshot: either a rectangle
//! or a single point, in image pixel coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Shape of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Rect { x1: f64, y1: f64, x2: f64, y2: f64 },
    Point { x: f64, y: f64 },
}

impl Geometry {
    /// Build a rectangle from two arbitrary corners.
    pub fn rect_from_corners(a: Point, b: Point) -> Self {
        Geometry::Rect {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    /// Move the whole shape by the given offset.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        match *self {
            Geometry::Rect { x1, y1, x2, y2 } => Geometry::Rect {
                x1: x1 + dx,
                y1: y1 + dy,
                x2: x2 + dx,
                y2: y2 + dy,
            },
            Geometry::Point { x, y } => Geometry::Point { x: x + dx, y: y + dy },
        }
    }

    /// Hit test with a tolerance (in image pixels) for points.
    pub fn contains(&self, p: Point, tolerance: f64) -> bool {
        match *self {
            Geometry::Rect { x1, y1, x2, y2 } => {
                p.x >= x1 - tolerance
                    && p.x <= x2 + tolerance
                    && p.y >= y1 - tolerance
                    && p.y <= y2 + tolerance
            }
            Geometry::Point { x, y } => {
                let dx = p.x - x;
                let dy = p.y - y;
                (dx * dx + dy * dy).sqrt() <= tolerance
            }
        }
    }
}

/// A drawn annotation with an opaque identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

impl Annotation {
    /// Create a new annotation with a freshly generated id.
    pub fn new(geometry: Geometry) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), geometry)
    }

    /// Create an annotation with a known id.
    pub fn with_id(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            tip: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_corners_normalizes() {
        let g = Geometry::rect_from_corners(Point::new(50.0, 10.0), Point::new(20.0, 40.0));
        assert_eq!(
            g,
            Geometry::Rect {
                x1: 20.0,
                y1: 10.0,
                x2: 50.0,
                y2: 40.0
            }
        );
    }

    #[test]
    fn test_contains() {
        let rect = Geometry::Rect {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 10.0,
        };
        assert!(rect.contains(Point::new(5.0, 5.0), 0.0));
        assert!(!rect.contains(Point::new(12.0, 5.0), 0.0));

        let point = Geometry::Point { x: 3.0, y: 4.0 };
        assert!(point.contains(Point::new(0.0, 0.0), 5.0));
        assert!(!point.contains(Point::new(0.0, 0.0), 4.9));
    }

    #[test]
    fn test_geometry_json_shape() {
        let ann = Annotation::with_id("a1", Geometry::Point { x: 1.0, y: 2.0 });
        let json = serde_json::to_value(&ann).unwrap();
        assert_eq!(json["geometry"]["type"], "point");
        assert!(json.get("tip").is_none());
    }

    #[test]
    fn test_new_ids_are_unique() {
        let a = Annotation::new(Geometry::Point { x: 0.0, y: 0.0 });
        let b = Annotation::new(Geometry::Point { x: 0.0, y: 0.0 });
        assert_ne!(a.id, b.id);
    }
}
