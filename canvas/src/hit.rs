//! Geometry for hit-testing: points, bounding boxes, and object extents.
//!
//! Objects are positioned by their top-left origin (`left`, `top`), scaled,
//! then rotated clockwise by `angle` degrees around that origin. Hit-testing
//! uses the axis-aligned box around the transformed extent.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use frames::{DrawableObject, ObjectBody};

use crate::consts::{GLYPH_ADVANCE_RATIO, HIT_SLOP, LINE_HEIGHT_RATIO};

/// A point in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest box containing every point. `None` for an empty slice.
    #[must_use]
    pub fn around(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut b = Self { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        for p in &points[1..] {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }

    /// Grow the box by `by` on every side.
    #[must_use]
    pub fn inflate(self, by: f64) -> Self {
        Self {
            min_x: self.min_x - by,
            min_y: self.min_y - by,
            max_x: self.max_x + by,
            max_y: self.max_y + by,
        }
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Untransformed extent of an object's body, relative to its origin.
fn local_bounds(object: &DrawableObject) -> Bounds {
    match &object.body {
        ObjectBody::FreehandPath(path) => {
            let points: Vec<Point> = path.points.iter().map(|[x, y]| Point::new(*x, *y)).collect();
            Bounds::around(&points)
                .unwrap_or(Bounds { min_x: 0.0, min_y: 0.0, max_x: 0.0, max_y: 0.0 })
                .inflate(path.stroke_width / 2.0)
        }
        ObjectBody::TextNode(text) => {
            #[allow(clippy::cast_precision_loss)]
            let glyphs = text.content.chars().count() as f64;
            Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: glyphs * text.font_size * GLYPH_ADVANCE_RATIO,
                max_y: text.font_size * LINE_HEIGHT_RATIO,
            }
        }
        ObjectBody::Shape(shape) => Bounds { min_x: 0.0, min_y: 0.0, max_x: shape.width, max_y: shape.height }
            .inflate(shape.stroke_width / 2.0),
    }
}

/// Board-space bounding box of an object after scale and rotation.
#[must_use]
pub fn object_bounds(object: &DrawableObject) -> Bounds {
    let local = local_bounds(object);
    let t = &object.transform;
    let (sin, cos) = t.angle.to_radians().sin_cos();

    let corners = [
        (local.min_x, local.min_y),
        (local.max_x, local.min_y),
        (local.max_x, local.max_y),
        (local.min_x, local.max_y),
    ]
    .map(|(x, y)| {
        let (sx, sy) = (x * t.scale_x, y * t.scale_y);
        Point::new(t.left + sx * cos - sy * sin, t.top + sx * sin + sy * cos)
    });

    Bounds::around(&corners).unwrap_or(local)
}

/// Whether `p` lands on `object`, with slop for thin strokes.
#[must_use]
pub fn hits(object: &DrawableObject, p: Point) -> bool {
    object_bounds(object).inflate(HIT_SLOP).contains(p)
}
