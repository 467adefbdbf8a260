//! Drawable object model: the shapes stored on a board and exchanged on the wire.
//!
//! An object is a shared [`Transform`] plus a kind-specific body. On the wire
//! the body is flattened next to `id` and tagged by `kind`:
//!
//! ```json
//! {"id": "o1", "kind": "TextNode", "content": "ب", "transform": {"left": 100, "top": 100}}
//! ```
//!
//! Payloads whose `kind` is not one of the closed set fail to deserialize.

#[cfg(test)]
#[path = "object_test.rs"]
mod object_test;

use serde::{Deserialize, Serialize};

/// Opaque, human-shareable board code.
pub type BoardId = String;

/// Opaque object identifier, assigned by the creating client.
pub type ObjectId = String;

/// Default stroke color for freehand paths and shapes.
pub const DEFAULT_STROKE: &str = "#000000";

/// Default freehand brush width.
pub const DEFAULT_BRUSH_WIDTH: f64 = 3.0;

/// Default font family for text nodes.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Default font size for text nodes.
pub const DEFAULT_FONT_SIZE: f64 = 80.0;

/// Default text fill color.
pub const DEFAULT_TEXT_FILL: &str = "#000000";

/// Default shape fill.
pub const DEFAULT_SHAPE_FILL: &str = "transparent";

// =============================================================================
// TRANSFORM
// =============================================================================

/// Position and orientation shared by every kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Clockwise rotation in degrees.
    pub angle: f64,
}

impl Transform {
    /// Identity transform placed at `(left, top)`.
    #[must_use]
    pub fn at(left: f64, top: f64) -> Self {
        Self { left, top, ..Self::default() }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self { left: 0.0, top: 0.0, scale_x: 1.0, scale_y: 1.0, angle: 0.0 }
    }
}

// =============================================================================
// KINDS
// =============================================================================

/// Tag identifying which body an object carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    FreehandPath,
    TextNode,
    Shape,
}

impl ObjectKind {
    /// Path-like kinds can be removed with the eraser.
    #[must_use]
    pub fn is_eraseable(self) -> bool {
        matches!(self, Self::FreehandPath)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FreehandPath => "FreehandPath",
            Self::TextNode => "TextNode",
            Self::Shape => "Shape",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry of a freehand stroke, in object-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathBody {
    pub points: Vec<[f64; 2]>,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_brush_width")]
    pub stroke_width: f64,
}

/// A run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBody {
    pub content: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_text_fill")]
    pub fill: String,
}

/// Primitive geometric shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Triangle,
    Line,
}

/// A primitive shape sized by its unscaled bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeBody {
    pub shape: ShapeKind,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_shape_fill")]
    pub fill: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_shape_stroke_width")]
    pub stroke_width: f64,
}

/// Kind-specific payload, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ObjectBody {
    FreehandPath(PathBody),
    TextNode(TextBody),
    Shape(ShapeBody),
}

impl ObjectBody {
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::FreehandPath(_) => ObjectKind::FreehandPath,
            Self::TextNode(_) => ObjectKind::TextNode,
            Self::Shape(_) => ObjectKind::Shape,
        }
    }
}

// =============================================================================
// DRAWABLE OBJECT
// =============================================================================

/// One shape on the board. `id` never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawableObject {
    pub id: ObjectId,
    #[serde(default)]
    pub transform: Transform,
    #[serde(flatten)]
    pub body: ObjectBody,
}

impl DrawableObject {
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.body.kind()
    }

    /// A text node with default font settings.
    pub fn text(id: impl Into<ObjectId>, content: impl Into<String>, transform: Transform) -> Self {
        Self {
            id: id.into(),
            transform,
            body: ObjectBody::TextNode(TextBody {
                content: content.into(),
                font_family: default_font_family(),
                font_size: DEFAULT_FONT_SIZE,
                fill: default_text_fill(),
            }),
        }
    }

    /// A freehand stroke with the default brush.
    pub fn path(id: impl Into<ObjectId>, points: Vec<[f64; 2]>, transform: Transform) -> Self {
        Self {
            id: id.into(),
            transform,
            body: ObjectBody::FreehandPath(PathBody {
                points,
                stroke: default_stroke(),
                stroke_width: DEFAULT_BRUSH_WIDTH,
            }),
        }
    }

    /// An unfilled shape with a thin default stroke.
    pub fn shape(id: impl Into<ObjectId>, shape: ShapeKind, width: f64, height: f64, transform: Transform) -> Self {
        Self {
            id: id.into(),
            transform,
            body: ObjectBody::Shape(ShapeBody {
                shape,
                width,
                height,
                fill: default_shape_fill(),
                stroke: default_stroke(),
                stroke_width: default_shape_stroke_width(),
            }),
        }
    }
}

fn default_stroke() -> String {
    DEFAULT_STROKE.to_owned()
}

fn default_brush_width() -> f64 {
    DEFAULT_BRUSH_WIDTH
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_owned()
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_text_fill() -> String {
    DEFAULT_TEXT_FILL.to_owned()
}

fn default_shape_fill() -> String {
    DEFAULT_SHAPE_FILL.to_owned()
}

fn default_shape_stroke_width() -> f64 {
    1.0
}
