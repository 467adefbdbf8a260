//! Field-level partial updates for drawable objects.
//!
//! A patch addresses an existing object by `id` and carries only the fields
//! to overwrite. Transform fields merge one at a time. A patch is validated in
//! full before anything is written: it may not change `kind` and may only
//! touch fields the stored kind declares.

#[cfg(test)]
#[path = "patch_test.rs"]
mod patch_test;

use serde::{Deserialize, Serialize};

use crate::object::{DrawableObject, ObjectBody, ObjectId, ObjectKind, ShapeKind, Transform};

/// Rejection reasons for a patch. None of these mutate the target.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    #[error("patch for {patch} applied to object {object}")]
    IdMismatch { object: ObjectId, patch: ObjectId },
    #[error("patch would change kind from {stored} to {requested}")]
    KindMismatch { stored: ObjectKind, requested: ObjectKind },
    #[error("field `{field}` is not declared for {kind}")]
    UndeclaredField { kind: ObjectKind, field: &'static str },
}

/// Sparse transform update. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialTransform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

impl PartialTransform {
    /// Every field set from a full transform.
    #[must_use]
    pub fn full(t: &Transform) -> Self {
        Self {
            left: Some(t.left),
            top: Some(t.top),
            scale_x: Some(t.scale_x),
            scale_y: Some(t.scale_y),
            angle: Some(t.angle),
        }
    }

    /// Only the position.
    #[must_use]
    pub fn position(left: f64, top: f64) -> Self {
        Self { left: Some(left), top: Some(top), ..Self::default() }
    }

    fn merge_into(&self, t: &mut Transform) {
        if let Some(v) = self.left {
            t.left = v;
        }
        if let Some(v) = self.top {
            t.top = v;
        }
        if let Some(v) = self.scale_x {
            t.scale_x = v;
        }
        if let Some(v) = self.scale_y {
            t.scale_y = v;
        }
        if let Some(v) = self.angle {
            t.angle = v;
        }
    }
}

/// Sparse update for a drawable object, the `objectData` of move events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPatch {
    pub id: ObjectId,
    /// Must equal the stored kind when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObjectKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<PartialTransform>,

    // FreehandPath
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,

    // FreehandPath | Shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,

    // TextNode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,

    // TextNode | Shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    // Shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl ObjectPatch {
    /// A patch that only moves, scales, or rotates.
    pub fn transform(id: impl Into<ObjectId>, transform: PartialTransform) -> Self {
        Self { id: id.into(), transform: Some(transform), ..Self::default() }
    }

    /// A patch carrying the object's complete current state.
    #[must_use]
    pub fn full(obj: &DrawableObject) -> Self {
        let mut patch = Self {
            id: obj.id.clone(),
            kind: Some(obj.kind()),
            transform: Some(PartialTransform::full(&obj.transform)),
            ..Self::default()
        };
        match &obj.body {
            ObjectBody::FreehandPath(p) => {
                patch.points = Some(p.points.clone());
                patch.stroke = Some(p.stroke.clone());
                patch.stroke_width = Some(p.stroke_width);
            }
            ObjectBody::TextNode(t) => {
                patch.content = Some(t.content.clone());
                patch.font_family = Some(t.font_family.clone());
                patch.font_size = Some(t.font_size);
                patch.fill = Some(t.fill.clone());
            }
            ObjectBody::Shape(s) => {
                patch.shape = Some(s.shape);
                patch.width = Some(s.width);
                patch.height = Some(s.height);
                patch.fill = Some(s.fill.clone());
                patch.stroke = Some(s.stroke.clone());
                patch.stroke_width = Some(s.stroke_width);
            }
        }
        patch
    }

    /// Names of the body fields this patch sets.
    fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let mut push = |set: bool, name: &'static str| {
            if set {
                fields.push(name);
            }
        };
        push(self.points.is_some(), "points");
        push(self.stroke.is_some(), "stroke");
        push(self.stroke_width.is_some(), "strokeWidth");
        push(self.content.is_some(), "content");
        push(self.font_family.is_some(), "fontFamily");
        push(self.font_size.is_some(), "fontSize");
        push(self.fill.is_some(), "fill");
        push(self.shape.is_some(), "shape");
        push(self.width.is_some(), "width");
        push(self.height.is_some(), "height");
        fields
    }

    /// Check the patch against `obj` without modifying it.
    ///
    /// # Errors
    ///
    /// Returns a [`PatchError`] if the ids differ, the kind would change, or a
    /// field outside the stored kind's declared set is present.
    pub fn validate(&self, obj: &DrawableObject) -> Result<(), PatchError> {
        if self.id != obj.id {
            return Err(PatchError::IdMismatch { object: obj.id.clone(), patch: self.id.clone() });
        }
        let stored = obj.kind();
        if let Some(requested) = self.kind {
            if requested != stored {
                return Err(PatchError::KindMismatch { stored, requested });
            }
        }
        let declared = declared_fields(stored);
        if let Some(field) = self
            .present_fields()
            .into_iter()
            .find(|f| !declared.contains(f))
        {
            return Err(PatchError::UndeclaredField { kind: stored, field });
        }
        Ok(())
    }

    /// Merge the patch into `obj`, overwriting only the present fields.
    ///
    /// # Errors
    ///
    /// Returns the [`validate`](Self::validate) error; `obj` is untouched in that case.
    pub fn apply_to(&self, obj: &mut DrawableObject) -> Result<(), PatchError> {
        self.validate(obj)?;

        if let Some(t) = &self.transform {
            t.merge_into(&mut obj.transform);
        }

        match &mut obj.body {
            ObjectBody::FreehandPath(p) => {
                overwrite(&mut p.points, self.points.as_ref());
                overwrite(&mut p.stroke, self.stroke.as_ref());
                overwrite(&mut p.stroke_width, self.stroke_width.as_ref());
            }
            ObjectBody::TextNode(t) => {
                overwrite(&mut t.content, self.content.as_ref());
                overwrite(&mut t.font_family, self.font_family.as_ref());
                overwrite(&mut t.font_size, self.font_size.as_ref());
                overwrite(&mut t.fill, self.fill.as_ref());
            }
            ObjectBody::Shape(s) => {
                overwrite(&mut s.shape, self.shape.as_ref());
                overwrite(&mut s.width, self.width.as_ref());
                overwrite(&mut s.height, self.height.as_ref());
                overwrite(&mut s.fill, self.fill.as_ref());
                overwrite(&mut s.stroke, self.stroke.as_ref());
                overwrite(&mut s.stroke_width, self.stroke_width.as_ref());
            }
        }
        Ok(())
    }
}

fn overwrite<T: Clone>(slot: &mut T, value: Option<&T>) {
    if let Some(v) = value {
        slot.clone_from(v);
    }
}

fn declared_fields(kind: ObjectKind) -> &'static [&'static str] {
    match kind {
        ObjectKind::FreehandPath => &["points", "stroke", "strokeWidth"],
        ObjectKind::TextNode => &["content", "fontFamily", "fontSize", "fill"],
        ObjectKind::Shape => &["shape", "width", "height", "fill", "stroke", "strokeWidth"],
    }
}
