//! Rendering surface seam and a headless in-memory scene.
//!
//! The reconciler talks to whatever draws the board through [`Surface`]:
//! add, remove, look up, mutate in place, hit-test, and the handful of
//! interaction toggles the mode machine flips. [`Scene`] implements it without
//! a display, for the CLI participant and for tests.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use frames::{DrawableObject, ObjectId};

use crate::hit::{Bounds, Point, hits, object_bounds};

/// Pointer affordance shown over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

/// Operations the reconciler needs from a rendering engine.
pub trait Surface {
    /// Add an object on top of the stack.
    fn add(&mut self, object: DrawableObject, selectable: bool);

    /// Remove an object by id, returning it if present.
    fn remove(&mut self, id: &str) -> Option<DrawableObject>;

    fn get(&self, id: &str) -> Option<&DrawableObject>;

    /// Mutable access for setting properties. Call [`Surface::set_coords`]
    /// afterwards so derived caches follow the change.
    fn get_mut(&mut self, id: &str) -> Option<&mut DrawableObject>;

    /// Recompute the cached coordinates of an object after a manual change.
    fn set_coords(&mut self, id: &str);

    /// Remove every object.
    fn clear(&mut self);

    /// Ids in stacking order, bottom first.
    fn ids(&self) -> Vec<ObjectId>;

    /// Topmost object under `point`.
    fn hit_test(&self, point: Point) -> Option<ObjectId>;

    fn set_selectable(&mut self, id: &str, selectable: bool);

    /// Drop the active selection, if any.
    fn discard_selection(&mut self);

    fn set_cursor(&mut self, cursor: Cursor);

    /// Toggle the engine's native freehand brush.
    fn set_freehand(&mut self, enabled: bool);

    fn request_render(&mut self);
}

// =============================================================================
// SCENE
// =============================================================================

#[derive(Debug, Clone)]
struct Entry {
    object: DrawableObject,
    selectable: bool,
    coords: Bounds,
}

/// Headless surface holding objects in stacking order.
#[derive(Debug, Default)]
pub struct Scene {
    entries: Vec<Entry>,
    active: Option<ObjectId>,
    cursor: Cursor,
    freehand: bool,
    renders: u64,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the active selection. Returns false if it is missing or not selectable.
    pub fn select(&mut self, id: &str) -> bool {
        let selectable = self.entry(id).is_some_and(|e| e.selectable);
        if selectable {
            self.active = Some(id.to_owned());
        }
        selectable
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[must_use]
    pub fn is_selectable(&self, id: &str) -> Option<bool> {
        self.entry(id).map(|e| e.selectable)
    }

    /// Cached board-space bounds, as of the last add or `set_coords`.
    #[must_use]
    pub fn coords(&self, id: &str) -> Option<Bounds> {
        self.entry(id).map(|e| e.coords)
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn freehand(&self) -> bool {
        self.freehand
    }

    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Objects in stacking order, bottom first.
    pub fn objects(&self) -> impl Iterator<Item = &DrawableObject> {
        self.entries.iter().map(|e| &e.object)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.object.id == id)
    }

    fn entry_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.object.id == id)
    }
}

impl Surface for Scene {
    fn add(&mut self, object: DrawableObject, selectable: bool) {
        let coords = object_bounds(&object);
        self.entries.push(Entry { object, selectable, coords });
    }

    fn remove(&mut self, id: &str) -> Option<DrawableObject> {
        let pos = self.entries.iter().position(|e| e.object.id == id)?;
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        Some(self.entries.remove(pos).object)
    }

    fn get(&self, id: &str) -> Option<&DrawableObject> {
        self.entry(id).map(|e| &e.object)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut DrawableObject> {
        self.entry_mut(id).map(|e| &mut e.object)
    }

    fn set_coords(&mut self, id: &str) {
        if let Some(entry) = self.entry_mut(id) {
            entry.coords = object_bounds(&entry.object);
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.active = None;
    }

    fn ids(&self) -> Vec<ObjectId> {
        self.entries.iter().map(|e| e.object.id.clone()).collect()
    }

    fn hit_test(&self, point: Point) -> Option<ObjectId> {
        self.entries
            .iter()
            .rev()
            .find(|e| hits(&e.object, point))
            .map(|e| e.object.id.clone())
    }

    fn set_selectable(&mut self, id: &str, selectable: bool) {
        if let Some(entry) = self.entry_mut(id) {
            entry.selectable = selectable;
        }
    }

    fn discard_selection(&mut self) {
        self.active = None;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_freehand(&mut self, enabled: bool) {
        self.freehand = enabled;
    }

    fn request_render(&mut self) {
        self.renders += 1;
    }
}
