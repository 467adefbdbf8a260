//! Room store: the authoritative object collection of every board.
//!
//! DESIGN
//! ======
//! Boards are created by `ensure` (driven by a join) and never deleted.
//! Objects keep insertion order so snapshots replay in stacking order.
//! Every mutation reports whether it had an observable effect; the router
//! broadcasts only when it did.
//!
//! The store itself is synchronous. Callers serialize access through the
//! `RwLock` in `AppState`, holding the write guard for a whole
//! read-modify-write.

use std::collections::HashMap;

use frames::{BoardId, DrawableObject, ObjectPatch, PatchError, Snapshot};

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;

// =============================================================================
// BOARD
// =============================================================================

/// One board's objects in insertion order.
#[derive(Debug, Default, Clone)]
pub struct Board {
    objects: Vec<DrawableObject>,
}

impl Board {
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { objects: self.objects.clone() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DrawableObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Default)]
pub struct RoomStore {
    boards: HashMap<BoardId, Board>,
}

impl RoomStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The board for `board_id`, created empty if absent.
    pub fn ensure(&mut self, board_id: &str) -> &mut Board {
        self.boards.entry(board_id.to_owned()).or_default()
    }

    #[must_use]
    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.get(board_id)
    }

    #[must_use]
    pub fn contains(&self, board_id: &str) -> bool {
        self.boards.contains_key(board_id)
    }

    /// Current contents of a board; `None` if it was never created.
    #[must_use]
    pub fn snapshot(&self, board_id: &str) -> Option<Snapshot> {
        self.boards.get(board_id).map(Board::snapshot)
    }

    /// Insert `object` unless its id is already present. Returns whether it was inserted.
    pub fn add(&mut self, board_id: &str, object: DrawableObject) -> bool {
        let Some(board) = self.boards.get_mut(board_id) else {
            return false;
        };
        if board.position(&object.id).is_some() {
            return false;
        }
        board.objects.push(object);
        true
    }

    /// Merge `patch` into the object it addresses.
    ///
    /// `Ok(false)` when the board or object does not exist. A patch that does
    /// not fit the stored object is rejected whole and leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`PatchError`] describing why the patch was rejected.
    pub fn update(&mut self, board_id: &str, patch: &ObjectPatch) -> Result<bool, PatchError> {
        let Some(object) = self
            .boards
            .get_mut(board_id)
            .and_then(|b| b.objects.iter_mut().find(|o| o.id == patch.id))
        else {
            return Ok(false);
        };
        patch.apply_to(object)?;
        Ok(true)
    }

    /// Remove the object with `id`. Returns whether one was removed.
    pub fn remove(&mut self, board_id: &str, id: &str) -> bool {
        let Some(board) = self.boards.get_mut(board_id) else {
            return false;
        };
        match board.position(id) {
            Some(pos) => {
                board.objects.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Empty a board. Returns `false` only when the board was never created.
    pub fn clear(&mut self, board_id: &str) -> bool {
        let Some(board) = self.boards.get_mut(board_id) else {
            return false;
        };
        board.objects.clear();
        true
    }

    #[must_use]
    pub fn board_count(&self) -> usize {
        self.boards.len()
    }
}
