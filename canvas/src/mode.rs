//! Interaction mode: what pointer input does on this participant's surface.
//!
//! Modes are local-only and never synchronized. Each transition reapplies the
//! mode's surface affordances to every current object, so re-entering the
//! active mode leaves the surface unchanged.
//!
//! | Mode | Selectable | Cursor | Freehand brush |
//! |------|------------|--------|----------------|
//! | `Select` | yes | default | off |
//! | `Draw` | no | crosshair | on |
//! | `Erase` | no | crosshair | off |

#[cfg(test)]
#[path = "mode_test.rs"]
mod mode_test;

use crate::surface::{Cursor, Surface};

/// Which interaction the pointer performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Select and move existing objects (default).
    #[default]
    Select,
    /// Freehand drawing creates new paths.
    Draw,
    /// Pointer-down and drag delete paths under the pointer.
    Erase,
}

impl Mode {
    /// Whether objects may be selected and dragged in this mode.
    #[must_use]
    pub fn allows_selection(self) -> bool {
        matches!(self, Self::Select)
    }

    #[must_use]
    pub fn cursor(self) -> Cursor {
        match self {
            Self::Select => Cursor::Default,
            Self::Draw | Self::Erase => Cursor::Crosshair,
        }
    }

    #[must_use]
    pub fn freehand(self) -> bool {
        matches!(self, Self::Draw)
    }
}

/// Tracks the current mode and applies transitions to a surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeMachine {
    mode: Mode,
}

impl ModeMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch to `next` and apply its affordances. Returns whether the mode changed.
    pub fn enter<S: Surface>(&mut self, next: Mode, surface: &mut S) -> bool {
        let changed = self.mode != next;
        self.mode = next;

        if !next.allows_selection() {
            surface.discard_selection();
        }
        for id in surface.ids() {
            surface.set_selectable(&id, next.allows_selection());
        }
        surface.set_cursor(next.cursor());
        surface.set_freehand(next.freehand());
        surface.request_render();

        if changed {
            tracing::debug!(mode = ?next, "interaction mode changed");
        }
        changed
    }
}
