//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Extra hit slop in board units around thin strokes.
pub const HIT_SLOP: f64 = 4.0;

/// Approximate glyph advance as a fraction of the font size.
pub const GLYPH_ADVANCE_RATIO: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.16;

// ── Identifiers ─────────────────────────────────────────────────

/// URL-safe alphabet used for object ids and board codes.
pub const ID_ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Length of generated object ids.
pub const OBJECT_ID_LEN: usize = 21;

/// Length of generated board codes.
pub const BOARD_CODE_LEN: usize = 6;

// ── Placement ───────────────────────────────────────────────────

/// Where inserted symbols land before the user moves them.
pub const INSERT_LEFT: f64 = 100.0;

/// Where inserted symbols land before the user moves them.
pub const INSERT_TOP: f64 = 100.0;
