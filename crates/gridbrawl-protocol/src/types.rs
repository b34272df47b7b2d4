//! Identity and geometry types shared by every layer.
//!
//! These are small `Copy` newtypes. They travel inside configuration files
//! (as JSON) and show up in log fields, so each has a `Display` impl and
//! the serde shape is pinned down by the tests at the bottom.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest number of slots a server can have. Slot markers are the
/// letters `A` to `Z`.
pub const MAX_SLOTS: usize = 26;

// ---------------------------------------------------------------------------
// SlotId
// ---------------------------------------------------------------------------

/// A player slot: the identity a connection holds for its whole lifetime.
///
/// Slots are dense (`0..capacity`) and reused after a disconnect. On the
/// wire a slot is shown as an uppercase letter, slot 0 being `A`.
///
/// `#[serde(transparent)]` keeps it a plain number in JSON.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(pub usize);

impl SlotId {
    /// Returns the slot's marker letter (`'A' + id`).
    ///
    /// Slots past `Z` render as `?`; worlds reject such capacities at
    /// construction, so this never shows up in a snapshot.
    pub fn letter(self) -> char {
        if self.0 < MAX_SLOTS {
            char::from(b'A' + self.0 as u8)
        } else {
            '?'
        }
    }

    /// Returns the slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A cell coordinate. `row` grows downwards, `col` grows to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Shorthand constructor.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Renders as `(row, col)`, the same shape the snapshot uses.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the four movement directions accepted by `MOVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in wire-keyword order.
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// The keyword used on the wire (`UP`, `DOWN`, ...).
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// =========================================================================
// Tests
// =========================================================================
