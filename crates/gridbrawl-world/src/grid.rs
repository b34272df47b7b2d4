//! The cell matrix.
//!
//! Obstacles are authoritative and written only while the world is being
//! built. Player markers are derived: they are wiped and restamped from
//! the player table by [`World::refresh_markers`](crate::World::refresh_markers).

use gridbrawl_protocol::{Position, SlotId};

/// Character for an empty cell.
pub const EMPTY_MARKER: char = '.';
/// Character for an obstacle cell.
pub const OBSTACLE_MARKER: char = '#';

/// What a single cell currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Obstacle,
    Player(SlotId),
}

impl Cell {
    /// The character this cell renders as in a snapshot row.
    pub fn marker(self) -> char {
        match self {
            Self::Empty => EMPTY_MARKER,
            Self::Obstacle => OBSTACLE_MARKER,
            Self::Player(slot) => slot.letter(),
        }
    }
}

/// A fixed `rows x cols` matrix, stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` if `pos` lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Returns the cell at `pos`, or `None` if it is out of bounds.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Obstacle)
    }

    /// Renders one row as contiguous markers.
    pub fn row_markers(&self, row: usize) -> String {
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter()
            .map(|c| c.marker())
            .collect()
    }

    /// Marks `pos` as an obstacle. Only called during world construction.
    pub(crate) fn place_obstacle(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = Cell::Obstacle;
        }
    }

    /// Resets every non-obstacle cell to empty.
    pub(crate) fn clear_markers(&mut self) {
        for cell in &mut self.cells {
            if *cell != Cell::Obstacle {
                *cell = Cell::Empty;
            }
        }
    }

    /// Stamps a player marker. Obstacles and out-of-bounds positions are
    /// left untouched; an existing player marker is overwritten.
    pub(crate) fn stamp(&mut self, pos: Position, slot: SlotId) {
        if let Some(i) = self.index(pos) {
            if self.cells[i] != Cell::Obstacle {
                self.cells[i] = Cell::Player(slot);
            }
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.cols + pos.col)
    }
}
