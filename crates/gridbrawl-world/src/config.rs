//! World configuration.

use gridbrawl_protocol::{MAX_SLOTS, Position, SlotId};
use serde::{Deserialize, Serialize};

use crate::WorldError;

// ---------------------------------------------------------------------------
// WorldConfig
// ---------------------------------------------------------------------------

/// Configuration for the shared arena.
///
/// Everything here is fixed once the world is built: the grid is never
/// resized and obstacles never move. `#[serde(default)]` lets a JSON file
/// override only the fields it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of grid rows.
    pub rows: usize,

    /// Number of grid columns.
    pub cols: usize,

    /// Obstacle cells stamped at initialization.
    pub obstacles: Vec<Position>,

    /// Player capacity. Also the size of the session table.
    pub max_players: usize,

    /// Extra obstacles scattered over free cells at initialization.
    /// Spawn cells are never picked.
    pub random_obstacles: usize,

    /// Seed for the obstacle scatter. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            obstacles: vec![Position::new(2, 2), Position::new(1, 3)],
            max_players: 4,
            random_obstacles: 0,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Where a slot's avatar appears when its session starts: column 0 of
    /// the row matching the slot index.
    pub fn spawn_position(&self, slot: SlotId) -> Position {
        Position::new(slot.index(), 0)
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Checks that a world can be built from this config.
    ///
    /// # Errors
    /// [`WorldError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(invalid(format!(
                "grid must not be empty, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.max_players == 0 || self.max_players > MAX_SLOTS {
            return Err(invalid(format!(
                "max_players must be 1..={MAX_SLOTS}, got {}",
                self.max_players
            )));
        }
        if let Some(pos) = self.obstacles.iter().find(|p| !self.in_bounds(**p)) {
            return Err(invalid(format!("obstacle {pos} is outside the grid")));
        }

        for slot in (0..self.max_players).map(SlotId) {
            let spawn = self.spawn_position(slot);
            if !self.in_bounds(spawn) {
                return Err(invalid(format!(
                    "spawn {spawn} for player {slot} is outside the grid"
                )));
            }
            if self.obstacles.contains(&spawn) {
                return Err(invalid(format!(
                    "spawn {spawn} for player {slot} is an obstacle"
                )));
            }
        }

        let free = self.scatter_candidates().len();
        if self.random_obstacles > free {
            return Err(invalid(format!(
                "cannot scatter {} obstacles over {free} free cells",
                self.random_obstacles
            )));
        }
        Ok(())
    }

    /// Cells eligible for random obstacles: in bounds, not already an
    /// obstacle, and not a spawn cell. Row-major order.
    pub(crate) fn scatter_candidates(&self) -> Vec<Position> {
        let spawns: Vec<Position> = (0..self.max_players)
            .map(|i| self.spawn_position(SlotId(i)))
            .collect();
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| Position::new(row, col)))
            .filter(|p| !self.obstacles.contains(p) && !spawns.contains(p))
            .collect()
    }
}

fn invalid(reason: String) -> WorldError {
    WorldError::InvalidConfig(reason)
}
