//! The world: grid plus player table.
//!
//! `World` has no locking of its own. The server keeps exactly one behind
//! a mutex and calls every method with that lock held.

use gridbrawl_protocol::{Position, SlotId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::grid::Grid;
use crate::player::{INITIAL_HP, Player};
use crate::{WorldConfig, WorldError};

/// The shared arena state.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) grid: Grid,
    pub(crate) players: Vec<Player>,
    config: WorldConfig,
}

impl World {
    /// Builds the grid, stamps the configured obstacles (plus any random
    /// ones), and allocates an all-inactive player table.
    ///
    /// # Errors
    /// [`WorldError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let mut grid = Grid::new(config.rows, config.cols);
        for pos in &config.obstacles {
            grid.place_obstacle(*pos);
        }

        if config.random_obstacles > 0 {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_rng(&mut rand::rng()),
            };
            let mut candidates = config.scatter_candidates();
            candidates.shuffle(&mut rng);
            for pos in candidates.into_iter().take(config.random_obstacles) {
                grid.place_obstacle(pos);
            }
            tracing::debug!(
                count = config.random_obstacles,
                seed = ?config.seed,
                "scattered random obstacles"
            );
        }

        let players = (0..config.max_players)
            .map(|i| Player::vacant(SlotId(i)))
            .collect();

        tracing::info!(
            rows = config.rows,
            cols = config.cols,
            capacity = config.max_players,
            "world initialized"
        );

        Ok(Self {
            grid,
            players,
            config: config.clone(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Size of the player table.
    pub fn capacity(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, slot: SlotId) -> Option<&Player> {
        self.players.get(slot.index())
    }

    /// Activates the player in `slot` at its spawn cell with full hp.
    ///
    /// Markers are not refreshed; callers refresh before the next snapshot.
    ///
    /// # Errors
    /// [`WorldError::SlotOutOfRange`] or [`WorldError::SlotOccupied`].
    pub fn spawn(&mut self, slot: SlotId) -> Result<&Player, WorldError> {
        let position = self.config.spawn_position(slot);
        let player = self
            .players
            .get_mut(slot.index())
            .ok_or(WorldError::SlotOutOfRange(slot))?;
        if player.active {
            return Err(WorldError::SlotOccupied(slot));
        }

        *player = Player {
            slot,
            position,
            hp: INITIAL_HP,
            active: true,
            pending_message: None,
        };
        tracing::debug!(%slot, %position, "player spawned");
        Ok(player)
    }

    /// Deactivates the player in `slot` and drops any unsent message.
    /// Despawning an inactive slot is a no-op.
    ///
    /// # Errors
    /// [`WorldError::SlotOutOfRange`].
    pub fn despawn(&mut self, slot: SlotId) -> Result<(), WorldError> {
        let player = self
            .players
            .get_mut(slot.index())
            .ok_or(WorldError::SlotOutOfRange(slot))?;
        player.active = false;
        player.pending_message = None;
        Ok(())
    }

    /// Recomputes every player marker from the player table.
    ///
    /// Non-obstacle cells are cleared, then each active player with hp > 0
    /// is stamped at its position in slot order, so when two players share
    /// a cell the higher slot is the one drawn.
    pub fn refresh_markers(&mut self) {
        self.grid.clear_markers();
        for player in self.players.iter().filter(|p| p.is_alive()) {
            self.grid.stamp(player.position, player.slot);
        }
    }

    /// Returns `true` if `pos` is inside the grid and not an obstacle.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.grid.contains(pos) && !self.grid.is_obstacle(pos)
    }
}
