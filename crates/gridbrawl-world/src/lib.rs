//! The shared arena for Gridbrawl.
//!
//! One [`World`] holds the grid and the player table. Everything that
//! changes game state goes through it:
//!
//! - [`World::spawn`] / [`World::despawn`] as connections come and go
//! - [`World::apply`] for each parsed command, returning an [`Outcome`]
//! - [`World::refresh_markers`] to redraw players onto the grid
//! - [`World::snapshot`] to render the text broadcast to every client
//!
//! The world does no locking. The server owns a single instance behind a
//! mutex.

mod config;
mod error;
mod grid;
mod player;
mod processor;
mod snapshot;
mod world;

pub use config::WorldConfig;
pub use error::WorldError;
pub use grid::{Cell, EMPTY_MARKER, Grid, OBSTACLE_MARKER};
pub use player::{INITIAL_HP, Player};
pub use processor::{Outcome, Strike};
pub use snapshot::{PlayerStatus, Snapshot};
pub use world::World;
