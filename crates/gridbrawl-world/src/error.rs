//! Error types for the world layer.

use gridbrawl_protocol::SlotId;

/// Errors that can occur while building or mutating the world.
///
/// Gameplay never produces these: blocked moves, misses and bad commands
/// are ordinary outcomes. Only configuration mistakes and slot
/// bookkeeping bugs end up here.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The configuration cannot produce a playable world.
    #[error("invalid world config: {0}")]
    InvalidConfig(String),

    /// The slot is outside the player table.
    #[error("slot {0} is outside the player table")]
    SlotOutOfRange(SlotId),

    /// The slot already has an active player.
    #[error("player {0} is already active")]
    SlotOccupied(SlotId),
}
