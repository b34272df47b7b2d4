//! Error types for the session layer.

use gridbrawl_protocol::SlotId;

/// Errors that can occur while admitting or releasing sessions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Every slot is taken. The connection gets the full-server reply.
    #[error("server is full ({capacity} players)")]
    CapacityExceeded { capacity: usize },

    /// No session holds the given slot.
    /// Releasing twice, or releasing a slot that was never admitted.
    #[error("no session in slot {0}")]
    NotFound(SlotId),
}
