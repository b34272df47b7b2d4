//! Unified error type for the Gridbrawl server.

use gridbrawl_protocol::ProtocolError;
use gridbrawl_session::SessionError;
use gridbrawl_transport::TransportError;
use gridbrawl_world::WorldError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impl, so
/// `?` converts layer errors without ceremony.
#[derive(Debug, thiserror::Error)]
pub enum GridbrawlError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame that is not a command.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Admission or release failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The world could not be built or a slot was misused.
    #[error(transparent)]
    World(#[from] WorldError),

    /// The config file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not a valid world config.
    #[error("invalid config file: {0}")]
    Config(#[from] serde_json::Error),
}
