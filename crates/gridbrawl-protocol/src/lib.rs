//! Wire protocol for Gridbrawl.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Commands** ([`Command`]): the client → server grammar, parsed at a
//!   single boundary.
//! - **Types** ([`SlotId`], [`Position`], [`Direction`]): identities and
//!   coordinates shared by every layer.
//! - **Constants**: the fixed text the server sends outside of snapshots.
//! - **Errors** ([`ProtocolError`]): why a frame is not a command.
//!
//! Framing (how a frame is delimited on the stream) belongs to the
//! transport layer; this crate only sees whole frame payloads.
//!
//! ```text
//! Transport (frames) → Protocol (Command) → World (mutation)
//! ```

mod command;
mod error;
mod types;

pub use command::Command;
pub use error::ProtocolError;
pub use types::{Direction, MAX_SLOTS, Position, SlotId};

/// Sent as the only frame to a connection that arrives while every slot
/// is taken. The server closes the connection right after.
pub const SERVER_FULL: &str = "Server is full.";

/// The title line at the top of every snapshot.
pub const SNAPSHOT_HEADER: &str = "--- GAME STATE ---";
