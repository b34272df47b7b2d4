//! Player session management for Gridbrawl.
//!
//! This crate tracks which connection plays as which slot and fans
//! snapshots out to all of them:
//!
//! 1. **Admission**: the lowest free slot, or a capacity error
//!    ([`SessionRegistry::admit`])
//! 2. **Release**: freeing a slot when its connection ends
//! 3. **Broadcast**: non-blocking delivery into each session's bounded
//!    outbound queue ([`SessionHandle`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)  ← admits connections, broadcasts snapshots
//!     ↕
//! Session Layer (this crate)  ← slot table and outbound queues
//!     ↕
//! Protocol / Transport (below)  ← SlotId, ConnectionId
//! ```

mod error;
mod registry;
mod session;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::{Outbound, SessionConfig, SessionHandle};
