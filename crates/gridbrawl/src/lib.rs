//! # Gridbrawl
//!
//! Authoritative server for a text-rendered multiplayer grid arena.
//!
//! Players connect over TCP, send short text commands (`MOVE UP`,
//! `ATTACK`, `MSG hi`, ...) and receive the whole world as text after
//! every change. One [`Arena`] holds the grid, the player table and the
//! session slots behind a single lock.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridbrawl::prelude::*;
//!
//! # async fn run() -> Result<(), GridbrawlError> {
//! let server = GridbrawlServer::builder()
//!     .bind("0.0.0.0:5000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod arena;
mod error;
mod handler;
mod server;

pub use arena::Arena;
pub use error::GridbrawlError;
pub use server::{GridbrawlServer, GridbrawlServerBuilder, ServerConfig, load_world_config};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::{
        Arena, GridbrawlError, GridbrawlServer, GridbrawlServerBuilder, ServerConfig,
        load_world_config,
    };
    pub use gridbrawl_protocol::{Command, Direction, Position, SERVER_FULL, SlotId};
    pub use gridbrawl_session::{SessionConfig, SessionError};
    pub use gridbrawl_transport::{Connection, TcpConnection, frame::DEFAULT_MAX_FRAME_LEN};
    pub use gridbrawl_world::{Outcome, World, WorldConfig};
}
