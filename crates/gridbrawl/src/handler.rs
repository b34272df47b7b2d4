//! Per-connection handler: read commands, apply them, clean up.
//!
//! Each admitted connection gets two tasks:
//!   1. the handler (this module's entry point), which owns the read side
//!      and runs commands against the arena
//!   2. a writer, which drains the session's outbound queue into the
//!      socket
//!
//! The handler leaves the arena on any exit path. A [`SlotGuard`] covers
//! panics too.

use std::sync::Arc;

use gridbrawl_protocol::{Command, SlotId};
use gridbrawl_session::Outbound;
use gridbrawl_transport::{Connection, TcpConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;

/// Drop guard that removes a player from the arena when the handler
/// exits.
///
/// `Drop` is synchronous, so the async lock is taken in a spawned task.
struct SlotGuard {
    slot: SlotId,
    state: Arc<ServerState>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let slot = self.slot;
        let state = Arc::clone(&self.state);
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        runtime.spawn(async move {
            state.arena.lock().await.leave(slot);
            tracing::info!(%slot, "player left");
        });
    }
}

/// Handles an admitted connection until it ends.
///
/// The player is already spawned and the first snapshot is already
/// queued in `outbound`.
pub(crate) async fn handle_connection(
    conn: Arc<TcpConnection>,
    slot: SlotId,
    outbound: mpsc::Receiver<Outbound>,
    state: Arc<ServerState>,
) {
    let conn_id = conn.id();
    let guard = SlotGuard {
        slot,
        state: Arc::clone(&state),
    };
    let writer = tokio::spawn(write_outbound(Arc::clone(&conn), outbound));

    loop {
        let frame = match conn.recv().await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::info!(%slot, %conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%slot, %conn_id, error = %e, "recv error");
                break;
            }
        };

        match Command::from_frame(&frame) {
            Ok(Command::Quit) => {
                tracing::info!(%slot, %conn_id, "player quit");
                break;
            }
            Ok(command) => {
                state.arena.lock().await.apply(slot, &command);
            }
            Err(e) => {
                tracing::debug!(%slot, error = %e, "ignoring malformed command");
                // Unrecognized input still triggers a fresh snapshot.
                state.arena.lock().await.publish();
            }
        }
    }

    // Releasing the slot drops the session's sender, which ends the writer
    // once it has flushed what was already queued.
    drop(guard);
    if let Err(e) = writer.await {
        tracing::debug!(%slot, error = %e, "writer task failed");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%slot, %conn_id, error = %e, "close failed");
    }
}

/// Forwards queued frames to the socket until the queue closes or a write
/// fails.
async fn write_outbound(conn: Arc<TcpConnection>, mut outbound: mpsc::Receiver<Outbound>) {
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = conn.send(frame.as_bytes()).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed, writer stopping");
            break;
        }
    }
}
