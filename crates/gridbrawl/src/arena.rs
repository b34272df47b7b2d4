//! The arena: world and session table under one lock.
//!
//! Every state change follows the same pattern while the lock is held:
//! mutate, refresh markers, render once, queue the frame for every live
//! session. Queuing never waits, so holding the lock across the fan-out
//! is bounded.

use std::sync::Arc;

use gridbrawl_protocol::{Command, SlotId};
use gridbrawl_session::{Outbound, SessionHandle, SessionRegistry};
use gridbrawl_world::{Outcome, World};

use crate::GridbrawlError;

/// Shared game state. The server keeps exactly one, behind a
/// `tokio::sync::Mutex`.
#[derive(Debug)]
pub struct Arena {
    pub(crate) world: World,
    pub(crate) sessions: SessionRegistry,
}

impl Arena {
    /// Pairs a world with an empty session table of the same capacity.
    pub fn new(world: World) -> Self {
        let sessions = SessionRegistry::new(world.capacity());
        Self { world, sessions }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of connected players.
    pub fn live(&self) -> usize {
        self.sessions.live()
    }

    /// Admits a connection: takes the lowest free slot, spawns its player,
    /// and publishes the new state (the newcomer included).
    ///
    /// # Errors
    /// [`SessionError::CapacityExceeded`](gridbrawl_session::SessionError::CapacityExceeded)
    /// when every slot is taken.
    pub fn admit(&mut self, handle: SessionHandle) -> Result<SlotId, GridbrawlError> {
        let slot = self.sessions.admit(handle)?;
        if let Err(e) = self.world.spawn(slot) {
            // Keep the two tables in step.
            let _ = self.sessions.release(slot);
            return Err(e.into());
        }
        self.publish();
        Ok(slot)
    }

    /// Applies one command for `slot` and publishes the result.
    pub fn apply(&mut self, slot: SlotId, command: &Command) -> Outcome {
        let outcome = self.world.apply(slot, command);
        self.publish();
        outcome
    }

    /// Removes `slot`'s player and session, then publishes to whoever is
    /// left.
    pub fn leave(&mut self, slot: SlotId) {
        if let Err(e) = self.world.despawn(slot) {
            tracing::debug!(%slot, error = %e, "despawn failed");
        }
        if let Err(e) = self.sessions.release(slot) {
            tracing::debug!(%slot, error = %e, "release failed");
        }
        self.publish();
    }

    /// Refreshes markers, renders one snapshot, and queues it for every
    /// live session. Returns how many sessions it was queued for.
    pub fn publish(&mut self) -> usize {
        self.world.refresh_markers();
        let frame: Outbound = Arc::from(self.world.snapshot().to_string());
        let delivered = self.sessions.broadcast(&frame);
        tracing::trace!(delivered, live = self.sessions.live(), "snapshot published");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbrawl_protocol::Direction;
    use gridbrawl_session::{SessionConfig, SessionError};
    use gridbrawl_transport::ConnectionId;
    use gridbrawl_world::WorldConfig;
    use tokio::sync::mpsc;

    fn arena() -> Arena {
        Arena::new(World::new(&WorldConfig::default()).unwrap())
    }

    fn join(arena: &mut Arena, id: u64) -> (SlotId, mpsc::Receiver<Outbound>) {
        let (handle, rx) = SessionHandle::channel(ConnectionId::new(id), &SessionConfig::default());
        (arena.admit(handle).unwrap(), rx)
    }

    #[test]
    fn test_admit_spawns_and_publishes_to_newcomer() {
        let mut arena = arena();
        let (slot, mut rx) = join(&mut arena, 1);
        assert_eq!(slot, SlotId(0));
        assert!(arena.world().player(slot).unwrap().active);
        let frame = rx.try_recv().unwrap();
        assert!(frame.contains("Player A: HP=100 Pos=(0, 0)"));
    }

    #[test]
    fn test_admit_when_full_leaves_state_untouched() {
        let mut arena = arena();
        let mut rxs = Vec::new();
        for id in 1..=4 {
            rxs.push(join(&mut arena, id).1);
        }
        let (handle, _rx) = SessionHandle::channel(ConnectionId::new(5), &SessionConfig::default());
        let err = arena.admit(handle).unwrap_err();
        assert!(matches!(
            err,
            GridbrawlError::Session(SessionError::CapacityExceeded { capacity: 4 })
        ));
        assert_eq!(arena.live(), 4);
    }

    #[test]
    fn test_apply_publishes_to_everyone() {
        let mut arena = arena();
        let (a, mut ra) = join(&mut arena, 1);
        let (_b, mut rb) = join(&mut arena, 2);
        while ra.try_recv().is_ok() {}
        while rb.try_recv().is_ok() {}

        arena.apply(a, &Command::Move(Direction::Right));
        let fa = ra.try_recv().unwrap();
        let fb = rb.try_recv().unwrap();
        assert_eq!(fa, fb);
        assert!(fa.contains("Player A: HP=100 Pos=(0, 1)"));
    }

    #[test]
    fn test_leave_frees_slot_and_notifies_others() {
        let mut arena = arena();
        let (a, ra) = join(&mut arena, 1);
        let (_b, mut rb) = join(&mut arena, 2);
        while rb.try_recv().is_ok() {}

        arena.leave(a);
        drop(ra);
        assert_eq!(arena.live(), 1);
        let frame = rb.try_recv().unwrap();
        assert!(!frame.contains("Player A"));
        assert!(frame.contains("\n.....\nB..#.\n"));

        let (slot, _rx) = join(&mut arena, 3);
        assert_eq!(slot, SlotId(0), "freed slot is reused");
    }
}
