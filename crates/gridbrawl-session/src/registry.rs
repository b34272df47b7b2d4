//! The session registry: a fixed table of player slots.
//!
//! Slot `i` is either free or holds the [`SessionHandle`] of the
//! connection playing as that slot. The registry does no locking; the
//! server keeps it next to the world behind the same mutex, so admission
//! and gameplay see one consistent order.

use std::sync::Arc;

use gridbrawl_protocol::SlotId;
use tokio::sync::mpsc::error::TrySendError;

use crate::{SessionError, SessionHandle};

/// Maps player slots to live sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    slots: Vec<Option<SessionHandle>>,
    live: usize,
}

impl SessionRegistry {
    /// Creates a registry with `capacity` free slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn is_full(&self) -> bool {
        self.live >= self.capacity()
    }

    pub fn get(&self, slot: SlotId) -> Option<&SessionHandle> {
        self.slots.get(slot.index()).and_then(Option::as_ref)
    }

    /// Stores `handle` in the lowest free slot.
    ///
    /// # Errors
    /// [`SessionError::CapacityExceeded`] if every slot is taken.
    pub fn admit(&mut self, handle: SessionHandle) -> Result<SlotId, SessionError> {
        let capacity = self.capacity();
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(SessionError::CapacityExceeded { capacity });
        };

        let slot = SlotId(index);
        let conn_id = handle.conn_id;
        self.slots[index] = Some(handle);
        self.live += 1;

        tracing::info!(%slot, %conn_id, live = self.live, "session admitted");
        Ok(slot)
    }

    /// Frees `slot` and returns the handle it held.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the slot is already free or out of range.
    pub fn release(&mut self, slot: SlotId) -> Result<SessionHandle, SessionError> {
        let handle = self
            .slots
            .get_mut(slot.index())
            .and_then(Option::take)
            .ok_or(SessionError::NotFound(slot))?;
        self.live -= 1;

        tracing::info!(%slot, conn_id = %handle.conn_id, live = self.live, "session released");
        Ok(handle)
    }

    /// Queues `frame` on every live session without waiting.
    ///
    /// A full or closed queue is skipped with a warning; the other sessions
    /// still get the frame and the skipped session stays registered. Its
    /// own handler notices a dead socket and releases the slot.
    ///
    /// Returns how many sessions the frame was queued for.
    pub fn broadcast(&self, frame: &Arc<str>) -> usize {
        let mut delivered = 0;
        for (index, handle) in self.slots.iter().enumerate() {
            let Some(handle) = handle else { continue };
            match handle.try_send(Arc::clone(frame)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(slot = %SlotId(index), conn_id = %handle.conn_id, "outbound queue full, snapshot skipped");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!(slot = %SlotId(index), conn_id = %handle.conn_id, "outbound queue closed, snapshot skipped");
                }
            }
        }
        delivered
    }
}
