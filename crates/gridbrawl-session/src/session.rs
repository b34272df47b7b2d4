//! Session types: what the registry keeps for each connected player.
//!
//! A session pairs a connection with the sending half of its outbound
//! queue. The receiving half belongs to the connection's writer task,
//! which is the only code that touches the socket's write side.

use std::sync::Arc;

use gridbrawl_transport::ConnectionId;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Depth of each session's outbound queue, in frames.
    ///
    /// A client that falls this far behind starts missing snapshots
    /// instead of slowing everyone else down. Default: 32.
    pub outbound_queue: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { outbound_queue: 32 }
    }
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// One frame queued for delivery. Shared so a broadcast renders once and
/// every queue holds a pointer to the same text.
pub type Outbound = Arc<str>;

/// The registry's handle on a live session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub conn_id: ConnectionId,
    outbound: mpsc::Sender<Outbound>,
}

impl SessionHandle {
    /// Creates a handle and the receiver its writer task drains.
    pub fn channel(
        conn_id: ConnectionId,
        config: &SessionConfig,
    ) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(config.outbound_queue.max(1));
        (
            Self {
                conn_id,
                outbound: tx,
            },
            rx,
        )
    }

    /// Queues a frame without waiting.
    ///
    /// # Errors
    /// The queue is full or the writer task has gone away.
    pub fn try_send(
        &self,
        frame: Outbound,
    ) -> Result<(), mpsc::error::TrySendError<Outbound>> {
        self.outbound.try_send(frame)
    }

    /// Returns `true` once the writer task has dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        assert_eq!(SessionConfig::default().outbound_queue, 32);
    }

    #[test]
    fn test_try_send_reaches_receiver() {
        let (handle, mut rx) = SessionHandle::channel(ConnectionId::new(1), &SessionConfig::default());
        handle.try_send(Arc::from("hello")).unwrap();
        assert_eq!(&*rx.try_recv().unwrap(), "hello");
    }

    #[test]
    fn test_try_send_full_queue_fails_without_blocking() {
        let config = SessionConfig { outbound_queue: 1 };
        let (handle, _rx) = SessionHandle::channel(ConnectionId::new(1), &config);
        handle.try_send(Arc::from("one")).unwrap();
        assert!(matches!(
            handle.try_send(Arc::from("two")),
            Err(mpsc::error::TrySendError::Full(_))
        ));
    }

    #[test]
    fn test_is_closed_after_receiver_dropped() {
        let (handle, rx) = SessionHandle::channel(ConnectionId::new(1), &SessionConfig::default());
        assert!(!handle.is_closed());
        drop(rx);
        assert!(handle.is_closed());
    }
}
