//! Individual WebSocket connection
//!
//! Represents a single connected client: its identity, its bounded outbound
//! queue, and its liveness state.

use super::Frame;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket is open and the connection is registered
    Open,
    /// Connection has been closed or pruned
    Closed,
}

/// A single client connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Current connection state
    state: RwLock<ConnectionState>,

    /// Bounded queue feeding this connection's socket writer
    sender: mpsc::Sender<Frame>,

    /// Last inbound activity, used for idle pruning
    last_seen: RwLock<Instant>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new open connection
    pub fn new(session_id: String, sender: mpsc::Sender<Frame>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            state: RwLock::new(ConnectionState::Open),
            sender,
            last_seen: RwLock::new(Instant::now()),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Mark the connection closed. Idempotent.
    pub fn mark_closed(&self) {
        *self.state.write() = ConnectionState::Closed;
    }

    /// Record inbound activity from the peer
    pub fn touch(&self) {
        *self.last_seen.write() = Instant::now();
    }

    /// Time since the peer was last heard from
    pub fn idle_for(&self) -> Duration {
        self.last_seen.read().elapsed()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Enqueue a frame without blocking
    ///
    /// Fails when the outbound queue is full (stalled peer) or closed (the
    /// socket writer is gone).
    pub fn try_send(&self, frame: Frame) -> Result<(), mpsc::error::TrySendError<Frame>> {
        self.sender.try_send(frame)
    }

    /// Check if the outbound queue has been closed
    pub fn is_queue_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("state", &self.state())
            .field("created_at", &self.created_at)
            .finish()
    }
}
