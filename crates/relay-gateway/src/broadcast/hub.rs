//! Broadcast hub
//!
//! Owns the registry and performs snapshot fan-out: a frame from one client
//! is enqueued, unmodified, onto every other live connection's outbound
//! queue. A recipient that cannot accept the frame is pruned; delivery
//! failures are never surfaced to the sender.

use crate::connection::{Frame, Registry};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

/// The broadcast hub
pub struct Hub {
    registry: Arc<Registry>,
}

impl Hub {
    /// Create a new hub over a registry
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Create a new hub wrapped in Arc
    #[must_use]
    pub fn new_shared(registry: Arc<Registry>) -> Arc<Self> {
        Arc::new(Self::new(registry))
    }

    /// The registry this hub fans out over
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Relay a frame from `sender_session` to every other live connection
    ///
    /// Operates over a membership snapshot taken at the moment of the call:
    /// clients registering mid-fan-out do not receive this frame, and
    /// removals mid-fan-out cannot abort delivery to the rest. Returns the
    /// number of recipients the frame was enqueued for. The sender gets no
    /// echo and no acknowledgment.
    pub fn broadcast_from(&self, sender_session: &str, frame: &Frame) -> usize {
        // Keepalive frames are per-connection, never relayed
        if !frame.is_payload() {
            return 0;
        }

        let recipients = self.registry.snapshot();
        let mut delivered = 0;

        for conn in recipients {
            if conn.session_id() == sender_session {
                continue;
            }

            match conn.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    let reason = match err {
                        TrySendError::Full(_) => "outbound queue full",
                        TrySendError::Closed(_) => "outbound queue closed",
                    };
                    tracing::debug!(
                        session_id = %conn.session_id(),
                        reason,
                        "delivery failed, pruning recipient"
                    );
                    self.registry.unregister(conn.session_id());
                }
            }
        }

        tracing::trace!(
            sender = %sender_session,
            delivered,
            bytes = frame.len(),
            "frame relayed"
        );

        delivered
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("registry", &self.registry)
            .finish()
    }
}
