//! Connection registry
//!
//! The authoritative set of currently connected clients, keyed by session ID
//! in a `DashMap` for concurrent access. This is the single shared mutable
//! resource in the relay.

use super::{Connection, Frame};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// The set of live connections
pub struct Registry {
    connections: DashMap<String, Arc<Connection>>,
}

impl Registry {
    /// Create a new, empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a newly established connection
    pub fn register(&self, session_id: String, sender: mpsc::Sender<Frame>) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());

        tracing::debug!(session_id = %session_id, "connection registered");

        connection
    }

    /// Remove a connection, idempotently
    ///
    /// Removing a session that is not present is a no-op; the removed
    /// connection (if any) is marked closed.
    pub fn unregister(&self, session_id: &str) {
        if let Some((_, connection)) = self.connections.remove(session_id) {
            connection.mark_closed();
            tracing::debug!(session_id = %session_id, "connection unregistered");
        }
    }

    /// Get a connection by session ID
    pub fn get(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Check if a session is registered
    pub fn contains(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }

    /// Number of live connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// All registered session IDs
    pub fn sessions(&self) -> Vec<String> {
        self.connections.iter().map(|r| r.key().clone()).collect()
    }

    /// Copy-on-read snapshot of the current membership
    ///
    /// Fan-out iterates this snapshot, so registrations and removals that
    /// happen mid-broadcast cannot invalidate the iteration.
    pub fn snapshot(&self) -> Vec<Arc<Connection>> {
        self.connections.iter().map(|r| r.value().clone()).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("connections", &self.connections.len())
            .finish()
    }
}
