//! Server state
//!
//! Shared state handed to every route handler.

use crate::broadcast::Hub;
use crate::connection::Registry;
use relay_common::AppConfig;
use std::sync::Arc;

/// Relay application state
#[derive(Clone)]
pub struct AppState {
    /// Live connection registry
    registry: Arc<Registry>,
    /// Broadcast hub performing fan-out
    hub: Arc<Hub>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new state
    pub fn new(registry: Arc<Registry>, hub: Arc<Hub>, config: AppConfig) -> Self {
        Self {
            registry,
            hub,
            config: Arc::new(config),
        }
    }

    /// Get the connection registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get the broadcast hub
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .field("config", &"AppConfig")
            .finish()
    }
}
