//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::health::HealthProbe;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub probe: Arc<HealthProbe>,
}

impl AppState {
    /// Creates a new application state from the given configuration and health probe.
    pub fn new(config: AppConfig, probe: HealthProbe) -> Self {
        Self {
            config: Arc::new(config),
            probe: Arc::new(probe),
        }
    }
}
