//! Application state for the HTTP server.

use std::sync::Arc;

use crate::gateway::DashboardGateway;
use crate::services::SessionTracker;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Gateway to the building and sustainability services
    pub gateway: Arc<dyn DashboardGateway>,
    /// Opened building pages
    pub sessions: SessionTracker,
}

impl AppState {
    pub fn new(gateway: Arc<dyn DashboardGateway>) -> Self {
        Self {
            gateway,
            sessions: SessionTracker::new(),
        }
    }
}
