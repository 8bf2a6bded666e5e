//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::{ForecastTransport, SessionStore};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Transport used for every forecast request
    pub transport: Arc<dyn ForecastTransport>,
}

impl AppState {
    pub fn new(transport: Arc<dyn ForecastTransport>) -> Self {
        Self {
            sessions: SessionStore::new(),
            transport,
        }
    }
}
