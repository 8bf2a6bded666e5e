//! In-memory store of dashboard sessions.
//!
//! Each session is an independent [`Dashboard`] behind its own mutex so that
//! background forecast tasks for one session never block another.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::dashboard::Dashboard;

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Dashboard>>;

/// In-memory session store.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dashboard and return its ID with the handle.
    pub fn create_session(&self) -> (String, SessionHandle) {
        let session_id = Uuid::new_v4().to_string();
        let handle = Arc::new(Mutex::new(Dashboard::new()));
        self.sessions
            .write()
            .insert(session_id.clone(), Arc::clone(&handle));
        (session_id, handle)
    }

    /// Get a session by ID.
    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.read().get(session_id).cloned()
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
