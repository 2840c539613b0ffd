//! Process-wide session store, keyed by the participant's channel address.
//!
//! Sessions are ephemeral: they live only as long as the process and are
//! removed on completion, cancellation, or reset. Turns for one address are
//! expected to arrive serially from the platform; concurrent turns for the
//! same address race without ordering guarantees.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::session::state::Session;

/// Shared map of in-progress sessions.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the session for `address`, if one exists.
    pub async fn get(&self, address: &str) -> Option<Session> {
        self.inner.read().await.get(address).cloned()
    }

    /// Store (or replace) the session for `address`.
    pub async fn insert(&self, address: &str, session: Session) {
        self.inner.write().await.insert(address.to_string(), session);
    }

    /// Remove the session for `address`. Removing an absent session is fine.
    pub async fn remove(&self, address: &str) -> Option<Session> {
        self.inner.write().await.remove(address)
    }

    /// Number of in-progress sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
