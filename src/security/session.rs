//! Session resolution.
//!
//! Establishing sessions (login, expiry) belongs to the auth subsystem; this
//! layer only asks which caller, if any, a presented token belongs to.

use dashmap::DashMap;

use crate::config::SessionConfig;

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Resolves session tokens to identities.
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Returns the identity bound to `token`, if the session is valid.
    fn resolve(&self, token: &str) -> Option<Identity>;
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Identity>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(sessions: &[SessionConfig]) -> Self {
        let store = Self::new();
        for session in sessions {
            store.insert(session.token.clone(), Identity::new(session.username.clone()));
        }
        store
    }

    pub fn insert(&self, token: impl Into<String>, identity: Identity) {
        self.sessions.insert(token.into(), identity);
    }

    /// Drop a session. Returns the identity it was bound to.
    pub fn revoke(&self, token: &str) -> Option<Identity> {
        self.sessions.remove(token).map(|(_, identity)| identity)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn resolve(&self, token: &str) -> Option<Identity> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }
}
