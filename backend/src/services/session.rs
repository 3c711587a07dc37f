//! In-memory map from opaque session ids to per-connection flow state.
//!
//! Flow state is transient by contract and never persisted; the surrounding
//! server keeps one slot per connected client, addressed by an HttpOnly
//! cookie. Slots hold immutable `FlowState` values that are replaced whole
//! on every transition. Slots untouched for longer than the cookie lifetime
//! are swept on allocation, so anonymous traffic cannot grow the map without
//! bound.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::services::flow::FlowState;
use crate::utils::security::generate_token;

const SESSION_ID_LEN: usize = 32;

/// Matches the session cookie's Max-Age; a slot the client can no longer
/// name is garbage.
const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct Slot {
    state: FlowState,
    touched_at: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Slot>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Allocates a fresh slot starting at `LoggedOut` and returns its id.
    /// Expired slots are swept here, on the same write lock the insert takes.
    pub fn create(&self) -> String {
        let id = generate_token(SESSION_ID_LEN);
        let now = Instant::now();
        let mut slots = self.inner.write().expect("session store lock");
        slots.retain(|_, slot| now.duration_since(slot.touched_at) <= self.ttl);
        slots.insert(
            id.clone(),
            Slot {
                state: FlowState::LoggedOut,
                touched_at: now,
            },
        );
        id
    }

    pub fn get(&self, id: &str) -> Option<FlowState> {
        let slots = self.inner.read().expect("session store lock");
        let slot = slots.get(id)?;
        if slot.touched_at.elapsed() > self.ttl {
            return None;
        }
        Some(slot.state.clone())
    }

    /// Replaces the slot's state with a successor value and refreshes its
    /// expiry.
    pub fn put(&self, id: &str, state: FlowState) {
        self.inner.write().expect("session store lock").insert(
            id.to_string(),
            Slot {
                state,
                touched_at: Instant::now(),
            },
        );
    }

    /// Drops the slot entirely; used by logout to purge all transient state
    /// atomically.
    pub fn remove(&self, id: &str) {
        self.inner.write().expect("session store lock").remove(id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.read().expect("session store lock").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn create_starts_logged_out() {
        let store = SessionStore::default();
        let id = store.create();
        assert_eq!(store.get(&id), Some(FlowState::LoggedOut));
    }

    #[test]
    fn put_replaces_state() {
        let store = SessionStore::default();
        let id = store.create();
        let user_id = Uuid::new_v4();
        store.put(&id, FlowState::LoggedIn { user_id });
        assert_eq!(store.get(&id), Some(FlowState::LoggedIn { user_id }));
    }

    #[test]
    fn remove_purges_slot() {
        let store = SessionStore::default();
        let id = store.create();
        store.remove(&id);
        assert_eq!(store.get(&id), None);
    }

    #[test]
    fn unknown_id_is_none() {
        let store = SessionStore::default();
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn expired_slot_no_longer_resolves() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        let id = store.create();
        assert_eq!(store.get(&id), None);
    }

    #[test]
    fn anonymous_slots_do_not_accumulate() {
        let store = SessionStore::with_ttl(Duration::ZERO);
        for _ in 0..10_000 {
            store.create();
        }
        // Each create sweeps everything the previous iterations left behind.
        assert!(store.len() <= 1);
    }

    #[test]
    fn live_slots_survive_the_sweep() {
        let store = SessionStore::default();
        let keep = store.create();
        for _ in 0..100 {
            store.create();
        }
        assert_eq!(store.get(&keep), Some(FlowState::LoggedOut));
        assert_eq!(store.len(), 101);
    }
}
