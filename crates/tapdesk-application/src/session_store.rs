//! The source node of the session graph.

use std::sync::{Arc, PoisonError, RwLock};
use tapdesk_core::Session;

struct StoreState {
    session: Option<Arc<Session>>,
    revision: u64,
}

/// Holds the raw authenticated session.
///
/// The store does not validate sessions; they are accepted as handed over
/// by the authentication collaborator.
pub struct SessionStore {
    state: RwLock<StoreState>,
}

impl SessionStore {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                session: session.map(Arc::new),
                revision: 0,
            }),
        }
    }

    pub fn get(&self) -> Option<Arc<Session>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .session
            .clone()
    }

    /// Number of `replace` calls so far.
    pub fn revision(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .revision
    }

    /// Replaces the session and runs `invalidate` before releasing the store.
    ///
    /// Readers never see the new session together with values derived from
    /// the old one. Returns the new revision.
    pub fn replace(&self, session: Option<Session>, invalidate: impl FnOnce()) -> u64 {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.session = session.map(Arc::new);
        state.revision += 1;
        invalidate();
        state.revision
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}
