//! In-memory session store
//!
//! Holds the current user behind a mutex. The store is a sink from the
//! refresh coordinator's point of view: a successful refresh writes the
//! renewed identity, an irrecoverable failure wipes it. Reads clone the
//! state so callers never hold the lock across an await.

use std::sync::Mutex;

use tracing::{debug, info};

use crate::identity::UserProfile;

/// Coordinator-facing view of the session store.
///
/// The refresh path only ever sets or wipes the identity; keeping this as
/// a trait lets tests count those calls without touching a real store.
pub trait IdentitySink: Send + Sync {
    /// Replace the current identity after a successful refresh.
    fn set_identity(&self, user: UserProfile);

    /// Wipe the session after an irrecoverable auth failure.
    fn clear(&self);
}

/// Thread-safe holder for the signed-in user.
///
/// One instance per client. Created empty; `is_authenticated` reports
/// whether an identity is currently held.
#[derive(Default)]
pub struct SessionStore {
    state: Mutex<Option<UserProfile>>,
}

impl SessionStore {
    /// Create an empty store (no user signed in).
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the current user, if any.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.lock().expect("session store lock poisoned").clone()
    }

    /// Whether an identity is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().expect("session store lock poisoned").is_some()
    }
}

impl IdentitySink for SessionStore {
    fn set_identity(&self, user: UserProfile) {
        let mut state = self.state.lock().expect("session store lock poisoned");
        debug!(user_id = %user.id, "session identity updated");
        *state = Some(user);
    }

    fn clear(&self) {
        let mut state = self.state.lock().expect("session store lock poisoned");
        if state.take().is_some() {
            info!("session cleared");
        }
    }
}
