//! Session holder.
//!
//! Mirrors the logged-in user to durable storage under a single key and
//! restores it at startup. Storage problems never reach the caller: a
//! malformed stored value reads as "no user" and failed writes are logged.

mod storage;

use std::sync::Arc;

use tracing::{debug, error, info, warn};

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

use crate::models::User;
use crate::store::{Action, AppState, StateObserver, Store};

/// Storage key holding the serialized user.
pub const SESSION_KEY: &str = "scoder-user";

/// Keeps durable storage in step with the logged-in user.
#[derive(Clone)]
pub struct SessionHolder {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHolder")
            .field("key", &SESSION_KEY)
            .finish_non_exhaustive()
    }
}

impl SessionHolder {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Read the stored user.
    ///
    /// Missing, unreadable and malformed values all come back as `None`.
    #[must_use]
    pub fn load(&self) -> Option<User> {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed stored session");
                None
            }
        }
    }

    /// Restore the stored user into `store`, if there is one.
    pub fn restore(&self, store: &Store) -> Option<User> {
        let user = self.load()?;
        info!(user_id = %user.id, "Restored session");
        store.dispatch(Action::SetUser(Some(user.clone())));
        Some(user)
    }

    /// Write `user` to storage, or delete the stored value when `None`.
    pub fn sync(&self, user: Option<&User>) {
        let result = match user {
            Some(user) => match serde_json::to_string(user) {
                Ok(json) => self.storage.set(SESSION_KEY, &json),
                Err(e) => {
                    error!(error = %e, "Failed to serialize session");
                    return;
                }
            },
            None => self.storage.remove(SESSION_KEY),
        };

        match result {
            Ok(()) => debug!(logged_in = user.is_some(), "Session persisted"),
            Err(e) => error!(error = %e, "Failed to persist session"),
        }
    }
}

impl StateObserver for SessionHolder {
    fn on_transition(&self, previous: &AppState, next: &AppState) {
        if previous.user != next.user {
            self.sync(next.user.as_ref());
        }
    }
}
