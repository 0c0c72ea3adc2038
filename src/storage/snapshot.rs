use crate::{errors::SmokeError, form::FormState};

use super::{KeyValueStore, Result};

pub const DEFAULT_STORAGE_KEY: &str = "smokeTestState";

/// Mirrors the form state into a single key of a [`KeyValueStore`].
///
/// Failures never reach the caller: unreadable snapshots load as an empty
/// form and failed writes are logged and dropped.
pub struct SnapshotStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl SnapshotStore {
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored snapshot, surfacing storage and parse errors.
    pub fn try_load(&self) -> Result<Option<FormState>> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        let mut state: FormState = serde_json::from_str(&raw)?;
        state.notifications.clear();
        if state.completed {
            state.is_read_only = true;
        }
        Ok(Some(state))
    }

    /// Loads the saved state. `None` when nothing usable is stored.
    pub fn load_saved(&self) -> Option<FormState> {
        match self.try_load() {
            Ok(Some(state)) => {
                tracing::info!(key = %self.key, completed = state.completed, "restored saved form state");
                Some(state)
            }
            Ok(None) => {
                tracing::debug!(key = %self.key, "no saved form state");
                None
            }
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "ignoring unreadable saved form state");
                None
            }
        }
    }

    /// Loads the saved state, falling back to an empty form.
    pub fn load(&self) -> FormState {
        self.load_saved().unwrap_or_default()
    }

    /// Writes the snapshot. Returns whether the write succeeded.
    pub fn save(&self, state: &FormState) -> bool {
        let result = serde_json::to_string(state)
            .map_err(SmokeError::from)
            .and_then(|json| self.backend.set(&self.key, &json));
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(key = %self.key, %err, "failed to save form state");
                false
            }
        }
    }

    pub fn clear(&self) -> bool {
        match self.backend.remove(&self.key) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(key = %self.key, %err, "failed to clear form state");
                false
            }
        }
    }
}
