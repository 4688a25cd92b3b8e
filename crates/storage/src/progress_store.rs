use serde_json::Value;
use std::sync::Arc;

use workshop_core::model::{ProgressState, ScenarioResult};

use crate::kv::{KeyValueStore, StorageError};

/// Key the workshop progress lives under.
pub const PROGRESS_KEY: &str = "promptz-workshop-progress";

/// Throwaway key used to probe writability.
pub const PROBE_KEY: &str = "__storage_test__";

/// Loads and saves [`ProgressState`] under a single key.
///
/// Never fails from the caller's point of view: unreadable, corrupted or
/// malformed data loads as the default state, and failed writes are dropped.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Option<Arc<dyn KeyValueStore>>,
    key: String,
}

impl ProgressStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend: Some(backend),
            key: PROGRESS_KEY.to_owned(),
        }
    }

    /// A store with no backend at all; loads default, saves nothing.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            backend: None,
            key: PROGRESS_KEY.to_owned(),
        }
    }

    /// Use `key` instead of [`PROGRESS_KEY`].
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Probes the backend with a write-then-remove on [`PROBE_KEY`].
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.writable_backend().is_some()
    }

    /// Returns the saved state, or the default state if anything is off.
    #[must_use]
    pub fn load(&self) -> ProgressState {
        let Some(backend) = self.writable_backend() else {
            return ProgressState::default();
        };

        let raw = match backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ProgressState::default(),
            Err(err) => {
                tracing::debug!(key = %self.key, error = %err, "progress read failed");
                return ProgressState::default();
            }
        };

        match decode_progress(&raw) {
            Some(state) => state,
            None => {
                tracing::debug!(key = %self.key, "stored progress malformed, using defaults");
                ProgressState::default()
            }
        }
    }

    /// Replaces the stored value with `state`. Failures are logged and ignored.
    pub fn save(&self, state: &ProgressState) {
        let Some(backend) = self.writable_backend() else {
            return;
        };

        let result = serde_json::to_string(state)
            .map_err(|e| StorageError::Serialization(e.to_string()))
            .and_then(|text| backend.set(&self.key, &text));
        if let Err(err) = result {
            tracing::warn!(key = %self.key, error = %err, "progress not saved");
        }
    }

    /// Deletes the stored value. Failures are logged and ignored.
    pub fn reset(&self) {
        let Some(backend) = self.writable_backend() else {
            return;
        };

        if let Err(err) = backend.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %err, "progress not reset");
        }
    }

    fn writable_backend(&self) -> Option<&dyn KeyValueStore> {
        let backend = self.backend.as_deref()?;
        let probe = backend
            .set(PROBE_KEY, "test")
            .and_then(|()| backend.remove(PROBE_KEY));
        match probe {
            Ok(()) => Some(backend),
            Err(err) => {
                tracing::debug!(error = %err, "storage probe failed");
                None
            }
        }
    }
}

/// Parses `raw` and returns it only if it matches the persisted shape.
#[must_use]
pub fn decode_progress(raw: &str) -> Option<ProgressState> {
    let mut value: Value = serde_json::from_str(raw).ok()?;
    let index = valid_index(&value)?;
    if !has_valid_entries(&value) {
        return None;
    }

    // the index was checked above and may be an integral float, so only the
    // entries go through typed decoding
    let entries = value.get_mut("completedScenarios")?.take();
    let completed_scenarios: Vec<ScenarioResult> = serde_json::from_value(entries).ok()?;
    Some(ProgressState {
        completed_scenarios,
        current_scenario_index: index,
    })
}

fn valid_index(value: &Value) -> Option<usize> {
    let number = value.as_object()?.get("currentScenarioIndex")?;
    if let Some(n) = number.as_u64() {
        return usize::try_from(n).ok();
    }
    // integral floats such as 2.0 are accepted; negatives and fractions are not
    let f = number.as_f64()?;
    if !(f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = f as usize;
    Some(index)
}

fn has_valid_entries(value: &Value) -> bool {
    let Some(entries) = value.get("completedScenarios").and_then(Value::as_array) else {
        return false;
    };
    entries.iter().all(|entry| {
        entry.as_object().is_some_and(|obj| {
            obj.get("scenarioId").is_some_and(Value::is_string)
                && obj.get("correctOnFirstAttempt").is_some_and(Value::is_boolean)
        })
    })
}
