//! Logical timer registry: a map from purpose+mmsi to a deadline, with
//! replace-cancels-prior semantics.
//!
//! A single owned map consulted by the main loop rather than spawned
//! per-entry tasks, generalized to arbitrary timer purposes instead of
//! one fixed check.

use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    Cleanup,
    Debounce,
    Coordination,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TimerKey {
    purpose: TimerPurpose,
    mmsi: String,
}

/// Owns every outstanding deadline in the process. Not a real scheduler:
/// callers poll `is_due`/`expired_keys` from the single executor loop
/// rather than registering callbacks, matching a single-threaded
/// cooperative model.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    deadlines: HashMap<TimerKey, Instant>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or replace) a timer. Replacing cancels the prior deadline
    /// implicitly, since only one deadline is kept per key.
    pub fn schedule(&mut self, purpose: TimerPurpose, mmsi: &str, deadline: Instant) {
        self.deadlines.insert(
            TimerKey {
                purpose,
                mmsi: mmsi.to_string(),
            },
            deadline,
        );
    }

    pub fn cancel(&mut self, purpose: TimerPurpose, mmsi: &str) {
        self.deadlines.remove(&TimerKey {
            purpose,
            mmsi: mmsi.to_string(),
        });
    }

    /// Cancel every timer belonging to a vessel, e.g. on removal.
    pub fn cancel_all_for(&mut self, mmsi: &str) {
        self.deadlines.retain(|key, _| key.mmsi != mmsi);
    }

    pub fn is_scheduled(&self, purpose: TimerPurpose, mmsi: &str) -> bool {
        self.deadlines.contains_key(&TimerKey {
            purpose,
            mmsi: mmsi.to_string(),
        })
    }

    pub fn deadline(&self, purpose: TimerPurpose, mmsi: &str) -> Option<Instant> {
        self.deadlines
            .get(&TimerKey {
                purpose,
                mmsi: mmsi.to_string(),
            })
            .copied()
    }

    /// MMSIs whose timer of the given purpose has passed its deadline.
    pub fn expired(&self, purpose: TimerPurpose, now: Instant) -> Vec<String> {
        self.deadlines
            .iter()
            .filter(|(key, deadline)| key.purpose == purpose && **deadline <= now)
            .map(|(key, _)| key.mmsi.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Cancel every timer in the registry, process-wide. Used on shutdown.
    pub fn clear_all(&mut self) {
        self.deadlines.clear();
    }
}
