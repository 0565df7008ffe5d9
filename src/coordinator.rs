//! The System Coordinator: a per-vessel and global stabilizer that hints
//! the orchestrator to suppress bridge-text publishing during GPS anomaly
//! bursts. It never mutates vessel state — only debounce and coordination
//! bookkeeping.
//!
//! Tracks a rolling instability signal and exposes a simple enum verdict,
//! generalized here to per-vessel debounce windows plus a global decaying
//! instability counter.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::timers::{TimerPurpose, TimerRegistry};
use crate::vessel::VesselStatus;

/// How many concurrent unstable events (GPS jumps / large moves) trigger
/// system-wide debounce.
const GLOBAL_INSTABILITY_THRESHOLD: u32 = 3;

/// Decay rate for the global instability counter: one count per this many
/// seconds of quiet.
const DECAY_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizationLevel {
    None,
    Light,
    Moderate,
    Enhanced,
}

/// A coarse summary of a single position update, derived by the
/// orchestrator from the engine's movement classification, that the
/// coordinator reacts to without needing the engine's internals.
#[derive(Debug, Clone, Copy)]
pub struct PositionAnalysis {
    pub is_gps_jump: bool,
    pub is_large_move: bool,
    pub accept_with_caution: bool,
}

impl PositionAnalysis {
    pub fn is_unstable(&self) -> bool {
        self.is_gps_jump || self.is_large_move || self.accept_with_caution
    }
}

#[derive(Debug, Clone)]
pub struct CoordinationResult {
    pub should_proceed: bool,
    pub should_debounce_text: bool,
    pub stabilization_level: StabilizationLevel,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct DebounceResult {
    pub should_debounce: bool,
    pub remaining: Duration,
    pub reason: String,
}

pub struct SystemCoordinator {
    timers: TimerRegistry,
    debounce_reasons: HashMap<String, String>,
    unstable_count: u32,
    last_decay: Instant,
    coordination_window: Duration,
    debounce_window: Duration,
}

impl SystemCoordinator {
    pub fn new(coordination_window: Duration, debounce_window: Duration, now: Instant) -> Self {
        Self {
            timers: TimerRegistry::new(),
            debounce_reasons: HashMap::new(),
            unstable_count: 0,
            last_decay: now,
            coordination_window,
            debounce_window,
        }
    }

    fn decay(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_decay);
        let steps = elapsed.as_secs() / DECAY_INTERVAL_SECS;
        if steps > 0 {
            self.unstable_count = self.unstable_count.saturating_sub(steps as u32);
            self.last_decay += Duration::from_secs(steps * DECAY_INTERVAL_SECS);
        }
    }

    /// Reacts to one vessel's position update. Never refuses to proceed —
    /// `should_proceed` exists for symmetry with the source design and is
    /// always true in this implementation; only text publication is
    /// debounced. Neither the state engine nor the generator ever suspend
    /// mid-update.
    pub fn coordinate_position_update(&mut self, mmsi: &str, analysis: &PositionAnalysis, now: Instant) -> CoordinationResult {
        self.decay(now);

        let (level, debounce, reason) = if analysis.is_gps_jump {
            self.unstable_count = self.unstable_count.saturating_add(1);
            self.timers.schedule(TimerPurpose::Debounce, mmsi, now + self.debounce_window);
            self.timers.schedule(TimerPurpose::Coordination, mmsi, now + self.coordination_window);
            self.debounce_reasons.insert(mmsi.to_string(), "gps_jump".to_string());
            (StabilizationLevel::Enhanced, true, "gps_jump".to_string())
        } else if analysis.accept_with_caution {
            self.unstable_count = self.unstable_count.saturating_add(1);
            self.timers.schedule(TimerPurpose::Debounce, mmsi, now + self.debounce_window);
            self.debounce_reasons.insert(mmsi.to_string(), "accept_with_caution".to_string());
            (StabilizationLevel::Moderate, true, "accept_with_caution".to_string())
        } else if analysis.is_large_move {
            self.timers.schedule(TimerPurpose::Debounce, mmsi, now + self.debounce_window);
            self.debounce_reasons.insert(mmsi.to_string(), "large_move".to_string());
            (StabilizationLevel::Light, true, "large_move".to_string())
        } else {
            (StabilizationLevel::None, false, "stable".to_string())
        };

        debug!(mmsi, ?level, debounce, reason, "coordinate_position_update");

        CoordinationResult {
            should_proceed: true,
            should_debounce_text: debounce,
            stabilization_level: level,
            reason,
        }
    }

    /// A status-stabilization hook. The engine already owns the
    /// authoritative status; this coordinator does not override it, only
    /// records the coordination context alongside it. Kept as an explicit
    /// pass-through rather than removed, so the coordination seam stays
    /// visible at the call site.
    pub fn coordinate_status_stabilization(&mut self, status: VesselStatus, _analysis: &PositionAnalysis) -> VesselStatus {
        status
    }

    /// Global hint: is bridge-text publication currently debounced, either
    /// because a per-vessel debounce window is open or because the global
    /// instability counter is at or above threshold.
    pub fn should_debounce_bridge_text(&mut self, now: Instant) -> DebounceResult {
        self.decay(now);

        if self.unstable_count >= GLOBAL_INSTABILITY_THRESHOLD {
            return DebounceResult {
                should_debounce: true,
                remaining: Duration::from_secs(DECAY_INTERVAL_SECS),
                reason: "global_instability".to_string(),
            };
        }

        let mut latest: Option<(Duration, String)> = None;
        for (mmsi, reason) in self.debounce_reasons.iter() {
            if let Some(deadline) = self.timers.deadline(TimerPurpose::Debounce, mmsi) {
                if deadline > now {
                    let remaining = deadline.saturating_duration_since(now);
                    latest = match latest {
                        Some((prev, _)) if prev >= remaining => latest,
                        _ => Some((remaining, reason.clone())),
                    };
                }
            }
        }

        match latest {
            Some((remaining, reason)) => DebounceResult {
                should_debounce: true,
                remaining,
                reason,
            },
            None => DebounceResult {
                should_debounce: false,
                remaining: Duration::ZERO,
                reason: "stable".to_string(),
            },
        }
    }

    /// Drops expired debounce/coordination timers and their reason entries.
    pub fn cleanup(&mut self, now: Instant) {
        for mmsi in self.timers.expired(TimerPurpose::Debounce, now) {
            self.timers.cancel(TimerPurpose::Debounce, &mmsi);
            self.debounce_reasons.remove(&mmsi);
        }
        for mmsi in self.timers.expired(TimerPurpose::Coordination, now) {
            self.timers.cancel(TimerPurpose::Coordination, &mmsi);
        }
    }

    pub fn remove_vessel(&mut self, mmsi: &str) {
        self.timers.cancel_all_for(mmsi);
        self.debounce_reasons.remove(mmsi);
    }

    pub fn outstanding_timer_count(&self) -> usize {
        self.timers.len()
    }
}
