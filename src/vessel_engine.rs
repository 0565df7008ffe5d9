//! The Vessel State Engine: ingests position reports, maintains one
//! [`VesselRecord`] per MMSI, and is the sole owner of mutable vessel
//! state, handing out immutable snapshots to the generator and status
//! surface.
//!
//! Owns a `HashMap<String, VesselRecord>` and mutates it in `update`,
//! the way a single-window kinematic tracker owns its per-entity state;
//! generalized here to bridge-proximity classification, passage
//! detection and target-bridge direction inference.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::bridge_registry::BridgeRegistry;
use crate::config::Config;
use crate::eta;
use crate::geometry;
use crate::ingress::PositionReport;
use crate::stallbacka;
use crate::timers::{TimerPurpose, TimerRegistry};
use crate::utilities::is_northbound_cog;
use crate::vessel::{Confidence, HoldState, VesselRecord, VesselSnapshot, VesselStatus};

/// Minimum speed, in knots, below which a vessel sitting near a bridge is
/// considered stationary rather than merely slow.
const STATIONARY_SOG_KN: f64 = 0.5;

/// How long a vessel must sit inside the approach radius before it is
/// treated as `waiting` even at non-trivial speed (e.g. drifting with
/// current).
const HOLDING_DURATION_SECS: u64 = 30;

/// Slack factor applied to a vessel's reported speed when judging whether
/// a large jump in position is still physically plausible.
const PLAUSIBLE_SPEED_SLACK: f64 = 1.5;

/// Floor speed (m/s) assumed for a vessel with no usable SOG, so that a
/// report with a dropped SOG field is not automatically flagged as a GPS
/// jump.
const PLAUSIBLE_SPEED_FLOOR_MPS: f64 = 5.0;

const KNOTS_TO_MPS: f64 = 0.514444;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MovementClass {
    Normal,
    Large,
    GpsJump,
}

pub struct VesselStateEngine {
    config: Config,
    registry: BridgeRegistry,
    vessels: HashMap<String, VesselRecord>,
    timers: TimerRegistry,
}

impl VesselStateEngine {
    pub fn new(config: Config) -> Self {
        let registry = BridgeRegistry::from_config(&config);
        Self {
            config,
            registry,
            vessels: HashMap::new(),
            timers: TimerRegistry::new(),
        }
    }

    pub fn registry(&self) -> &BridgeRegistry {
        &self.registry
    }

    /// Ingest a single position report. Returns `None` for reports that
    /// are structurally invalid or outside the configured bounding box;
    /// such reports never create or mutate a vessel.
    pub fn update(&mut self, mmsi: &str, report: &PositionReport, now: Instant) -> Option<VesselSnapshot> {
        if mmsi.is_empty() || !report.lat.is_finite() || !report.lon.is_finite() {
            debug!(mmsi, "rejecting report with non-finite position or empty mmsi");
            return None;
        }
        if !self.config.bounding_box.contains(report.lat, report.lon) {
            debug!(mmsi, lat = report.lat, lon = report.lon, "rejecting report outside bounding box");
            return None;
        }

        let is_new = !self.vessels.contains_key(mmsi);
        if is_new {
            self.vessels
                .insert(mmsi.to_string(), VesselRecord::new(mmsi.to_string(), report.lat, report.lon, now));
        }

        // Held in a block so `record` (an exclusive borrow) is dropped
        // before `schedule_cleanup` needs `&mut self.timers`.
        {
            let record = self.vessels.get_mut(mmsi).expect("just inserted or already present");
            if let Some(name) = &report.name {
                record.name = Some(name.clone());
            }

            let prev_lat = record.prev_lat.or(Some(record.lat));
            let prev_lon = record.prev_lon.or(Some(record.lon));
            let prev_update_time = record.prev_update_time.or(Some(record.last_update_time));

            let move_distance = geometry::distance(record.lat, record.lon, report.lat, report.lon).unwrap_or(0.0);
            let elapsed_secs = now
                .checked_duration_since(record.last_update_time)
                .unwrap_or_default()
                .as_secs_f64();

            let sog = report.sog.unwrap_or(record.sog);
            let movement = classify_movement(move_distance, elapsed_secs, sog);

            record.prev_lat = prev_lat;
            record.prev_lon = prev_lon;
            record.prev_update_time = prev_update_time;

            let had_bridge = record.current_bridge.clone();
            let had_distance = record.distance_to_current;
            let had_lat = record.lat;
            let had_lon = record.lon;

            record.lat = report.lat;
            record.lon = report.lon;
            record.sog = sog;
            record.cog = report.cog.or(record.cog);
            record.last_update_time = now;

            record.confidence = match movement {
                MovementClass::Normal => Confidence::High,
                MovementClass::Large => Confidence::Medium,
                MovementClass::GpsJump => Confidence::Low,
            };
            if movement == MovementClass::GpsJump {
                record.gps_jump_hold_until = Some(now + self.config.timers.gps_jump_cooldown());
                warn!(mmsi, distance = move_distance, elapsed_secs, "gps jump detected, holding from generator");
            }

            // currentBridge / distanceToCurrent.
            let nearest = self
                .registry
                .nearest_within(record.lat, record.lon, self.config.distances.approaching_m);
            record.current_bridge = nearest.map(|(b, _)| b.name.clone());
            record.distance_to_current = nearest.map(|(_, d)| d);

            // proximity_since tracking for the waiting/approaching split.
            match &record.current_bridge {
                Some(bridge_name) if record.distance_to_current.unwrap_or(f64::INFINITY) <= self.config.distances.approach_m => {
                    let same_bridge_as_before = had_bridge.as_deref() == Some(bridge_name.as_str());
                    if !(same_bridge_as_before && record.proximity_since.is_some()) {
                        record.proximity_since = Some(now);
                    }
                }
                _ => record.proximity_since = None,
            }

            // Proposed status.
            let generic_status = classify_status(
                &self.config,
                record.distance_to_current,
                sog,
                record.proximity_since,
                now,
            );
            record.status = match &record.current_bridge {
                Some(bridge_name) => stallbacka::adjust_status(
                    &self.registry,
                    bridge_name,
                    generic_status,
                    record.distance_to_current,
                    self.config.distances.approach_m,
                ),
                None => VesselStatus::EnRoute,
            };

            // Passage detection.
            if let Some(prev_bridge_name) = &had_bridge {
                let was_under = had_distance.unwrap_or(f64::INFINITY) <= self.config.distances.under_bridge_m;
                if was_under {
                    let still_under_same_bridge = record.current_bridge.as_deref() == Some(prev_bridge_name.as_str())
                        && record.distance_to_current.unwrap_or(f64::INFINITY) <= self.config.distances.under_bridge_m;
                    let moved = geometry::distance(had_lat, had_lon, record.lat, record.lon).unwrap_or(0.0) > 1.0;
                    if !still_under_same_bridge && moved {
                        record.passed_bridges.push(prev_bridge_name.clone());
                        record.last_passed_bridge = Some(prev_bridge_name.clone());
                        record.last_passed_bridge_time = Some(now);
                        // SOG briefly lost/zero across the bridge: keep the
                        // opening/passing line visible for a window instead
                        // of the one-shot pending hold, since further
                        // reports may also arrive with no usable SOG.
                        record.hold_state = if sog <= STATIONARY_SOG_KN {
                            HoldState::SyntheticUnder {
                                bridge: prev_bridge_name.clone(),
                                until: now + self.config.timers.synthetic_hold(),
                            }
                        } else {
                            HoldState::PendingUnder {
                                bridge: prev_bridge_name.clone(),
                                set_at: now,
                            }
                        };
                        info!(mmsi, bridge = %prev_bridge_name, "passage detected");
                    }
                }
            }

            // targetBridge recomputation.
            let northbound = match record.cog {
                Some(cog) => is_northbound_cog(cog),
                None => match (record.prev_lat, record.lat) {
                    (Some(prev), curr) if curr != prev => curr > prev,
                    _ => true,
                },
            };
            record.target_bridge = compute_target_bridge(&self.registry, record.lat, record.lon, northbound, &record.passed_bridges);

            // etaMinutes recomputation.
            record.eta_minutes = compute_eta(&self.registry, record, sog);

            let snapshot = record.snapshot();
            drop(record);
            self.schedule_cleanup(mmsi, self.config.timers.stale_vessel(), now);
            return Some(snapshot);
        }
    }

    pub fn get(&self, mmsi: &str) -> Option<VesselSnapshot> {
        self.vessels.get(mmsi).map(|r| r.snapshot())
    }

    pub fn all(&self) -> Vec<VesselSnapshot> {
        self.vessels.values().map(|r| r.snapshot()).collect()
    }

    pub fn remove(&mut self, mmsi: &str, reason: &str) {
        if self.vessels.remove(mmsi).is_some() {
            self.timers.cancel_all_for(mmsi);
            info!(mmsi, reason, "vessel removed");
        }
    }

    pub fn schedule_cleanup(&mut self, mmsi: &str, delay: std::time::Duration, now: Instant) {
        self.timers.schedule(TimerPurpose::Cleanup, mmsi, now + delay);
    }

    pub fn clear_cleanup(&mut self, mmsi: &str) {
        self.timers.cancel(TimerPurpose::Cleanup, mmsi);
    }

    pub fn clear_all_timers(&mut self) {
        self.timers.clear_all();
    }

    /// Removes every vessel whose cleanup timer has elapsed. Called
    /// periodically by the orchestrator loop.
    pub fn sweep_stale(&mut self, now: Instant) {
        for mmsi in self.timers.expired(TimerPurpose::Cleanup, now) {
            self.remove(&mmsi, "stale");
        }
    }

    pub fn has_gps_jump_hold(&self, mmsi: &str, now: Instant) -> bool {
        self.vessels
            .get(mmsi)
            .map(|r| matches!(r.gps_jump_hold_until, Some(until) if until > now))
            .unwrap_or(false)
    }

    /// Marks a vessel's pending-under-bridge hold consumed, clearing it so
    /// the next generation renders the recently-passed phrase instead.
    pub fn consume_pending_hold(&mut self, mmsi: &str) {
        if let Some(record) = self.vessels.get_mut(mmsi) {
            if matches!(record.hold_state, HoldState::PendingUnder { .. }) {
                record.hold_state = HoldState::None;
            }
        }
    }
}

fn classify_movement(distance_m: f64, elapsed_secs: f64, sog_knots: f64) -> MovementClass {
    if distance_m <= 300.0 {
        return MovementClass::Normal;
    }
    let speed_mps = (sog_knots * KNOTS_TO_MPS).max(PLAUSIBLE_SPEED_FLOOR_MPS);
    let plausible_distance = speed_mps * elapsed_secs.max(0.0) * PLAUSIBLE_SPEED_SLACK;
    if distance_m <= plausible_distance {
        MovementClass::Large
    } else {
        MovementClass::GpsJump
    }
}

fn classify_status(
    config: &Config,
    distance_to_current: Option<f64>,
    sog_knots: f64,
    proximity_since: Option<Instant>,
    now: Instant,
) -> VesselStatus {
    let d = match distance_to_current {
        Some(d) => d,
        None => return VesselStatus::EnRoute,
    };

    if d <= config.distances.under_bridge_m {
        return VesselStatus::UnderBridge;
    }
    if d <= config.distances.approach_m {
        let stationary = sog_knots <= STATIONARY_SOG_KN;
        let held_long_enough = proximity_since
            .map(|since| now.saturating_duration_since(since).as_secs() >= HOLDING_DURATION_SECS)
            .unwrap_or(false);
        return if stationary || held_long_enough {
            VesselStatus::Waiting
        } else {
            VesselStatus::Approaching
        };
    }
    if d <= config.distances.approaching_m {
        return VesselStatus::Approaching;
    }
    VesselStatus::EnRoute
}

fn compute_target_bridge(
    registry: &BridgeRegistry,
    lat: f64,
    lon: f64,
    northbound: bool,
    passed_bridges: &[String],
) -> Option<String> {
    let (nearest_bridge, _) = registry.nearest(lat, lon)?;
    let nearest_idx = registry.sequence_index(&nearest_bridge.id)?;

    let candidates: Vec<(usize, String)> = registry
        .sequence()
        .iter()
        .enumerate()
        .filter_map(|(idx, id)| {
            let bridge = registry.by_id(id)?;
            if registry.is_target(&bridge.name) && !passed_bridges.iter().any(|p| p == &bridge.name) {
                Some((idx, bridge.name.clone()))
            } else {
                None
            }
        })
        .collect();

    if northbound {
        candidates.into_iter().filter(|(idx, _)| *idx >= nearest_idx).min_by_key(|(idx, _)| *idx).map(|(_, name)| name)
    } else {
        candidates.into_iter().filter(|(idx, _)| *idx <= nearest_idx).max_by_key(|(idx, _)| *idx).map(|(_, name)| name)
    }
}

fn compute_eta(registry: &BridgeRegistry, record: &VesselRecord, sog_knots: f64) -> Option<f64> {
    let target_name = record.target_bridge.as_ref()?;
    let target = registry.by_name(target_name)?;
    let distance_m = geometry::distance(record.lat, record.lon, target.lat, target.lon)?;
    let speed_mps = (sog_knots * KNOTS_TO_MPS).max(STATIONARY_SOG_KN * KNOTS_TO_MPS);
    if speed_mps <= 0.0 {
        return None;
    }
    let eta_minutes = distance_m / speed_mps / 60.0;
    if eta::is_valid(eta_minutes) {
        Some(eta_minutes)
    } else {
        None
    }
}
