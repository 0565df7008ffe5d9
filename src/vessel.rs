//! The vessel data model: the mutable record owned by the state engine and
//! the immutable snapshot handed to the generator and the status surface.
//!
//! Generalized to per-MMSI records, with the mutable engine-owned record
//! kept deliberately separate from the immutable snapshot passed to the
//! generator and the status surface.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utilities::instant_to_systemtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VesselStatus {
    EnRoute,
    Approaching,
    Waiting,
    StallbackaWaiting,
    UnderBridge,
    Passed,
}

impl VesselStatus {
    /// Priority used by the generator's per-group vessel selection:
    /// higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            VesselStatus::Passed => 6,
            VesselStatus::UnderBridge => 5,
            VesselStatus::Waiting => 4,
            VesselStatus::StallbackaWaiting => 3,
            VesselStatus::Approaching => 2,
            VesselStatus::EnRoute => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Short-lived marker instructing the generator to render a specific
/// template regardless of live position. Mutually exclusive by
/// construction: setting one clears the other rather than tracking two
/// independent boolean flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HoldState {
    None,
    /// Forces an "opening in progress" phrase ahead of any "just passed"
    /// phrase, consumed (cleared) the first time the generator renders it.
    PendingUnder {
        bridge: String,
        #[serde(skip)]
        set_at: Instant,
    },
    /// Keeps a passing/opening line visible for a bridge even without a
    /// fresh under-bridge report, e.g. when SOG briefly dropped out.
    SyntheticUnder {
        bridge: String,
        #[serde(skip)]
        until: Instant,
    },
}

impl HoldState {
    pub fn is_none(&self) -> bool {
        matches!(self, HoldState::None)
    }
}

/// Immutable, non-aliased view of a vessel's state, handed to the
/// generator and to readers of `VesselStateEngine::all()`.
#[derive(Debug, Clone, Serialize)]
pub struct VesselSnapshot {
    pub mmsi: String,
    pub name: Option<String>,

    pub lat: f64,
    pub lon: f64,
    pub sog: f64,
    pub cog: Option<f64>,
    #[serde(skip)]
    pub last_update_time: Instant,
    pub last_update_at: DateTime<Utc>,

    pub current_bridge: Option<String>,
    pub distance_to_current: Option<f64>,
    pub target_bridge: Option<String>,
    pub status: VesselStatus,
    pub eta_minutes: Option<f64>,
    pub is_waiting: bool,
    pub confidence: Confidence,

    pub passed_bridges: Vec<String>,
    pub last_passed_bridge: Option<String>,
    #[serde(skip)]
    pub last_passed_bridge_time: Option<Instant>,

    pub hold_state: HoldState,
    #[serde(skip)]
    pub gps_jump_hold_until: Option<Instant>,
}

impl VesselSnapshot {
    pub fn has_gps_jump_hold(&self, now: Instant) -> bool {
        matches!(self.gps_jump_hold_until, Some(until) if until > now)
    }

    /// Milliseconds since this vessel's last recorded passage, or `None`
    /// if it has never passed a bridge.
    pub fn ms_since_last_passage(&self, now: Instant) -> Option<u64> {
        self.last_passed_bridge_time
            .map(|t| now.saturating_duration_since(t).as_millis() as u64)
    }
}

/// The mutable per-vessel record owned exclusively by the state engine.
/// Never handed out directly; `snapshot()` produces the immutable view.
#[derive(Debug, Clone)]
pub struct VesselRecord {
    pub mmsi: String,
    pub name: Option<String>,

    pub lat: f64,
    pub lon: f64,
    pub sog: f64,
    pub cog: Option<f64>,
    pub last_update_time: Instant,

    pub prev_lat: Option<f64>,
    pub prev_lon: Option<f64>,
    pub prev_update_time: Option<Instant>,

    pub current_bridge: Option<String>,
    pub distance_to_current: Option<f64>,
    pub target_bridge: Option<String>,
    pub status: VesselStatus,
    pub eta_minutes: Option<f64>,
    pub confidence: Confidence,

    /// When the vessel first entered the approach radius at its current
    /// bridge without moving off; used to classify `waiting` vs `approaching`.
    pub proximity_since: Option<Instant>,

    pub passed_bridges: Vec<String>,
    pub last_passed_bridge: Option<String>,
    pub last_passed_bridge_time: Option<Instant>,

    pub hold_state: HoldState,
    pub gps_jump_hold_until: Option<Instant>,

    pub created_at: Instant,
}

impl VesselRecord {
    pub fn new(mmsi: String, lat: f64, lon: f64, now: Instant) -> Self {
        Self {
            mmsi,
            name: None,
            lat,
            lon,
            sog: 0.0,
            cog: None,
            last_update_time: now,
            prev_lat: None,
            prev_lon: None,
            prev_update_time: None,
            current_bridge: None,
            distance_to_current: None,
            target_bridge: None,
            status: VesselStatus::EnRoute,
            eta_minutes: None,
            confidence: Confidence::Medium,
            proximity_since: None,
            passed_bridges: Vec::new(),
            last_passed_bridge: None,
            last_passed_bridge_time: None,
            hold_state: HoldState::None,
            gps_jump_hold_until: None,
            created_at: now,
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.status, VesselStatus::Waiting | VesselStatus::StallbackaWaiting)
    }

    pub fn snapshot(&self) -> VesselSnapshot {
        VesselSnapshot {
            mmsi: self.mmsi.clone(),
            name: self.name.clone(),
            lat: self.lat,
            lon: self.lon,
            sog: self.sog,
            cog: self.cog,
            last_update_time: self.last_update_time,
            last_update_at: instant_to_systemtime(self.last_update_time).into(),
            current_bridge: self.current_bridge.clone(),
            distance_to_current: self.distance_to_current,
            target_bridge: self.target_bridge.clone(),
            status: self.status,
            eta_minutes: self.eta_minutes,
            is_waiting: self.is_waiting(),
            confidence: self.confidence,
            passed_bridges: self.passed_bridges.clone(),
            last_passed_bridge: self.last_passed_bridge.clone(),
            last_passed_bridge_time: self.last_passed_bridge_time,
            hold_state: self.hold_state.clone(),
            gps_jump_hold_until: self.gps_jump_hold_until,
        }
    }
}
