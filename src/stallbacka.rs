//! Centralized Stallbackabron special-casing, consulted by both the
//! engine and the generator rather than scattered across conditionals.
//!
//! Stallbackabron is the one bridge in the sequence that never opens; both
//! the status classification and the phrase selection need to know that
//! without re-deriving it from the bridge name at each call site.

use crate::bridge_registry::BridgeRegistry;
use crate::vessel::VesselStatus;

/// True if `bridge_name` is the configured non-opening special bridge.
pub fn is_special(registry: &BridgeRegistry, bridge_name: &str) -> bool {
    registry.is_special(bridge_name)
}

/// Maps a proximity-only status (as the engine would assign at a generic
/// bridge) onto the Stallbackabron-specific status, when applicable.
///
/// Unlike a generic bridge, proximity within `approach_m` of Stallbackabron
/// is `stallbacka-waiting` unconditionally, regardless of SOG or holding
/// duration — the engine's generic classifier can't tell this apart from
/// the ordinary low-SOG/holding `waiting` case, since it only sees a
/// distance. `under-bridge` proximity stays `under-bridge` — the generator
/// differentiates the phrase, not the status.
pub fn adjust_status(
    registry: &BridgeRegistry,
    bridge_name: &str,
    generic: VesselStatus,
    distance_to_current: Option<f64>,
    approach_m: f64,
) -> VesselStatus {
    if !is_special(registry, bridge_name) {
        return generic;
    }
    match generic {
        VesselStatus::UnderBridge => VesselStatus::UnderBridge,
        _ if distance_to_current.map(|d| d <= approach_m).unwrap_or(false) => VesselStatus::StallbackaWaiting,
        other => other,
    }
}
