/// Small numeric helpers shared across the vessel engine and generator.
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Convert a monotonic `Instant` into a wall-clock `SystemTime` for
/// serialization/logging. Best-effort: an `Instant` has no fixed epoch,
/// so this anchors off "now" on both clocks and carries the delta over.
pub fn instant_to_systemtime(instant: Instant) -> SystemTime {
    let now_instant = Instant::now();
    let now_systemtime = SystemTime::now();
    if instant <= now_instant {
        let duration_ago = now_instant.duration_since(instant);
        now_systemtime.checked_sub(duration_ago).unwrap_or(UNIX_EPOCH)
    } else {
        let duration_ahead = instant.duration_since(now_instant);
        now_systemtime
            .checked_add(duration_ahead)
            .unwrap_or(SystemTime::UNIX_EPOCH + Duration::from_secs(u64::MAX))
    }
}

/// Smallest signed difference `a - b` between two angles in degrees, in [-180, 180].
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut xx = ((a - b) % 360.0 + 360.0) % 360.0;
    if xx > 180.0 {
        xx -= 360.0;
    } else if xx < -180.0 {
        xx += 360.0;
    }
    xx
}

/// Normalize an angle in degrees to [0, 360).
pub fn normalize0_360(angle: f64) -> f64 {
    (angle % 360.0 + 360.0) % 360.0
}

/// True if `cog` falls in the northbound band `[315, 360) U [0, 45]`.
pub fn is_northbound_cog(cog: f64) -> bool {
    let normalized = normalize0_360(cog);
    (315.0..360.0).contains(&normalized) || (0.0..=45.0).contains(&normalized)
}
