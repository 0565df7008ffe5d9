//! Great-circle distance and bearing on a spherical Earth.
//!
//! Haversine distance and forward azimuth as free functions operating
//! directly on lat/lon pairs.

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters via the haversine
/// formula. Returns `None` if any input is non-finite.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Option<f64> {
    if !lat1.is_finite() || !lon1.is_finite() || !lat2.is_finite() || !lon2.is_finite() {
        return None;
    }

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Some(EARTH_RADIUS_M * c)
}

/// Forward azimuth from point 1 to point 2, normalized to `[0, 360)`.
/// Returns `None` if any input is non-finite.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Option<f64> {
    if !lat1.is_finite() || !lon1.is_finite() || !lat2.is_finite() || !lon2.is_finite() {
        return None;
    }

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlon_rad = (lon2 - lon1).to_radians();

    let y = dlon_rad.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * dlon_rad.cos();
    let initial_bearing = y.atan2(x).to_degrees();

    Some((initial_bearing + 360.0) % 360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_distance_same_point_is_zero() {
        let d = distance(58.28, 12.30, 58.28, 12.30).unwrap();
        assert!(d < 0.1);
    }

    #[test]
    fn test_distance_known_separation() {
        // ~111m per 0.001 degree of longitude at the equator.
        let d = distance(0.0, 0.0, 0.0, 0.001).unwrap();
        assert!(d > 100.0 && d < 120.0);
    }

    #[test]
    fn test_distance_rejects_non_finite() {
        assert!(distance(f64::NAN, 0.0, 0.0, 0.0).is_none());
        assert!(distance(0.0, 0.0, f64::INFINITY, 0.0).is_none());
    }

    #[test]
    fn test_bearing_due_north() {
        let b = bearing(58.0, 12.0, 59.0, 12.0).unwrap();
        assert_abs_diff_eq!(b, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bearing_due_east() {
        let b = bearing(0.0, 0.0, 0.0, 1.0).unwrap();
        assert_abs_diff_eq!(b, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bearing_is_normalized() {
        let b = bearing(58.0, 12.0, 57.0, 11.0).unwrap();
        assert!((0.0..360.0).contains(&b));
    }

    #[test]
    fn test_bearing_rejects_non_finite() {
        assert!(bearing(f64::NAN, 0.0, 0.0, 0.0).is_none());
    }
}
