//! Validation and Swedish-language formatting of estimated time of arrival.
//!
//! Kept as small, independently testable formatting helpers, separate
//! from the components that compute the underlying values.

/// `eta` is a finite number of minutes in `[0, 180]`.
pub fn is_valid(eta: f64) -> bool {
    eta.is_finite() && eta >= 0.0 && eta <= 180.0
}

/// Render an ETA in minutes as the Swedish phrase used in bridge text.
///
/// - `eta < 1.0` → "om mindre än 1 minut"
/// - `1.0 <= eta < 1.5` → "om 1 minut"
/// - otherwise, round to the nearest integer minute → "om N minuter"
///
/// Callers are expected to have validated `eta` with [`is_valid`] first;
/// an invalid ETA renders as the sub-minute phrase rather than panicking,
/// since the generator treats an unusable ETA as "no ETA" upstream of this
/// function (see [`crate::bridge_text`]).
pub fn format(eta: f64) -> String {
    if eta < 1.0 {
        "om mindre än 1 minut".to_string()
    } else if eta < 1.5 {
        "om 1 minut".to_string()
    } else {
        let minutes = eta.round() as i64;
        format!("om {} minuter", minutes)
    }
}

/// Debug-only rendering of an ETA, not used in any user-facing text.
pub fn display(eta: f64) -> String {
    format!("{:.2} min", eta)
}
