//! Angle helpers for the compass heading estimator

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Full turn in degrees
pub const FULL_TURN: f32 = 360.0;

/// Wrap an angle in degrees into the half-open range `[0, 360)`
///
/// Equivalent to `(degrees + 360) % 360` for the `(-180, 180]` output of
/// `atan2`, and also valid for any other finite input.
///
/// # Example
/// ```
/// use compass_heading::normalize_heading;
///
/// assert_eq!(normalize_heading(-90.0), 270.0);
/// assert_eq!(normalize_heading(360.0), 0.0);
/// assert_eq!(normalize_heading(45.0), 45.0);
/// ```
pub fn normalize_heading(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(FULL_TURN);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0 in f32
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Shortest signed rotation in degrees from `from` to `to`, in `(-180, 180]`
///
/// Positive values are clockwise.
///
/// # Example
/// ```
/// use compass_heading::shortest_delta;
///
/// assert_eq!(shortest_delta(359.0, 1.0), 2.0);
/// assert_eq!(shortest_delta(1.0, 359.0), -2.0);
/// ```
pub fn shortest_delta(from: f32, to: f32) -> f32 {
    let delta = (to - from).rem_euclid(FULL_TURN);
    if delta > FULL_TURN / 2.0 {
        delta - FULL_TURN
    } else {
        delta
    }
}
