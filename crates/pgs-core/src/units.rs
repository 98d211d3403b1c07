//! Speed unit conversion and the safe-following-distance speed model.
//!
//! Street speed limits arrive in km/h (the unit OSM `maxspeed` uses) and are
//! stored in m/s for movement; path weights that prefer fast roads stay in
//! km/h so `100 - limit` keeps its familiar scale.

/// Reaction time assumed when converting free road length into a safe speed.
pub const SAFETY_DELTA_SECS: f64 = 1.0;

/// Lowest speed the congestion model ever recommends (≈ 5 km/h), so a jammed
/// street still drains.
pub const MIN_SAFE_SPEED_MS: f64 = 1.38;

#[inline]
pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh * 1000.0 / 3600.0
}

#[inline]
pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * 3600.0 / 1000.0
}

/// Fastest speed at which a car can still stop within `gap_m`, floored at
/// [`MIN_SAFE_SPEED_MS`].
#[inline]
pub fn safe_speed_ms(gap_m: f64) -> f64 {
    (gap_m / SAFETY_DELTA_SECS).max(MIN_SAFE_SPEED_MS)
}
