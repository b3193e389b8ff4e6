//! Swell size, direction and period.

use super::{unit, NEUTRAL};
use crate::profile::LocationProfile;
use crate::RawConditions;

/// Below this height the sea is considered flat.
const FLAT_HEIGHT_M: f64 = 0.1;

/// Floor for surfable-but-off-range heights.
const HEIGHT_FLOOR: f64 = 0.1;

/// Score when no period is reported.
pub const NEUTRAL_PERIOD: f64 = 0.3;

/// Is the wave height in the sweet spot for this beach?
///
/// 1.0 inside the ideal range, `height / low` below it (floor 0.1), and a
/// linear decay with the overshoot fraction above it (floor 0.1). Flat or
/// missing height scores 0.
pub fn swell_quality(cond: &RawConditions, profile: &LocationProfile) -> f64 {
    let h = match cond.primary_height() {
        Some(h) if h >= FLAT_HEIGHT_M => h,
        _ => return 0.0,
    };

    let range = profile.ideal_height;
    let score = if range.contains(h) {
        1.0
    } else if h < range.low {
        (h / range.low).max(HEIGHT_FLOOR)
    } else {
        let overshoot = (h - range.high) / range.high;
        (1.0 - overshoot * 0.5).max(HEIGHT_FLOOR)
    };

    unit(score)
}

/// Is the swell arriving through the coastline's open window?
///
/// Inside the window the score falls from 1.0 at the centre to 0.5 at the
/// edges. Outside it steps down with the distance to the nearer edge, as
/// headlands and breakwaters progressively block the swell.
pub fn swell_direction(cond: &RawConditions, profile: &LocationProfile) -> f64 {
    let d = match cond.primary_direction() {
        Some(d) => d,
        None => return NEUTRAL,
    };

    let window = profile.swell_window;
    let score = if window.contains(d) {
        let half_width = window.half_width();
        if half_width > 0.0 {
            let from_center = crate::bearing::angle_diff(d, window.center());
            (1.0 - (from_center / half_width) * 0.5).max(0.5)
        } else {
            1.0
        }
    } else {
        match window.edge_distance(d) {
            x if x < 20.0 => 0.4,
            x if x < 40.0 => 0.2,
            _ => 0.05,
        }
    };

    unit(score)
}

/// Is the period long enough to carry energy across the shelf?
///
/// ```text
///   p < min          → 0.3 · p/min
///   min ≤ p < low    → 0.3 → 0.7 linear ramp
///   low ≤ p ≤ high   → 1.0
///   p > high         → 1 − 0.02·(p − high), floor 0.8
/// ```
pub fn period(cond: &RawConditions, profile: &LocationProfile) -> f64 {
    let p = match cond.primary_period() {
        Some(p) => p,
        None => return NEUTRAL_PERIOD,
    };

    let min_p = profile.min_period;
    let ideal = profile.ideal_period;

    let score = if p < min_p {
        (p / min_p * 0.3).max(0.0)
    } else if p < ideal.low {
        0.3 + 0.4 * ((p - min_p) / (ideal.low - min_p))
    } else if p <= ideal.high {
        1.0
    } else {
        (1.0 - (p - ideal.high) * 0.02).max(0.8)
    };

    unit(score)
}
