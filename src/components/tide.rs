//! Tide position and tide-bathymetry interaction.

use super::{unit, NEUTRAL};
use crate::profile::{IdealRange, LocationProfile};
use crate::tide::MEAN_SEA_LEVEL;
use crate::{present, RawConditions};

/// Percentage points outside the ideal range at which proximity bottoms out.
const FALLOFF_PCT: f64 = 50.0;

fn proximity(tide_pct: f64, ideal: IdealRange, floor: f64) -> f64 {
    if ideal.contains(tide_pct) {
        1.0
    } else {
        (1.0 - ideal.distance(tide_pct) / FALLOFF_PCT).max(floor)
    }
}

/// Depth at the break, bucketed: too shallow is dangerous, too deep is mushy.
fn depth_score(effective_depth: f64) -> f64 {
    match effective_depth {
        d if d < 0.5 => 0.1,
        d if d < 1.0 => 0.6,
        d if d <= 3.0 => 1.0,
        d if d <= 4.0 => 0.7,
        _ => 0.4,
    }
}

/// How close the tide is to this spot's preferred part of the cycle.
///
/// 1.0 inside the ideal percentage range, then a linear decay reaching the
/// 0.1 floor 45 points outside it. Missing tide percentage is neutral.
pub fn tide(cond: &RawConditions, profile: &LocationProfile) -> f64 {
    match present(cond.tide_pct) {
        Some(pct) => unit(proximity(pct, profile.ideal_tide_pct, 0.1)),
        None => NEUTRAL,
    }
}

/// How the tide level interacts with the bottom at the break.
///
/// Blends tide proximity with a depth score for
/// `depth_at_break + (tide_height - MSL)`; the more tide-sensitive the spot,
/// the more the depth score counts:
///
/// ```text
/// proximity · (1 − 0.5·sensitivity) + depth · 0.5·sensitivity
/// ```
pub fn tide_bathy(cond: &RawConditions, profile: &LocationProfile) -> f64 {
    let (height, pct) = match (present(cond.tide_height), present(cond.tide_pct)) {
        (Some(h), Some(p)) => (h, p),
        _ => return NEUTRAL,
    };

    let position = proximity(pct, profile.ideal_tide_pct, 0.0);
    let effective_depth = profile.depth_at_break + (height - MEAN_SEA_LEVEL);
    let sensitivity = profile.tide_sensitivity;

    unit(position * (1.0 - sensitivity * 0.5) + depth_score(effective_depth) * (sensitivity * 0.5))
}
