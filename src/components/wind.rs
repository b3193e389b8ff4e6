//! Wind direction/speed scoring and Nortada onset detection.
//!
//! The Nortada is the summer north/north-north-easterly that builds through
//! the afternoon on the Portuguese coast. Its onset in the trailing wind
//! history is the strongest single warning the trend scorer emits.

use super::{unit, NEUTRAL};
use crate::bearing::{angle_diff, BearingArc};
use crate::profile::LocationProfile;
use crate::{present, RawConditions, WindSample};

/// Wind below this speed (km/h) never hurts, whatever its direction.
const CALM_KMH: f64 = 5.0;

/// Northerly sector that defines the Nortada regime.
const NORTADA_ARC: BearingArc = BearingArc::new(340.0, 30.0);

/// Speed rise (km/h, oldest to newest) that marks Nortada onset.
const NORTADA_RISE_KMH: f64 = 5.0;

/// Trend score returned on Nortada onset.
const NORTADA_SCORE: f64 = 0.1;

/// Minimum complete samples needed to judge a trend.
const MIN_TREND_SAMPLES: usize = 3;

fn direction_factor(direction: f64, profile: &LocationProfile) -> f64 {
    if profile.offshore_wind.contains(direction) {
        return 1.0;
    }

    // Wind from the direction the beach faces blows straight onshore
    match angle_diff(direction, profile.facing) {
        a if a < 30.0 => 0.0,
        a if a < 60.0 => 0.3,
        a if a < 90.0 => 0.5,
        _ => 0.7,
    }
}

fn speed_factor(speed: f64) -> f64 {
    match speed {
        s if s < 10.0 => 1.0,
        s if s < 20.0 => 0.8,
        s if s < 30.0 => 0.5,
        s if s < 40.0 => 0.3,
        _ => 0.1,
    }
}

/// Score a single wind observation.
///
/// Offshore wind grooms the faces: it floors at 0.7 up to 25 km/h, holds 0.6
/// up to 35 km/h and drops to 0.3 beyond. Other directions multiply a
/// direction factor (cross-off 0.7, cross 0.5, mostly onshore 0.3, onshore 0)
/// by a speed factor. Calm wind scores 1.0; missing data scores 0.5.
pub fn wind_score(speed: Option<f64>, direction: Option<f64>, profile: &LocationProfile) -> f64 {
    let (speed, direction) = match (present(speed), present(direction)) {
        (Some(s), Some(d)) => (s, d),
        _ => return NEUTRAL,
    };

    if speed < CALM_KMH {
        return 1.0;
    }

    let combined = direction_factor(direction, profile) * speed_factor(speed);

    if profile.offshore_wind.contains(direction) {
        return if speed < 25.0 {
            combined.max(0.7)
        } else if speed < 35.0 {
            0.6
        } else {
            0.3
        };
    }

    unit(combined)
}

/// Wind component: [`wind_score`] on the snapshot's current wind.
pub fn wind(cond: &RawConditions, profile: &LocationProfile) -> f64 {
    wind_score(cond.wind_speed, cond.wind_direction, profile)
}

/// Trend of the trailing wind history: 0 = rapidly worsening, 0.5 = steady,
/// 1 = rapidly improving.
///
/// Nortada onset (last three directions northerly, speed up by more than
/// 5 km/h across the history) short-circuits to 0.1. Otherwise the mean wind
/// score of the second half of the history is compared with the first half.
pub fn wind_trend(cond: &RawConditions, profile: &LocationProfile) -> f64 {
    trend_of(&cond.wind_history, profile)
}

fn trend_of(history: &[WindSample], profile: &LocationProfile) -> f64 {
    let valid: Vec<(f64, f64)> = history
        .iter()
        .filter_map(|s| Some((present(s.speed)?, present(s.direction)?)))
        .collect();

    if valid.len() < MIN_TREND_SAMPLES {
        return NEUTRAL;
    }

    let nortada = valid[valid.len() - 3..]
        .iter()
        .all(|&(_, d)| NORTADA_ARC.contains(d));
    let oldest = valid[0].0;
    let newest = valid[valid.len() - 1].0;
    if nortada && newest > oldest + NORTADA_RISE_KMH {
        return NORTADA_SCORE;
    }

    let mean_score = |samples: &[(f64, f64)]| {
        if samples.is_empty() {
            return NEUTRAL;
        }
        samples
            .iter()
            .map(|&(s, d)| wind_score(Some(s), Some(d), profile))
            .sum::<f64>()
            / samples.len() as f64
    };

    let (first, second) = valid.split_at(valid.len() / 2);
    unit(0.5 + mean_score(second) - mean_score(first))
}
