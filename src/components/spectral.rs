//! Spectral purity and set consistency.
//!
//! Uses the primary and secondary swell partitions to judge whether the sea
//! is one clean swell or several crossing wave trains. Wave energy goes as
//! the square of height, so all dominance ratios compare squared heights.

use super::{unit, NEUTRAL};
use crate::profile::LocationProfile;
use crate::{present, RawConditions};

/// Primary swell below this height carries no meaningful spectrum.
const MIN_SWELL_M: f64 = 0.1;

/// Secondary swell must exceed this to count as a crossing train.
const CROSSING_SWELL_M: f64 = 0.3;

/// Score when there is no meaningful primary swell.
pub const NO_SWELL_PURITY: f64 = 0.2;

/// Score when period or height is unknown.
pub const NEUTRAL_CONSISTENCY: f64 = 0.3;

/// Swell below this height cannot hold regular sets.
const MIN_SET_HEIGHT_M: f64 = 0.3;

/// Fraction of wave energy in the primary swell, minus a crossing-sea penalty.
///
/// The penalty applies when a secondary swell above 0.3 m arrives more than
/// 45° off the primary, growing with its energy ratio; past 90° it also
/// scales with the angular separation.
pub fn spectral_purity(cond: &RawConditions, _profile: &LocationProfile) -> f64 {
    let primary = match present(cond.swell_height) {
        Some(h) if h >= MIN_SWELL_M => h,
        _ => return NO_SWELL_PURITY,
    };

    let primary_energy = primary.powi(2);
    let mut total_energy = primary_energy;

    let secondary = present(cond.swell2_height);
    if let Some(h2) = secondary.filter(|h| *h > MIN_SWELL_M) {
        total_energy += h2.powi(2);
    }

    // Wind sea on top of the swell partitions
    if let Some(wave) = present(cond.wave_height).filter(|w| *w > primary) {
        total_energy += (wave.powi(2) - total_energy).max(0.0);
    }

    if total_energy <= 0.0 {
        return NEUTRAL;
    }

    let dominance = primary_energy / total_energy;

    let crossing_penalty = match (
        secondary.filter(|h| *h > CROSSING_SWELL_M),
        present(cond.swell_direction),
        present(cond.swell2_direction),
    ) {
        (Some(h2), Some(d1), Some(d2)) => {
            let separation = crate::bearing::angle_diff(d1, d2);
            let energy_ratio = h2.powi(2) / primary_energy;
            if separation > 90.0 {
                (energy_ratio * 0.5 * (separation / 180.0)).min(0.4)
            } else if separation > 45.0 {
                (energy_ratio * 0.2).min(0.2)
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    unit(dominance - crossing_penalty)
}

fn period_regularity(period: f64) -> f64 {
    match period {
        p if p >= 14.0 => 1.0,
        p if p >= 12.0 => 0.9,
        p if p >= 10.0 => 0.7,
        p if p >= 8.0 => 0.5,
        _ => 0.3,
    }
}

/// Expected regularity of sets: 60 % period regularity, 40 % spectral purity.
pub fn consistency(cond: &RawConditions, profile: &LocationProfile) -> f64 {
    let (period, height) = match (present(cond.swell_period), present(cond.swell_height)) {
        (Some(p), Some(h)) => (p, h),
        _ => return NEUTRAL_CONSISTENCY,
    };

    if height < MIN_SET_HEIGHT_M {
        return 0.1;
    }

    let purity = spectral_purity(cond, profile);
    unit(period_regularity(period) * 0.6 + purity * 0.4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::fixtures::matosinhos;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_clean_swell_is_pure() {
        let cond = RawConditions {
            swell_height: Some(1.5),
            swell_direction: Some(280.0),
            ..Default::default()
        };
        assert_eq!(spectral_purity(&cond, &matosinhos()), 1.0);
    }

    #[test]
    fn secondary_swell_dilutes_energy() {
        let cond = RawConditions {
            swell_height: Some(1.0),
            swell2_height: Some(0.2),
            ..Default::default()
        };
        // 1 / (1 + 0.04), no crossing penalty below 0.3 m
        assert!(approx(spectral_purity(&cond, &matosinhos()), 1.0 / 1.04));
    }

    #[test]
    fn wind_sea_adds_residual_energy() {
        let cond = RawConditions {
            swell_height: Some(1.0),
            wave_height: Some(2.0),
            ..Default::default()
        };
        // total energy = wave² = 4
        assert!(approx(spectral_purity(&cond, &matosinhos()), 0.25));
    }

    #[test]
    fn oblique_secondary_swell_is_penalised() {
        let cond = RawConditions {
            swell_height: Some(1.0),
            swell_direction: Some(270.0),
            swell2_height: Some(0.5),
            swell2_direction: Some(330.0),
            ..Default::default()
        };
        let dominance = 1.0 / 1.25;
        let penalty = 0.25 * 0.2;
        assert!(approx(
            spectral_purity(&cond, &matosinhos()),
            dominance - penalty
        ));
    }

    #[test]
    fn crossing_seas_penalty_scales_with_angle() {
        let cond = RawConditions {
            swell_height: Some(1.0),
            swell_direction: Some(270.0),
            swell2_height: Some(0.8),
            swell2_direction: Some(0.0),
            ..Default::default()
        };
        let dominance = 1.0 / 1.64;
        let penalty = 0.64 * 0.5 * (90.0_f64 / 180.0);
        // 90° exactly is not "more than 90°" so the oblique rule applies
        assert!(approx(
            spectral_purity(&cond, &matosinhos()),
            dominance - (0.64_f64 * 0.2).min(0.2)
        ));

        let crossing = RawConditions {
            swell2_direction: Some(150.0),
            ..cond
        };
        let penalty_120 = (0.64 * 0.5 * (120.0 / 180.0_f64)).min(0.4);
        assert!(penalty_120 > penalty);
        assert!(approx(
            spectral_purity(&crossing, &matosinhos()),
            dominance - penalty_120
        ));
    }

    #[test]
    fn no_swell_gives_low_purity() {
        assert_eq!(
            spectral_purity(&RawConditions::default(), &matosinhos()),
            NO_SWELL_PURITY
        );
    }

    #[test]
    fn consistency_blends_period_and_purity() {
        let cond = RawConditions {
            swell_height: Some(1.5),
            swell_period: Some(12.0),
            ..Default::default()
        };
        assert!(approx(consistency(&cond, &matosinhos()), 0.9 * 0.6 + 1.0 * 0.4));
    }

    #[test]
    fn small_swell_is_inconsistent() {
        let cond = RawConditions {
            swell_height: Some(0.2),
            swell_period: Some(16.0),
            ..Default::default()
        };
        assert_eq!(consistency(&cond, &matosinhos()), 0.1);
    }

    #[test]
    fn consistency_neutral_without_period() {
        let cond = RawConditions {
            swell_height: Some(1.5),
            ..Default::default()
        };
        assert_eq!(consistency(&cond, &matosinhos()), NEUTRAL_CONSISTENCY);
    }
}
