//! # Scoring Engine
//!
//! Runs the nine component scorers, folds them into a weighted 0-10 total,
//! buckets the total into a [`Rating`] and attaches a narrative summary.
//!
//! ## Aggregation
//!
//! ```text
//! total = round₁( 10 · Σ wᵢ·sᵢ / Σ wᵢ )
//! ```
//!
//! with weights from the location profile. A profile whose weights sum to
//! zero yields a total of 0.
//!
//! ## Determinism
//!
//! [`SpotScorer::full_score`] depends only on the profile, the conditions
//! (including their trailing wind history) and the timestamp passed in.
//! Re-scoring the same inputs produces a bit-identical [`ScoreResult`].

use crate::components::{self, Scorer};
use crate::narrative;
use crate::profile::{Component, LocationProfile};
use crate::tide::TidePredictor;
use crate::{RawConditions, Reading, WindSample};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// How far back the trailing wind history reaches in [`SpotScorer::score_series`].
pub const WIND_HISTORY_HOURS: i64 = 6;

/// The nine component scores, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub swell_quality: f64,
    pub swell_direction: f64,
    pub period: f64,
    pub spectral_purity: f64,
    pub wind: f64,
    pub wind_trend: f64,
    pub tide: f64,
    #[serde(rename = "tide_bathy_interaction")]
    pub tide_bathy: f64,
    pub consistency: f64,
}

impl ComponentScores {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::SwellQuality => self.swell_quality,
            Component::SwellDirection => self.swell_direction,
            Component::Period => self.period,
            Component::SpectralPurity => self.spectral_purity,
            Component::Wind => self.wind,
            Component::WindTrend => self.wind_trend,
            Component::Tide => self.tide,
            Component::TideBathy => self.tide_bathy,
            Component::Consistency => self.consistency,
        }
    }

    fn slot(&mut self, component: Component) -> &mut f64 {
        match component {
            Component::SwellQuality => &mut self.swell_quality,
            Component::SwellDirection => &mut self.swell_direction,
            Component::Period => &mut self.period,
            Component::SpectralPurity => &mut self.spectral_purity,
            Component::Wind => &mut self.wind,
            Component::WindTrend => &mut self.wind_trend,
            Component::Tide => &mut self.tide,
            Component::TideBathy => &mut self.tide_bathy,
            Component::Consistency => &mut self.consistency,
        }
    }

    /// Scores in canonical component order.
    pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl FromIterator<(Component, f64)> for ComponentScores {
    fn from_iter<I: IntoIterator<Item = (Component, f64)>>(iter: I) -> Self {
        let mut scores = ComponentScores::default();
        for (component, value) in iter {
            *scores.slot(component) = value;
        }
        scores
    }
}

/// Ordered rating vocabulary, worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Flat,
    Poor,
    Fair,
    Good,
    Great,
    Epic,
}

/// Lower bound of each rating bucket; a total on a boundary takes the higher bucket.
const RATING_THRESHOLDS: [(f64, Rating); 5] = [
    (8.5, Rating::Epic),
    (7.0, Rating::Great),
    (5.5, Rating::Good),
    (4.0, Rating::Fair),
    (2.0, Rating::Poor),
];

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Flat => "flat",
            Rating::Poor => "poor",
            Rating::Fair => "fair",
            Rating::Good => "good",
            Rating::Great => "great",
            Rating::Epic => "epic",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Map a 0-10 total onto the rating vocabulary.
///
/// # Example
/// ```
/// use surf_score_lib::scoring::{classify, Rating};
///
/// assert_eq!(classify(3.9), Rating::Poor);
/// assert_eq!(classify(4.0), Rating::Fair);
/// assert_eq!(classify(9.1), Rating::Epic);
/// ```
pub fn classify(total: f64) -> Rating {
    RATING_THRESHOLDS
        .iter()
        .find(|(lower, _)| total >= *lower)
        .map(|&(_, rating)| rating)
        .unwrap_or(Rating::Flat)
}

/// Weighted mean of the component scores on a 0-10 scale, one decimal.
pub fn aggregate(components: &ComponentScores, profile: &LocationProfile) -> f64 {
    let (weighted_sum, weight_total) = components.iter().fold(
        (0.0, 0.0),
        |(sum, total), (component, score)| {
            let w = profile.weight(component);
            (sum + score * w, total + w)
        },
    );

    if weight_total <= 0.0 {
        return 0.0;
    }

    let total = ((weighted_sum / weight_total) * 10.0 * 10.0).round() / 10.0;
    if total.is_nan() {
        0.0
    } else {
        total.clamp(0.0, 10.0)
    }
}

/// Complete scoring output for one time slot. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub location_id: String,
    pub time: DateTime<Utc>,
    pub components: ComponentScores,
    /// 0-10, one decimal place
    pub total: f64,
    pub rating: Rating,
    pub summary: String,
    pub conditions: RawConditions,
}

/// Scorer table in canonical component order.
const SCORERS: [(Component, Scorer); 9] = [
    (Component::SwellQuality, components::swell_quality),
    (Component::SwellDirection, components::swell_direction),
    (Component::Period, components::period),
    (Component::SpectralPurity, components::spectral_purity),
    (Component::Wind, components::wind),
    (Component::WindTrend, components::wind_trend),
    (Component::Tide, components::tide),
    (Component::TideBathy, components::tide_bathy),
    (Component::Consistency, components::consistency),
];

/// Scores surf quality for one location.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use surf_score_lib::config::Config;
/// use surf_score_lib::scoring::SpotScorer;
/// use surf_score_lib::RawConditions;
///
/// let registry = Config::default().registry().unwrap();
/// let scorer = SpotScorer::new(registry.get("matosinhos").unwrap());
///
/// let cond = RawConditions {
///     swell_height: Some(1.4),
///     swell_period: Some(13.0),
///     swell_direction: Some(275.0),
///     wind_speed: Some(4.0),
///     wind_direction: Some(90.0),
///     ..Default::default()
/// };
/// let time = Utc.with_ymd_and_hms(2025, 7, 24, 8, 0, 0).unwrap();
/// let result = scorer.full_score(cond, time);
///
/// assert!((0.0..=10.0).contains(&result.total));
/// assert_eq!(result.location_id, "matosinhos");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SpotScorer<'a> {
    profile: &'a LocationProfile,
}

impl<'a> SpotScorer<'a> {
    pub fn new(profile: &'a LocationProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &'a LocationProfile {
        self.profile
    }

    /// All nine component scores for a snapshot.
    pub fn score(&self, cond: &RawConditions) -> ComponentScores {
        SCORERS
            .iter()
            .map(|&(component, scorer)| (component, scorer(cond, self.profile)))
            .collect()
    }

    /// Weighted 0-10 total for this profile.
    pub fn total(&self, components: &ComponentScores) -> f64 {
        aggregate(components, self.profile)
    }

    /// Components, total, rating and summary for one time slot.
    pub fn full_score(&self, cond: RawConditions, time: DateTime<Utc>) -> ScoreResult {
        let components = self.score(&cond);
        let total = self.total(&components);
        let rating = classify(total);
        let summary = narrative::summarize(&components, &cond, rating);

        ScoreResult {
            location_id: self.profile.id.clone(),
            time,
            components,
            total,
            rating,
            summary,
            conditions: cond,
        }
    }

    /// Score a batch of readings for this location in chronological order.
    ///
    /// Tide fields left empty are filled from `tides`. Readings without a
    /// wind history get one built from the batch itself: every reading in
    /// the six hours up to and including the slot, oldest first.
    pub fn score_series(&self, readings: &[Reading], tides: &TidePredictor) -> Vec<ScoreResult> {
        let mut ordered: Vec<&Reading> = readings.iter().collect();
        ordered.sort_by_key(|r| r.time);

        let results: Vec<ScoreResult> = ordered
            .iter()
            .map(|reading| {
                let mut cond = reading.conditions.clone().with_tide(tides, reading.time);
                if cond.wind_history.is_empty() {
                    cond.wind_history = trailing_wind(&ordered, reading.time);
                }
                self.full_score(cond, reading.time)
            })
            .collect();

        debug!(
            location = %self.profile.id,
            slots = results.len(),
            "scored forecast series"
        );
        results
    }
}

fn trailing_wind(ordered: &[&Reading], until: DateTime<Utc>) -> Vec<WindSample> {
    let since = until - Duration::hours(WIND_HISTORY_HOURS);
    ordered
        .iter()
        .filter(|r| r.time >= since && r.time <= until)
        .map(|r| WindSample {
            speed: r.conditions.wind_speed,
            direction: r.conditions.wind_direction,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::fixtures::matosinhos;
    use crate::profile::Weights;
    use chrono::TimeZone;

    fn time(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 24, hour, 0, 0).unwrap()
    }

    fn good_conditions() -> RawConditions {
        RawConditions {
            swell_height: Some(1.5),
            swell_period: Some(14.0),
            swell_direction: Some(275.0),
            wind_speed: Some(8.0),
            wind_direction: Some(90.0),
            tide_height: Some(2.08),
            tide_pct: Some(50.0),
            ..Default::default()
        }
    }

    #[test]
    fn classify_boundaries_belong_to_higher_bucket() {
        assert_eq!(classify(0.0), Rating::Flat);
        assert_eq!(classify(1.99), Rating::Flat);
        assert_eq!(classify(2.0), Rating::Poor);
        assert_eq!(classify(4.0), Rating::Fair);
        assert_eq!(classify(5.5), Rating::Good);
        assert_eq!(classify(7.0), Rating::Great);
        assert_eq!(classify(8.5), Rating::Epic);
        assert_eq!(classify(10.0), Rating::Epic);
    }

    #[test]
    fn classify_is_monotonic() {
        let mut previous = classify(0.0);
        for step in 0..=100 {
            let rating = classify(step as f64 / 10.0);
            assert!(rating >= previous);
            previous = rating;
        }
    }

    #[test]
    fn aggregate_is_weighted_mean_on_ten_point_scale() {
        let profile = matosinhos();
        let uniform: ComponentScores = Component::ALL.into_iter().map(|c| (c, 0.6)).collect();
        assert_eq!(aggregate(&uniform, &profile), 6.0);

        let mut weighted = profile.clone();
        weighted.weights = Weights::from_pairs(Component::ALL.into_iter().map(|c| (c, 0.0)))
            .with(Component::Wind, 2.0)
            .with(Component::Tide, 1.0);
        let scores = ComponentScores {
            wind: 0.9,
            tide: 0.3,
            ..Default::default()
        };
        // (0.9·2 + 0.3·1) / 3 = 0.7
        assert_eq!(aggregate(&scores, &weighted), 7.0);
    }

    #[test]
    fn zero_weights_give_zero_total() {
        let mut profile = matosinhos();
        profile.weights = Weights::from_pairs(Component::ALL.into_iter().map(|c| (c, 0.0)));
        let scores: ComponentScores = Component::ALL.into_iter().map(|c| (c, 1.0)).collect();
        assert_eq!(aggregate(&scores, &profile), 0.0);
    }

    #[test]
    fn aggregate_rounds_to_one_decimal() {
        let profile = matosinhos();
        let scores: ComponentScores = Component::ALL.into_iter().map(|c| (c, 0.6543)).collect();
        assert_eq!(aggregate(&scores, &profile), 6.5);
    }

    #[test]
    fn good_conditions_score_well() {
        let profile = matosinhos();
        let result = SpotScorer::new(&profile).full_score(good_conditions(), time(8));
        assert!(result.total >= 7.0, "total was {}", result.total);
        assert_eq!(result.rating, classify(result.total));
        assert_eq!(result.components.swell_quality, 1.0);
        assert_eq!(result.components.wind_trend, 0.5);
        assert!(!result.summary.is_empty());
    }

    #[test]
    fn empty_conditions_stay_in_range() {
        let profile = matosinhos();
        let result = SpotScorer::new(&profile).full_score(RawConditions::default(), time(8));
        for (_, score) in result.components.iter() {
            assert!((0.0..=1.0).contains(&score));
        }
        assert!((0.0..=10.0).contains(&result.total));
    }

    #[test]
    fn rescoring_is_bit_identical() {
        let profile = matosinhos();
        let scorer = SpotScorer::new(&profile);
        let a = scorer.full_score(good_conditions(), time(8));
        let b = scorer.full_score(good_conditions(), time(8));
        assert_eq!(a, b);
        assert_eq!(a.total.to_bits(), b.total.to_bits());
    }

    #[test]
    fn score_series_sorts_and_builds_wind_history() {
        let profile = matosinhos();
        let tides = TidePredictor::default();
        let readings: Vec<Reading> = [9, 7, 8, 0]
            .into_iter()
            .map(|h| Reading {
                time: time(h),
                conditions: RawConditions {
                    wind_speed: Some(10.0 + h as f64),
                    wind_direction: Some(90.0),
                    ..good_conditions()
                },
            })
            .collect();

        let results = SpotScorer::new(&profile).score_series(&readings, &tides);
        let times: Vec<_> = results.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![time(0), time(7), time(8), time(9)]);

        // 09:00 sees 07:00, 08:00 and itself; 00:00 is outside six hours
        let last = &results[3].conditions.wind_history;
        assert_eq!(last.len(), 3);
        assert_eq!(last[0].speed, Some(17.0));
        assert_eq!(last[2].speed, Some(19.0));
    }

    #[test]
    fn score_series_fills_missing_tide() {
        let profile = matosinhos();
        let tides = TidePredictor::default();
        let reading = Reading {
            time: time(12),
            conditions: RawConditions {
                swell_height: Some(1.0),
                ..Default::default()
            },
        };
        let result = &SpotScorer::new(&profile).score_series(&[reading], &tides)[0];
        assert_eq!(result.conditions.tide_height, Some(tides.predict_height(time(12))));
        assert_eq!(result.conditions.tide_pct, Some(tides.tide_percentage(time(12))));
    }

    #[test]
    fn score_series_keeps_supplied_tide_field() {
        let profile = matosinhos();
        let tides = TidePredictor::default();
        let reading = Reading {
            time: time(12),
            conditions: RawConditions {
                swell_height: Some(1.0),
                tide_pct: Some(42.0),
                ..Default::default()
            },
        };
        let result = &SpotScorer::new(&profile).score_series(&[reading], &tides)[0];
        assert_eq!(result.conditions.tide_pct, Some(42.0));
        assert_eq!(result.conditions.tide_height, Some(tides.predict_height(time(12))));
    }
}
