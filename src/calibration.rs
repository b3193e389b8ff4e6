//! # Calibration
//!
//! Compares past predictions with what riders actually reported and suggests
//! how a location's component weights could change.
//!
//! Riders rate a session on a 1-5 scale. For accuracy statistics the rating
//! is mapped linearly onto the 0-10 score scale (1 → 0, 5 → 10); for weight
//! suggestions it is normalized onto 0-1 and correlated with each component's
//! historical value.
//!
//! Nothing here mutates a profile. [`WeightSuggestion::Adjust`] carries
//! absolute weights that an operator may copy into the configuration.

use crate::profile::{Component, LocationProfile};
use crate::scoring::ScoreResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Minimum samples with a predicted score before accuracy is reported.
pub const MIN_ACCURACY_SAMPLES: usize = 3;

/// Minimum matched feedback samples for a location before weights are judged.
pub const MIN_WEIGHT_SAMPLES: usize = 10;

/// Minimum finite value/outcome pairs per component.
///
/// Slots produced by [`SpotScorer`](crate::scoring::SpotScorer) always carry
/// nine clamped scores, so this only bites for history assembled elsewhere
/// with missing (NaN) components.
pub const MIN_COMPONENT_PAIRS: usize = 5;

/// How far from a session a scored slot may lie and still describe it.
pub const MATCH_TOLERANCE_HOURS: i64 = 1;

/// Correlation above which a component's weight is raised.
const RAISE_ABOVE: f64 = 0.5;
const RAISE_FACTOR: f64 = 1.1;

/// Correlation below which a component's weight is lowered.
const LOWER_BELOW: f64 = -0.2;
const LOWER_FACTOR: f64 = 0.85;

/// A rider's report on one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSample {
    pub location_id: String,
    pub session_time: DateTime<Utc>,
    /// Total score the model gave the session slot, if known
    #[serde(default)]
    pub predicted_score: Option<f64>,
    /// 1 (terrible) to 5 (epic)
    pub actual_rating: u8,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FeedbackSample {
    /// Rider rating on the 0-10 score scale.
    pub fn outcome_score(&self) -> f64 {
        ((f64::from(self.actual_rating) - 1.0) * 2.5).clamp(0.0, 10.0)
    }

    /// Rider rating on a 0-1 scale.
    pub fn outcome_unit(&self) -> f64 {
        ((f64::from(self.actual_rating) - 1.0) / 4.0).clamp(0.0, 1.0)
    }
}

/// Prediction accuracy over a set of feedback samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub samples: usize,
    /// Mean absolute error, score points
    pub mae: f64,
    /// Mean of predicted − actual; positive means over-optimistic
    pub bias: f64,
    /// Pearson correlation between predicted and actual
    pub correlation: f64,
    pub interpretation: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccuracyReport {
    InsufficientData { samples: usize, required: usize },
    Stats(AccuracyStats),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeightSuggestion {
    InsufficientData { samples: usize, required: usize },
    /// Enough data, but no component correlated strongly either way
    NoChange,
    /// Suggested absolute weights for the components that should change
    Adjust { weights: BTreeMap<Component, f64> },
}

/// Pearson correlation; 0 when either series has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let (sd_x, sd_y) = (var_x.sqrt(), var_y.sqrt());
    if sd_x > 0.0 && sd_y > 0.0 {
        cov / (sd_x * sd_y)
    } else {
        0.0
    }
}

fn interpret(mae: f64, bias: f64, correlation: f64) -> String {
    let mut parts = vec![if mae < 1.5 {
        "Predictions are accurate"
    } else if mae < 2.5 {
        "Predictions are reasonable"
    } else {
        "Predictions need calibration"
    }];

    if bias > 1.0 {
        parts.push("model tends to over-predict (too optimistic)");
    } else if bias < -1.0 {
        parts.push("model tends to under-predict (too pessimistic)");
    }

    if correlation > 0.7 {
        parts.push("good at ranking conditions");
    } else if correlation < 0.3 {
        parts.push("poor at ranking conditions, weights may need adjustment");
    }

    format!("{}.", parts.join(". "))
}

/// Mean absolute error, bias and correlation of predicted totals against
/// rider ratings. Samples without a predicted score are ignored.
pub fn accuracy_stats(samples: &[FeedbackSample]) -> AccuracyReport {
    let (predicted, actual): (Vec<f64>, Vec<f64>) = samples
        .iter()
        .filter_map(|s| {
            let p = s.predicted_score.filter(|p| p.is_finite())?;
            Some((p, s.outcome_score()))
        })
        .unzip();

    let n = predicted.len();
    if n < MIN_ACCURACY_SAMPLES {
        debug!(samples = n, "not enough feedback for accuracy statistics");
        return AccuracyReport::InsufficientData {
            samples: n,
            required: MIN_ACCURACY_SAMPLES,
        };
    }

    let errors = predicted.iter().zip(&actual).map(|(p, a)| p - a);
    let mae = errors.clone().map(f64::abs).sum::<f64>() / n as f64;
    let bias = errors.sum::<f64>() / n as f64;
    let correlation = pearson(&predicted, &actual);

    AccuracyReport::Stats(AccuracyStats {
        samples: n,
        mae,
        bias,
        correlation,
        interpretation: interpret(mae, bias, correlation),
    })
}

/// The scored slot for `location` nearest to `session_time`, if one lies
/// within an hour of it. Equally distant slots resolve to the earlier one.
pub fn matched_prediction<'a>(
    location: &str,
    session_time: DateTime<Utc>,
    history: &'a [ScoreResult],
) -> Option<&'a ScoreResult> {
    let tolerance = Duration::hours(MATCH_TOLERANCE_HOURS);
    history
        .iter()
        .filter(|s| s.location_id == location)
        .map(|s| {
            let gap = if s.time >= session_time {
                s.time - session_time
            } else {
                session_time - s.time
            };
            (gap, s)
        })
        .filter(|(gap, _)| *gap <= tolerance)
        .min_by(|(ga, a), (gb, b)| ga.cmp(gb).then(a.time.cmp(&b.time)))
        .map(|(_, s)| s)
}

/// Suggest new weights for `profile` from rider feedback.
///
/// Each feedback sample for the location is matched to the nearest scored
/// slot in `history` (within an hour). With at least
/// [`MIN_WEIGHT_SAMPLES`] matches, every component with at least
/// [`MIN_COMPONENT_PAIRS`] pairs is correlated with the normalized rating:
/// above 0.5 its weight goes up 10 %, below −0.2 it goes down 15 %.
pub fn suggest_weight_adjustments(
    profile: &LocationProfile,
    samples: &[FeedbackSample],
    history: &[ScoreResult],
) -> WeightSuggestion {
    let matched: Vec<(&ScoreResult, f64)> = samples
        .iter()
        .filter(|s| s.location_id == profile.id)
        .filter_map(|s| {
            let found = matched_prediction(&profile.id, s.session_time, history);
            if found.is_none() {
                debug!(
                    location = %profile.id,
                    session = %s.session_time,
                    "no scored slot near feedback session"
                );
            }
            Some((found?, s.outcome_unit()))
        })
        .collect();

    if matched.len() < MIN_WEIGHT_SAMPLES {
        debug!(
            location = %profile.id,
            matched = matched.len(),
            "not enough matched feedback for weight suggestions"
        );
        return WeightSuggestion::InsufficientData {
            samples: matched.len(),
            required: MIN_WEIGHT_SAMPLES,
        };
    }

    let mut adjustments = BTreeMap::new();
    for component in Component::ALL {
        let (values, outcomes): (Vec<f64>, Vec<f64>) = matched
            .iter()
            .map(|(score, outcome)| (score.components.get(component), *outcome))
            .filter(|(value, _)| value.is_finite())
            .unzip();

        if values.len() < MIN_COMPONENT_PAIRS {
            continue;
        }

        let correlation = pearson(&values, &outcomes);
        let current = profile.weight(component);
        debug!(%component, correlation, "component correlation with feedback");

        if correlation > RAISE_ABOVE {
            adjustments.insert(component, current * RAISE_FACTOR);
        } else if correlation < LOWER_BELOW {
            adjustments.insert(component, current * LOWER_FACTOR);
        }
    }

    if adjustments.is_empty() {
        WeightSuggestion::NoChange
    } else {
        WeightSuggestion::Adjust {
            weights: adjustments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 2, hour, minute, 0).unwrap()
    }

    fn feedback(predicted: Option<f64>, rating: u8) -> FeedbackSample {
        FeedbackSample {
            location_id: "matosinhos".to_string(),
            session_time: at(9, 0),
            predicted_score: predicted,
            actual_rating: rating,
            notes: None,
        }
    }

    fn scored(location: &str, time: DateTime<Utc>) -> ScoreResult {
        ScoreResult {
            location_id: location.to_string(),
            time,
            components: Default::default(),
            total: 5.0,
            rating: crate::scoring::Rating::Fair,
            summary: String::new(),
            conditions: Default::default(),
        }
    }

    #[test]
    fn outcome_scales() {
        assert_eq!(feedback(None, 1).outcome_score(), 0.0);
        assert_eq!(feedback(None, 3).outcome_score(), 5.0);
        assert_eq!(feedback(None, 5).outcome_score(), 10.0);
        assert_eq!(feedback(None, 4).outcome_unit(), 0.75);
    }

    #[test]
    fn pearson_edge_cases() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn accuracy_ignores_samples_without_prediction() {
        let samples = vec![
            feedback(Some(6.0), 4),
            feedback(None, 5),
            feedback(Some(3.0), 2),
        ];
        assert_eq!(
            accuracy_stats(&samples),
            AccuracyReport::InsufficientData {
                samples: 2,
                required: 3
            }
        );
    }

    #[test]
    fn accurate_model_interpretation() {
        // actual: 7.5, 2.5, 5.0
        let samples = vec![
            feedback(Some(7.0), 4),
            feedback(Some(3.0), 2),
            feedback(Some(5.5), 3),
        ];
        let AccuracyReport::Stats(stats) = accuracy_stats(&samples) else {
            panic!("expected statistics");
        };
        assert!((stats.mae - 0.5).abs() < 1e-12);
        assert!((stats.bias - (-0.5 + 0.5 + 0.5) / 3.0).abs() < 1e-12);
        assert!(stats.correlation > 0.9);
        assert_eq!(
            stats.interpretation,
            "Predictions are accurate. good at ranking conditions."
        );
    }

    #[test]
    fn optimistic_model_interpretation() {
        let samples = vec![
            feedback(Some(8.0), 1),
            feedback(Some(8.0), 2),
            feedback(Some(8.0), 3),
        ];
        let AccuracyReport::Stats(stats) = accuracy_stats(&samples) else {
            panic!("expected statistics");
        };
        assert_eq!(stats.correlation, 0.0);
        assert_eq!(
            stats.interpretation,
            "Predictions need calibration. model tends to over-predict (too optimistic). \
             poor at ranking conditions, weights may need adjustment."
        );
    }

    #[test]
    fn matching_picks_nearest_within_an_hour() {
        let history = vec![
            scored("matosinhos", at(7, 0)),
            scored("matosinhos", at(8, 0)),
            scored("matosinhos", at(10, 0)),
            scored("leca", at(9, 0)),
        ];
        let found = matched_prediction("matosinhos", at(8, 40), &history).unwrap();
        assert_eq!(found.time, at(8, 0));

        // 09:00 is equidistant from 08:00 and 10:00
        let tie = matched_prediction("matosinhos", at(9, 0), &history).unwrap();
        assert_eq!(tie.time, at(8, 0));

        assert!(matched_prediction("matosinhos", at(12, 0), &history).is_none());
        assert!(matched_prediction("espinho", at(9, 0), &history).is_none());
    }

    #[test]
    fn weight_suggestion_needs_matched_samples() {
        let profile = crate::components::fixtures::matosinhos();
        let samples: Vec<_> = (0..12).map(|_| feedback(Some(5.0), 3)).collect();
        // Nothing scored near the sessions
        let history = vec![scored("matosinhos", at(20, 0))];
        assert_eq!(
            suggest_weight_adjustments(&profile, &samples, &history),
            WeightSuggestion::InsufficientData {
                samples: 0,
                required: MIN_WEIGHT_SAMPLES
            }
        );
    }

    #[test]
    fn uncorrelated_components_give_no_change() {
        let profile = crate::components::fixtures::matosinhos();
        let history = vec![scored("matosinhos", at(9, 0))];
        let samples: Vec<_> = (1..=10u8).map(|i| feedback(None, i % 5 + 1)).collect();
        assert_eq!(
            suggest_weight_adjustments(&profile, &samples, &history),
            WeightSuggestion::NoChange
        );
    }

    #[test]
    fn components_with_too_few_finite_values_are_skipped() {
        let profile = crate::components::fixtures::matosinhos();
        let mut history = Vec::new();
        let mut samples = Vec::new();
        for i in 0..10u32 {
            let mut sample = feedback(None, (i % 5 + 1) as u8);
            sample.session_time = at(i, 0);

            let mut slot = scored("matosinhos", at(i, 0));
            slot.components.wind = sample.outcome_unit();
            // Only four finite period values, each tracking the rating
            slot.components.period = if i < 6 { f64::NAN } else { sample.outcome_unit() };

            history.push(slot);
            samples.push(sample);
        }

        assert_eq!(
            suggest_weight_adjustments(&profile, &samples, &history),
            WeightSuggestion::Adjust {
                weights: BTreeMap::from([(
                    Component::Wind,
                    profile.weight(Component::Wind) * RAISE_FACTOR
                )]),
            }
        );
    }

    #[test]
    fn suggestion_serializes_with_status_tag() {
        let json = serde_json::to_value(WeightSuggestion::Adjust {
            weights: BTreeMap::from([(Component::Wind, 1.1)]),
        })
        .unwrap();
        assert_eq!(json["status"], "adjust");
        assert_eq!(json["weights"]["wind"], 1.1);
    }
}
