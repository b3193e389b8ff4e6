//! # Narrative Summary
//!
//! Deterministic, rule-based one-line description of a scored slot, e.g.
//!
//! ```text
//! Fun size (1.2m) @ 13s. light offshore. mid tide. great swell quality.
//! ```
//!
//! The summary is assembled from an ordered table of [`Rule`]s. Each rule
//! looks at the component scores and the raw conditions and contributes at
//! most one phrase. Phrases are joined with `". "` and closed with a period;
//! when no rule fires the summary falls back to the rating label.

use crate::profile::Component;
use crate::scoring::{ComponentScores, Rating};
use crate::{present, RawConditions};

/// What a rule can see when deciding on its phrase.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    pub components: &'a ComponentScores,
    pub conditions: &'a RawConditions,
}

/// One phrase builder. Returns `None` when the rule does not apply.
pub type Rule = fn(&Context<'_>) -> Option<String>;

/// Phrase rules in output order.
pub const RULES: [Rule; 6] = [
    size_phrase,
    wind_phrase,
    nortada_phrase,
    tide_phrase,
    strength_phrase,
    caution_phrase,
];

/// Below this trend score the wind is deteriorating fast enough to warn.
const TREND_WARNING: f64 = 0.3;

/// A component must beat this to be called out as a strength.
const STRENGTH_THRESHOLD: f64 = 0.8;

/// A component below this is called out as a caution.
const CAUTION_THRESHOLD: f64 = 0.3;

const FLAT: &str = "Flat";

/// Height bands, upper bound exclusive, with their descriptor. Flat omits the height.
const SIZE_BANDS: [(f64, &str); 4] = [
    (0.3, FLAT),
    (0.8, "Small"),
    (1.5, "Fun size"),
    (2.5, "Solid"),
];

/// Build the narrative for one slot.
pub fn summarize(components: &ComponentScores, conditions: &RawConditions, rating: Rating) -> String {
    let ctx = Context {
        components,
        conditions,
    };
    let phrases = phrases(&ctx);

    if phrases.is_empty() {
        return format!("{} conditions.", capitalize(rating.as_str()));
    }
    format!("{}.", phrases.join(". "))
}

/// Every phrase the rule table produces for `ctx`, in order.
pub fn phrases(ctx: &Context<'_>) -> Vec<String> {
    RULES.iter().filter_map(|rule| rule(ctx)).collect()
}

fn size_phrase(ctx: &Context<'_>) -> Option<String> {
    let h = ctx.conditions.primary_height()?;

    let label = SIZE_BANDS
        .iter()
        .find(|(upper, _)| h < *upper)
        .map_or("Big", |&(_, label)| label);

    let mut phrase = if label == FLAT {
        FLAT.to_string()
    } else {
        format!("{label} ({h:.1}m)")
    };

    if let Some(p) = ctx.conditions.primary_period() {
        phrase.push_str(&format!(" @ {p:.0}s"));
    }
    Some(phrase)
}

fn wind_phrase(ctx: &Context<'_>) -> Option<String> {
    let speed = present(ctx.conditions.wind_speed)?;
    let wind = ctx.components.wind;

    let phrase = if speed < 5.0 {
        "glassy".to_string()
    } else if speed < 15.0 && wind > 0.7 {
        "light offshore".to_string()
    } else if speed < 15.0 {
        format!("light wind ({speed:.0} km/h)")
    } else if wind > 0.6 {
        format!("offshore {speed:.0} km/h")
    } else if wind < 0.3 {
        format!("onshore {speed:.0} km/h")
    } else {
        format!("cross-shore {speed:.0} km/h")
    };
    Some(phrase)
}

fn nortada_phrase(ctx: &Context<'_>) -> Option<String> {
    (ctx.components.wind_trend < TREND_WARNING).then(|| "Nortada building!".to_string())
}

fn tide_phrase(ctx: &Context<'_>) -> Option<String> {
    let pct = present(ctx.conditions.tide_pct)?;
    let label = if pct < 25.0 {
        "low tide"
    } else if pct > 75.0 {
        "high tide"
    } else {
        "mid tide"
    };
    Some(label.to_string())
}

/// First component holding the maximum score, in canonical order.
fn best(components: &ComponentScores) -> (Component, f64) {
    components
        .iter()
        .fold((Component::ALL[0], f64::NEG_INFINITY), |acc, (c, s)| {
            if s > acc.1 {
                (c, s)
            } else {
                acc
            }
        })
}

/// First component holding the minimum score, in canonical order.
fn worst(components: &ComponentScores) -> (Component, f64) {
    components
        .iter()
        .fold((Component::ALL[0], f64::INFINITY), |acc, (c, s)| {
            if s < acc.1 {
                (c, s)
            } else {
                acc
            }
        })
}

fn strength_phrase(ctx: &Context<'_>) -> Option<String> {
    let (component, score) = best(ctx.components);
    (score > STRENGTH_THRESHOLD && !component.is_meta())
        .then(|| format!("great {}", component.label()))
}

fn caution_phrase(ctx: &Context<'_>) -> Option<String> {
    let (component, score) = worst(ctx.components);
    (score < CAUTION_THRESHOLD).then(|| format!("watch: {}", component.label()))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_scores() -> ComponentScores {
        Component::ALL.into_iter().map(|c| (c, 0.5)).collect()
    }

    fn ctx<'a>(components: &'a ComponentScores, conditions: &'a RawConditions) -> Context<'a> {
        Context {
            components,
            conditions,
        }
    }

    #[test]
    fn no_phrases_falls_back_to_rating() {
        let scores = neutral_scores();
        let summary = summarize(&scores, &RawConditions::default(), Rating::Fair);
        assert_eq!(summary, "Fair conditions.");
    }

    #[test]
    fn full_sentence_in_rule_order() {
        let scores = ComponentScores {
            swell_quality: 0.95,
            wind: 0.9,
            ..neutral_scores()
        };
        let cond = RawConditions {
            swell_height: Some(1.2),
            swell_period: Some(13.0),
            wind_speed: Some(8.0),
            tide_pct: Some(50.0),
            ..Default::default()
        };
        assert_eq!(
            summarize(&scores, &cond, Rating::Great),
            "Fun size (1.2m) @ 13s. light offshore. mid tide. great swell quality."
        );
    }

    #[test]
    fn size_bands() {
        let scores = neutral_scores();
        let phrase = |h: f64| {
            let cond = RawConditions {
                swell_height: Some(h),
                ..Default::default()
            };
            size_phrase(&ctx(&scores, &cond)).unwrap()
        };
        assert_eq!(phrase(0.2), "Flat");
        assert_eq!(phrase(0.5), "Small (0.5m)");
        assert_eq!(phrase(0.8), "Fun size (0.8m)");
        assert_eq!(phrase(2.0), "Solid (2.0m)");
        assert_eq!(phrase(3.2), "Big (3.2m)");
    }

    #[test]
    fn flat_keeps_period() {
        let scores = neutral_scores();
        let cond = RawConditions {
            swell_height: Some(0.2),
            swell_period: Some(6.0),
            ..Default::default()
        };
        assert_eq!(size_phrase(&ctx(&scores, &cond)).unwrap(), "Flat @ 6s");
    }

    #[test]
    fn wind_phrases_follow_speed_and_score() {
        let cond = |speed: f64| RawConditions {
            wind_speed: Some(speed),
            ..Default::default()
        };
        let with_wind = |wind: f64| ComponentScores {
            wind,
            ..neutral_scores()
        };

        let phrase = |speed: f64, wind: f64| {
            let scores = with_wind(wind);
            let c = cond(speed);
            wind_phrase(&ctx(&scores, &c)).unwrap()
        };

        assert_eq!(phrase(3.0, 0.0), "glassy");
        assert_eq!(phrase(10.0, 0.8), "light offshore");
        assert_eq!(phrase(10.0, 0.5), "light wind (10 km/h)");
        assert_eq!(phrase(20.0, 0.7), "offshore 20 km/h");
        assert_eq!(phrase(20.0, 0.1), "onshore 20 km/h");
        assert_eq!(phrase(20.0, 0.5), "cross-shore 20 km/h");
    }

    #[test]
    fn nortada_warning_and_caution() {
        let scores = ComponentScores {
            wind_trend: 0.1,
            ..neutral_scores()
        };
        let summary = summarize(&scores, &RawConditions::default(), Rating::Poor);
        assert_eq!(summary, "Nortada building!. watch: wind trend.");
    }

    #[test]
    fn meta_components_are_never_strengths() {
        let scores = ComponentScores {
            consistency: 0.95,
            ..neutral_scores()
        };
        assert!(strength_phrase(&ctx(&scores, &RawConditions::default())).is_none());
    }

    #[test]
    fn ties_pick_first_component() {
        let scores = ComponentScores {
            period: 0.9,
            tide: 0.9,
            swell_direction: 0.1,
            consistency: 0.1,
            ..neutral_scores()
        };
        let cond = RawConditions::default();
        assert_eq!(
            strength_phrase(&ctx(&scores, &cond)).unwrap(),
            "great period"
        );
        assert_eq!(
            caution_phrase(&ctx(&scores, &cond)).unwrap(),
            "watch: swell direction"
        );
    }

    #[test]
    fn tide_labels() {
        let scores = neutral_scores();
        let label = |pct: f64| {
            let cond = RawConditions {
                tide_pct: Some(pct),
                ..Default::default()
            };
            tide_phrase(&ctx(&scores, &cond)).unwrap()
        };
        assert_eq!(label(10.0), "low tide");
        assert_eq!(label(25.0), "mid tide");
        assert_eq!(label(75.0), "mid tide");
        assert_eq!(label(90.0), "high tide");
    }
}
