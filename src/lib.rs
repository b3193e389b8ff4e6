//! # Surf Scorer Core Library
//!
//! This library turns raw oceanographic and meteorological readings for a named
//! coastal location into a normalized surf-quality score. Everything here is a
//! pure, synchronous computation over explicit inputs: fetching forecasts,
//! persisting rows and scheduling runs belong to the caller.
//!
//! ## Pipeline
//!
//! 1. **Profile**: look up the immutable [`profile::LocationProfile`] in the
//!    [`profile::ProfileRegistry`] built from [`config::Config`]
//! 2. **Tide**: fill tide height and cycle percentage from the harmonic
//!    [`tide::TidePredictor`] ([`RawConditions::with_tide`])
//! 3. **Components**: nine independent scorers map readings to `[0, 1]`
//!    ([`components`])
//! 4. **Aggregate**: weighted mean scaled to 0-10, a [`scoring::Rating`] and a
//!    rule-based narrative ([`scoring`], [`narrative`])
//! 5. **Windows**: contiguous runs of good slots ([`windows`])
//! 6. **Calibration**: compare past predictions with rider feedback and
//!    suggest weight changes ([`calibration`])
//!
//! ## Missing data
//!
//! Every reading is optional. A missing reading never fails a call: each
//! scorer documents the neutral value it falls back to. Non-finite readings
//! are treated as missing. The only fail-fast condition is asking the registry
//! for a location it does not know.
//!
//! ## Core Types
//!
//! - [`RawConditions`]: one physical snapshot for one location and instant
//! - [`WindSample`]: one entry of the trailing wind history
//! - [`Reading`]: a timestamped snapshot, as fed to [`scoring::SpotScorer::score_series`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod bearing;
pub mod calibration;
pub mod components;
pub mod config;
pub mod narrative;
pub mod profile;
pub mod report;
pub mod scoring;
pub mod tide;
pub mod windows;

#[cfg(test)]
mod tests;

pub use scoring::{ComponentScores, Rating, ScoreResult};

use tide::TidePredictor;

/// One hourly wind observation used for trend detection.
///
/// Either field may be missing; the trend scorer skips incomplete samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindSample {
    /// Wind speed, km/h
    pub speed: Option<f64>,
    /// Direction the wind blows from, degrees
    pub direction: Option<f64>,
}

/// One physical snapshot for one location at one instant.
///
/// Heights are metres, periods seconds, directions degrees (the direction
/// swell or wind arrives *from*), speeds km/h. Any field may be absent.
///
/// # Example
/// ```
/// use surf_score_lib::RawConditions;
///
/// let cond = RawConditions {
///     swell_height: Some(1.4),
///     swell_period: Some(12.0),
///     swell_direction: Some(280.0),
///     wind_speed: Some(8.0),
///     wind_direction: Some(90.0),
///     ..Default::default()
/// };
/// assert_eq!(cond.primary_height(), Some(1.4));
/// assert!(cond.tide_pct.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConditions {
    /// Combined significant wave height
    pub wave_height: Option<f64>,
    pub wave_period: Option<f64>,
    pub wave_direction: Option<f64>,
    /// Primary swell partition
    pub swell_height: Option<f64>,
    pub swell_period: Option<f64>,
    pub swell_direction: Option<f64>,
    /// Secondary swell partition
    pub swell2_height: Option<f64>,
    pub swell2_period: Option<f64>,
    pub swell2_direction: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub wind_gusts: Option<f64>,
    /// Height above chart datum, metres
    pub tide_height: Option<f64>,
    /// Position in the tidal cycle, 0 = low, 100 = high
    pub tide_pct: Option<f64>,
    /// Trailing hourly wind samples, oldest first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wind_history: Vec<WindSample>,
}

/// Keep a reading only if it is an actual number.
pub(crate) fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl RawConditions {
    /// Swell height when the primary partition reports one, else the
    /// combined wave height.
    pub fn primary_height(&self) -> Option<f64> {
        present(self.swell_height)
            .filter(|h| *h > 0.0)
            .or_else(|| present(self.wave_height))
    }

    /// Swell period when the primary partition reports one, else the
    /// combined wave period.
    pub fn primary_period(&self) -> Option<f64> {
        present(self.swell_period)
            .filter(|p| *p > 0.0)
            .or_else(|| present(self.wave_period))
    }

    /// Swell direction when known, else the combined wave direction.
    pub fn primary_direction(&self) -> Option<f64> {
        present(self.swell_direction).or_else(|| present(self.wave_direction))
    }

    /// Fill whichever of tide height and tide percentage is missing for
    /// `time` from the predictor. Supplied values are kept.
    pub fn with_tide(mut self, tides: &TidePredictor, time: DateTime<Utc>) -> Self {
        self.tide_height
            .get_or_insert_with(|| tides.predict_height(time));
        self.tide_pct
            .get_or_insert_with(|| tides.tide_percentage(time));
        self
    }
}

/// A [`RawConditions`] snapshot with the forecast time it describes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub conditions: RawConditions,
}
