//! # Harmonic Tide Model
//!
//! Tide heights for the Porto coast are synthesized from a fixed table of
//! harmonic constituents for the Leixões reference port. Every surf location
//! in the registry shares this one predictor.
//!
//! ## Model
//!
//! ```text
//! h(t) = MSL + Σ Aᵢ · cos(ωᵢ · hours(t) + φᵢ)
//! ```
//!
//! where `hours(t)` counts hours since a fixed reference epoch, `Aᵢ` is the
//! constituent amplitude in metres, `ωᵢ` its angular speed in degrees/hour and
//! `φᵢ` its phase in degrees. This is plain harmonic summation, good to
//! roughly 10-15 cm for session planning; it is not a full tidal analysis.
//!
//! ## Extrema and tide percentage
//!
//! Highs and lows are found by sampling the curve on a fixed grid (6 minutes
//! by default) and keeping strict local maxima/minima. The percentage through
//! the tidal cycle interpolates linearly between the bracketing extrema:
//! 0 % at low water, 100 % at high water.
//!
//! All functions here are pure: identical inputs always give identical output.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// One harmonic constituent of the tide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HarmonicConstituent {
    /// Darwin symbol, e.g. "M2"
    pub name: &'static str,
    /// Amplitude in metres
    pub amplitude: f64,
    /// Phase lag in degrees
    pub phase: f64,
    /// Angular speed in degrees per hour
    pub speed: f64,
}

/// Principal constituents for Leixões (approximate, from published IH data).
pub const LEIXOES_HARMONICS: [HarmonicConstituent; 7] = [
    // principal lunar semidiurnal
    HarmonicConstituent { name: "M2", amplitude: 1.08, phase: 75.0, speed: 28.9841 },
    // principal solar semidiurnal
    HarmonicConstituent { name: "S2", amplitude: 0.38, phase: 103.0, speed: 30.0000 },
    // larger lunar elliptic
    HarmonicConstituent { name: "N2", amplitude: 0.22, phase: 55.0, speed: 28.4397 },
    // luni-solar diurnal
    HarmonicConstituent { name: "K1", amplitude: 0.07, phase: 60.0, speed: 15.0411 },
    // principal lunar diurnal
    HarmonicConstituent { name: "O1", amplitude: 0.06, phase: 320.0, speed: 13.9430 },
    // luni-solar semidiurnal
    HarmonicConstituent { name: "K2", amplitude: 0.10, phase: 100.0, speed: 30.0821 },
    // shallow water overtide
    HarmonicConstituent { name: "M4", amplitude: 0.03, phase: 200.0, speed: 57.9682 },
];

/// Mean sea level above chart datum at Leixões, metres.
pub const MEAN_SEA_LEVEL: f64 = 2.08;

/// Default sampling step for extremum detection.
pub const DEFAULT_RESOLUTION_MINUTES: i64 = 6;

/// 2000-01-12 00:00 UTC, the epoch the Leixões phases are referred to.
const EPOCH_SECONDS: i64 = 947_635_200;

/// Half-width of the window searched for bracketing extrema.
const SEARCH_HOURS: i64 = 12;

/// Nominal absolute range used when the bracketing extrema cannot be found:
/// roughly neap low (0.5 m) to spring high (3.6 m) at Leixões.
// TODO: derive this per location from the constituent amplitudes once more
// than one reference port is configured.
const FALLBACK_LOW_M: f64 = 0.5;
const FALLBACK_RANGE_M: f64 = 3.1;

/// Extrema closer than this to an hourly sample tag it in [`TidePredictor::tide_table`].
const TABLE_TAG_TOLERANCE_SECS: i64 = 600;

/// High or low water.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
}

impl fmt::Display for TideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TideKind::High => write!(f, "high"),
            TideKind::Low => write!(f, "low"),
        }
    }
}

/// A detected high or low water.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideExtremum {
    pub time: DateTime<Utc>,
    /// Height above chart datum, metres
    pub height: f64,
    pub kind: TideKind,
}

/// One predicted height, optionally tagged as a high/low.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideSample {
    pub time: DateTime<Utc>,
    /// Height above chart datum, metres
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<TideKind>,
}

/// Harmonic tide predictor.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use surf_score_lib::tide::TidePredictor;
///
/// let tides = TidePredictor::default();
/// let t = Utc.with_ymd_and_hms(2025, 7, 24, 12, 0, 0).unwrap();
///
/// let height = tides.predict_height(t);
/// assert!((0.0..=4.5).contains(&height));
///
/// let pct = tides.tide_percentage(t);
/// assert!((0.0..=100.0).contains(&pct));
/// ```
#[derive(Clone, Debug)]
pub struct TidePredictor {
    constituents: &'static [HarmonicConstituent],
    mean_sea_level: f64,
    epoch: DateTime<Utc>,
    resolution: Duration,
}

impl Default for TidePredictor {
    fn default() -> Self {
        Self {
            constituents: &LEIXOES_HARMONICS,
            mean_sea_level: MEAN_SEA_LEVEL,
            epoch: DateTime::UNIX_EPOCH + Duration::seconds(EPOCH_SECONDS),
            resolution: Duration::minutes(DEFAULT_RESOLUTION_MINUTES),
        }
    }
}

impl TidePredictor {
    /// Use a different sampling step for extremum detection.
    ///
    /// Non-positive steps are ignored.
    pub fn with_resolution(mut self, resolution: Duration) -> Self {
        if resolution > Duration::zero() {
            self.resolution = resolution;
        }
        self
    }

    pub fn mean_sea_level(&self) -> f64 {
        self.mean_sea_level
    }

    pub fn constituents(&self) -> &[HarmonicConstituent] {
        self.constituents
    }

    fn hours_since_epoch(&self, t: DateTime<Utc>) -> f64 {
        (t - self.epoch).num_milliseconds() as f64 / 3_600_000.0
    }

    /// Tide height in metres above chart datum at `t`.
    pub fn predict_height(&self, t: DateTime<Utc>) -> f64 {
        let hours = self.hours_since_epoch(t);
        self.constituents
            .iter()
            .fold(self.mean_sea_level, |height, c| {
                height + c.amplitude * (c.speed * hours + c.phase).to_radians().cos()
            })
    }

    /// Heights at `start`, `start + interval`, ... up to and including `end`.
    pub fn predict_series(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Duration,
    ) -> Vec<TideSample> {
        if interval <= Duration::zero() {
            return Vec::new();
        }

        let mut samples = Vec::new();
        let mut t = start;
        while t <= end {
            samples.push(TideSample {
                time: t,
                height: self.predict_height(t),
                kind: None,
            });
            t = match t.checked_add_signed(interval) {
                Some(next) => next,
                None => break,
            };
        }
        samples
    }

    /// Highs and lows in `[start, end]`, sampled every `resolution`.
    ///
    /// A sample is a high if strictly greater than both neighbours and a low
    /// if strictly less than both. The first and last samples have only one
    /// neighbour and are never reported.
    pub fn find_extrema(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: Duration,
    ) -> Vec<TideExtremum> {
        let series = self.predict_series(start, end, resolution);

        series
            .windows(3)
            .filter_map(|w| {
                let (prev, curr, next) = (w[0].height, w[1].height, w[2].height);
                let kind = if curr > prev && curr > next {
                    TideKind::High
                } else if curr < prev && curr < next {
                    TideKind::Low
                } else {
                    return None;
                };
                Some(TideExtremum {
                    time: w[1].time,
                    height: curr,
                    kind,
                })
            })
            .collect()
    }

    /// Position in the tidal cycle at `t`: 0 at low water, 100 at high water.
    ///
    /// Searches ±12 h for the extrema bracketing `t` and interpolates linearly
    /// between them, rising on the flood and falling on the ebb. When the
    /// bracket cannot be formed the absolute height is mapped onto a nominal
    /// range instead.
    pub fn tide_percentage(&self, t: DateTime<Utc>) -> f64 {
        let window = Duration::hours(SEARCH_HOURS);
        let extrema = self.find_extrema(t - window, t + window, self.resolution);

        if extrema.len() < 2 {
            return self.nominal_percentage(t);
        }

        let before = extrema.iter().rev().find(|e| e.time <= t);
        let after = extrema.iter().find(|e| e.time > t);

        let (before, after) = match (before, after) {
            (Some(b), Some(a)) => (b, a),
            _ => return self.nominal_percentage(t),
        };

        let elapsed = (t - before.time).num_milliseconds() as f64;
        let total = (after.time - before.time).num_milliseconds() as f64;
        let fraction = if total > 0.0 { elapsed / total } else { 0.5 };

        let pct = match before.kind {
            TideKind::Low => fraction * 100.0,
            TideKind::High => (1.0 - fraction) * 100.0,
        };
        pct.clamp(0.0, 100.0)
    }

    fn nominal_percentage(&self, t: DateTime<Utc>) -> f64 {
        let height = self.predict_height(t);
        debug!(%t, height, "tide extrema not bracketed, using nominal range");
        ((height - FALLBACK_LOW_M) / FALLBACK_RANGE_M * 100.0).clamp(0.0, 100.0)
    }

    /// Hourly tide table for `[start, end]`, tagging samples that fall within
    /// ten minutes of a high or low.
    pub fn tide_table(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<TideSample> {
        let extrema = self.find_extrema(start, end, self.resolution);
        let mut table = self.predict_series(start, end, Duration::hours(1));

        for sample in &mut table {
            sample.kind = extrema
                .iter()
                .find(|e| (sample.time - e.time).num_seconds().abs() < TABLE_TAG_TOLERANCE_SECS)
                .map(|e| e.kind);
        }

        debug!(
            samples = table.len(),
            extrema = extrema.len(),
            "built hourly tide table"
        );
        table
    }
}
