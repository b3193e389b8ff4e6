//! # Compass Bearing Helpers
//!
//! Small angular utilities shared by the swell-direction and wind scorers.
//! All bearings are in degrees, measured clockwise from true north, and may be
//! supplied outside `[0, 360)`; every helper normalizes before comparing.

use serde::{Deserialize, Serialize};

/// Normalize a bearing into `[0, 360)`.
pub fn normalize(bearing: f64) -> f64 {
    bearing.rem_euclid(360.0)
}

/// Smallest angular difference between two bearings, in `[0, 180]`.
///
/// # Example
/// ```
/// use surf_score_lib::bearing::angle_diff;
///
/// assert_eq!(angle_diff(350.0, 10.0), 20.0);
/// assert_eq!(angle_diff(90.0, 270.0), 180.0);
/// ```
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).abs().rem_euclid(360.0);
    if d <= 180.0 {
        d
    } else {
        360.0 - d
    }
}

/// A clockwise directional arc from `start` to `end`, both inclusive.
///
/// Arcs may wrap through north: `BearingArc::new(340.0, 30.0)` covers
/// 340°..360° and 0°..30°. Serialized as a `[start, end]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct BearingArc {
    pub start: f64,
    pub end: f64,
}

impl BearingArc {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Wrap-around-aware membership test.
    pub fn contains(&self, bearing: f64) -> bool {
        let bearing = normalize(bearing);
        let start = normalize(self.start);
        let end = normalize(self.end);

        if start <= end {
            start <= bearing && bearing <= end
        } else {
            bearing >= start || bearing <= end
        }
    }

    /// Bearing halfway along the arc.
    pub fn center(&self) -> f64 {
        let start = normalize(self.start);
        let end = normalize(self.end);
        if start > end {
            normalize((start + end + 360.0) / 2.0)
        } else {
            (start + end) / 2.0
        }
    }

    /// Angular distance from the centre to either edge.
    pub fn half_width(&self) -> f64 {
        angle_diff(self.start, self.center())
    }

    /// Distance from `bearing` to whichever edge of the arc is nearer.
    pub fn edge_distance(&self, bearing: f64) -> f64 {
        angle_diff(bearing, self.start).min(angle_diff(bearing, self.end))
    }
}

impl From<(f64, f64)> for BearingArc {
    fn from((start, end): (f64, f64)) -> Self {
        Self { start, end }
    }
}

impl From<BearingArc> for (f64, f64) {
    fn from(arc: BearingArc) -> Self {
        (arc.start, arc.end)
    }
}
