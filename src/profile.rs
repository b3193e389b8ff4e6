//! # Location Profiles
//!
//! Immutable per-location configuration: break geometry, the physical ranges a
//! spot works best in, and how much each scoring component matters there.
//!
//! Profiles are collected once into a [`ProfileRegistry`] at start-up and
//! handed by reference into every scoring call. Nothing in the crate mutates a
//! profile after the registry has been built; calibration only *suggests* new
//! weights (see [`crate::calibration`]).
//!
//! ## Weights
//!
//! Each of the nine [`Component`]s has a non-negative weight. Components left
//! out of a configuration file get [`DEFAULT_WEIGHT`]. Validation happens when
//! the registry is constructed, so lookups never fail.

use crate::bearing::BearingArc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Weight applied to a component that a profile does not configure.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Errors raised while building or querying the profile registry.
///
/// These are configuration errors: they are never absorbed into a neutral
/// score the way missing sensor readings are.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// No profile is registered under this identifier
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// Two profiles share one identifier
    #[error("duplicate location id: {0}")]
    DuplicateLocation(String),

    /// A `(low, high)` range has `low > high` or a non-finite bound
    #[error("{location}: invalid {field} range ({low}, {high})")]
    InvalidRange {
        location: String,
        field: &'static str,
        low: f64,
        high: f64,
    },

    /// A component weight is negative or not finite
    #[error("{location}: weight for {component} must be a finite value >= 0, got {weight}")]
    InvalidWeight {
        location: String,
        component: Component,
        weight: f64,
    },

    /// Tide sensitivity outside `[0, 1]`
    #[error("{location}: tide sensitivity must lie in [0, 1], got {value}")]
    InvalidSensitivity { location: String, value: f64 },

    /// Minimum period is not positive or exceeds the ideal period range
    #[error("{location}: minimum period {min_period} must be > 0 and <= ideal low {ideal_low}")]
    InvalidMinPeriod {
        location: String,
        min_period: f64,
        ideal_low: f64,
    },

    /// Unrecognized component name in a weight table
    #[error("unknown scoring component: {0}")]
    UnknownComponent(String),
}

/// The nine scoring components, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    SwellQuality,
    SwellDirection,
    Period,
    SpectralPurity,
    Wind,
    WindTrend,
    Tide,
    #[serde(rename = "tide_bathy_interaction")]
    TideBathy,
    Consistency,
}

impl Component {
    /// All components in canonical order.
    pub const ALL: [Component; 9] = [
        Component::SwellQuality,
        Component::SwellDirection,
        Component::Period,
        Component::SpectralPurity,
        Component::Wind,
        Component::WindTrend,
        Component::Tide,
        Component::TideBathy,
        Component::Consistency,
    ];

    /// Machine name, as used in configuration files and JSON output.
    pub fn name(self) -> &'static str {
        match self {
            Component::SwellQuality => "swell_quality",
            Component::SwellDirection => "swell_direction",
            Component::Period => "period",
            Component::SpectralPurity => "spectral_purity",
            Component::Wind => "wind",
            Component::WindTrend => "wind_trend",
            Component::Tide => "tide",
            Component::TideBathy => "tide_bathy_interaction",
            Component::Consistency => "consistency",
        }
    }

    /// Human-readable label ("swell quality").
    pub fn label(self) -> String {
        self.name().replace('_', " ")
    }

    /// Meta-signals describe other components rather than the surf itself,
    /// so the narrative never calls them out as a selling point.
    pub fn is_meta(self) -> bool {
        matches!(self, Component::WindTrend | Component::Consistency)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ProfileError::UnknownComponent(s.to_string()))
    }
}

/// Per-component weights with an explicit default for unconfigured entries.
///
/// Serialized as a table keyed by component name; absent keys take
/// [`DEFAULT_WEIGHT`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct Weights {
    values: [f64; 9],
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            values: [DEFAULT_WEIGHT; 9],
        }
    }
}

impl Weights {
    /// Build from explicit `(component, weight)` pairs; the rest default.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Component, f64)>,
    {
        let mut weights = Self::default();
        for (component, weight) in pairs {
            weights.values[component.index()] = weight;
        }
        weights
    }

    pub fn get(&self, component: Component) -> f64 {
        self.values[component.index()]
    }

    /// Return a copy with one weight replaced.
    pub fn with(mut self, component: Component, weight: f64) -> Self {
        self.values[component.index()] = weight;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl TryFrom<BTreeMap<String, f64>> for Weights {
    type Error = ProfileError;

    fn try_from(table: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut weights = Self::default();
        for (name, weight) in table {
            let component: Component = name.parse()?;
            weights.values[component.index()] = weight;
        }
        Ok(weights)
    }
}

impl From<Weights> for BTreeMap<String, f64> {
    fn from(weights: Weights) -> Self {
        weights
            .iter()
            .map(|(c, w)| (c.name().to_string(), w))
            .collect()
    }
}

/// Inclusive `(low, high)` interval. Serialized as a `[low, high]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct IdealRange {
    pub low: f64,
    pub high: f64,
}

impl IdealRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Distance from `value` to the nearest bound, zero inside the range.
    pub fn distance(&self, value: f64) -> f64 {
        if value < self.low {
            self.low - value
        } else if value > self.high {
            value - self.high
        } else {
            0.0
        }
    }

    fn check(&self, location: &str, field: &'static str) -> Result<(), ProfileError> {
        if self.low.is_finite() && self.high.is_finite() && self.low <= self.high {
            Ok(())
        } else {
            Err(ProfileError::InvalidRange {
                location: location.to_string(),
                field,
                low: self.low,
                high: self.high,
            })
        }
    }
}

impl From<(f64, f64)> for IdealRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

impl From<IdealRange> for (f64, f64) {
    fn from(range: IdealRange) -> Self {
        (range.low, range.high)
    }
}

/// Static configuration for one surf location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationProfile {
    /// Registry key, e.g. `"matosinhos"`
    pub id: String,
    /// Display name
    pub name: String,
    /// WGS84 latitude
    pub latitude: f64,
    /// WGS84 longitude
    pub longitude: f64,
    /// Bearing the beach faces (waves arrive from here)
    pub facing: f64,
    /// Swell directions the coastline lets through
    pub swell_window: BearingArc,
    /// Wind directions that blow from land to sea
    pub offshore_wind: BearingArc,
    /// Wave height sweet spot, metres
    pub ideal_height: IdealRange,
    /// Swell period sweet spot, seconds
    pub ideal_period: IdealRange,
    /// Period below which the shelf dissipates most energy, seconds
    pub min_period: f64,
    /// 0 = tide barely matters, 1 = reef-style tide dependence
    pub tide_sensitivity: f64,
    /// Preferred position in the tidal cycle, percent
    pub ideal_tide_pct: IdealRange,
    /// Water depth at the main peak at chart datum, metres
    pub depth_at_break: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weights: Weights,
}

impl LocationProfile {
    pub fn weight(&self, component: Component) -> f64 {
        self.weights.get(component)
    }

    /// Check the profile invariants: ranges ordered, weights non-negative,
    /// sensitivity in `[0, 1]`, minimum period below the ideal range.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let id = self.id.as_str();
        self.ideal_height.check(id, "ideal height")?;
        self.ideal_period.check(id, "ideal period")?;
        self.ideal_tide_pct.check(id, "ideal tide percentage")?;

        if !(0.0..=1.0).contains(&self.tide_sensitivity) {
            return Err(ProfileError::InvalidSensitivity {
                location: self.id.clone(),
                value: self.tide_sensitivity,
            });
        }

        if !(self.min_period > 0.0 && self.min_period <= self.ideal_period.low) {
            return Err(ProfileError::InvalidMinPeriod {
                location: self.id.clone(),
                min_period: self.min_period,
                ideal_low: self.ideal_period.low,
            });
        }

        for (component, weight) in self.weights.iter() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ProfileError::InvalidWeight {
                    location: self.id.clone(),
                    component,
                    weight,
                });
            }
        }

        Ok(())
    }
}

/// Immutable set of validated profiles, looked up by identifier.
#[derive(Clone, Debug)]
pub struct ProfileRegistry {
    profiles: Vec<LocationProfile>,
}

impl ProfileRegistry {
    /// Validate every profile and reject duplicate identifiers.
    pub fn new(profiles: Vec<LocationProfile>) -> Result<Self, ProfileError> {
        for (i, profile) in profiles.iter().enumerate() {
            profile.validate()?;
            if profiles[..i].iter().any(|p| p.id == profile.id) {
                return Err(ProfileError::DuplicateLocation(profile.id.clone()));
            }
        }
        Ok(Self { profiles })
    }

    /// Fetch a profile, failing fast on unknown identifiers.
    pub fn get(&self, id: &str) -> Result<&LocationProfile, ProfileError> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ProfileError::UnknownLocation(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
