//! # Component Scorers
//!
//! Nine independent, pure scorers. Each maps a [`RawConditions`] snapshot and
//! a [`LocationProfile`] to a score in `[0, 1]`.
//!
//! | Component | Module | Neutral value when inputs are missing |
//! |---|---|---|
//! | swell quality | [`swell`] | 0.0 (treated as flat) |
//! | swell direction | [`swell`] | 0.5 |
//! | period | [`swell`] | 0.3 |
//! | spectral purity | [`spectral`] | 0.2 (no meaningful swell) |
//! | wind | [`wind`] | 0.5 |
//! | wind trend | [`wind`] | 0.5 |
//! | tide | [`tide`] | 0.5 |
//! | tide-bathymetry interaction | [`tide`] | 0.5 |
//! | consistency | [`spectral`] | 0.3 |
//!
//! Outputs are clamped to `[0, 1]` however extreme the inputs are.

use crate::profile::LocationProfile;
use crate::RawConditions;

pub mod spectral;
pub mod swell;
pub mod tide;
pub mod wind;

pub use spectral::{consistency, spectral_purity};
pub use swell::{period, swell_direction, swell_quality};
pub use tide::{tide, tide_bathy};
pub use wind::{wind, wind_score, wind_trend};

/// Neutral score for a component whose inputs are unavailable.
pub const NEUTRAL: f64 = 0.5;

/// Clamp into `[0, 1]`; NaN collapses to 0.
pub(crate) fn unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Signature shared by every component scorer.
pub type Scorer = fn(&RawConditions, &LocationProfile) -> f64;
