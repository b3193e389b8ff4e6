//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! surf-config.toml file. It carries the scoring defaults used by the window
//! finder and tide model, and the list of location profiles that becomes the
//! process-wide [`ProfileRegistry`].
//!
//! ```toml
//! [scoring]
//! window_min_score = 5.0
//! window_min_slots = 2
//! extrema_resolution_minutes = 6
//!
//! [[locations]]
//! id = "matosinhos"
//! name = "Matosinhos"
//! facing = 270.0
//! swell_window = [240.0, 310.0]
//! # ...
//!
//! [locations.weights]
//! swell_direction = 1.4
//! ```

use crate::bearing::BearingArc;
use crate::profile::{Component, IdealRange, LocationProfile, ProfileError, ProfileRegistry, Weights};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "surf-config.toml";

/// Coarsest tide sampling step accepted from a config file, one day.
pub const MAX_EXTREMA_RESOLUTION_MINUTES: i64 = 24 * 60;

/// Errors from reading, parsing or validating a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config format: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid location profile: {0}")]
    Profile(#[from] ProfileError),

    #[error("extrema_resolution_minutes must be between 1 and 1440, got {0}")]
    InvalidResolution(i64),
}

/// Application configuration loaded from surf-config.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Thresholds for window detection and tide sampling
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// One entry per surf location
    pub locations: Vec<LocationProfile>,
}

/// Scoring defaults shared across locations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum total score (0-10) for a slot to join a surf window
    pub window_min_score: f64,
    /// Minimum number of consecutive qualifying slots per window
    pub window_min_slots: usize,
    /// Sampling step when searching for tide extrema
    pub extrema_resolution_minutes: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            window_min_score: 5.0,
            window_min_slots: 2,
            extrema_resolution_minutes: 6,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let minutes = self.extrema_resolution_minutes;
        if (1..=MAX_EXTREMA_RESOLUTION_MINUTES).contains(&minutes) {
            Ok(())
        } else {
            Err(ConfigError::InvalidResolution(minutes))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scoring: ScoringConfig::default(),
            locations: porto_coast(),
        }
    }
}

impl Config {
    /// Load configuration from surf-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => {
                info!(
                    path = %path.as_ref().display(),
                    "no config file found, using built-in Porto coast locations"
                );
                Self::default()
            }
            Err(e) => {
                warn!("{}; using built-in Porto coast locations", e);
                Self::default()
            }
        }
    }

    /// Strict variant of [`Config::load_from_path`]: any read, parse or
    /// validation problem is returned to the caller.
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        let config = toml::from_str::<Config>(&contents)?;
        config.scoring.validate()?;
        for profile in &config.locations {
            profile.validate()?;
        }
        info!(
            locations = config.locations.len(),
            "loaded configuration from {}",
            path.as_ref().display()
        );
        Ok(config)
    }

    /// Save current configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Build the immutable profile registry used by every scoring call.
    pub fn registry(&self) -> Result<ProfileRegistry, ProfileError> {
        ProfileRegistry::new(self.locations.clone())
    }
}

/// Built-in profiles for the three Porto-coast breaks.
fn porto_coast() -> Vec<LocationProfile> {
    use Component::*;

    vec![
        LocationProfile {
            id: "matosinhos".to_string(),
            name: "Matosinhos".to_string(),
            latitude: 41.185,
            longitude: -8.690,
            facing: 270.0,
            swell_window: BearingArc::new(240.0, 310.0),
            offshore_wind: BearingArc::new(45.0, 135.0),
            ideal_height: IdealRange::new(0.8, 2.0),
            ideal_period: IdealRange::new(10.0, 16.0),
            min_period: 8.0,
            tide_sensitivity: 0.5,
            ideal_tide_pct: IdealRange::new(30.0, 70.0),
            depth_at_break: 2.5,
            description: "Beach break sheltered by the Leixoes breakwater. Blocks N-NW \
                          swell and needs a westerly component. Consistent but rarely big."
                .to_string(),
            weights: Weights::from_pairs([
                (SwellQuality, 1.0),
                (SwellDirection, 1.4), // breakwater blocks N-NW swell
                (Period, 1.2),
                (SpectralPurity, 0.8),
                (Wind, 1.0),
                (WindTrend, 0.9),
                (Tide, 0.7),
                (TideBathy, 0.5),
                (Consistency, 0.8),
            ]),
        },
        LocationProfile {
            id: "leca".to_string(),
            name: "Leça da Palmeira".to_string(),
            latitude: 41.200,
            longitude: -8.705,
            facing: 280.0,
            swell_window: BearingArc::new(260.0, 330.0),
            offshore_wind: BearingArc::new(60.0, 150.0),
            ideal_height: IdealRange::new(1.0, 2.5),
            ideal_period: IdealRange::new(10.0, 18.0),
            min_period: 9.0,
            tide_sensitivity: 0.9,
            ideal_tide_pct: IdealRange::new(20.0, 55.0),
            depth_at_break: 1.8,
            description: "Reef and beach break mix. Hollow waves on the right swell, very \
                          tide-sensitive: low-to-mid tide is crucial."
                .to_string(),
            weights: Weights::from_pairs([
                (SwellQuality, 1.0),
                (SwellDirection, 1.0),
                (Period, 1.3),
                (SpectralPurity, 1.0),
                (Wind, 1.1),
                (WindTrend, 0.8),
                (Tide, 1.5), // reef
                (TideBathy, 1.3),
                (Consistency, 0.9),
            ]),
        },
        LocationProfile {
            id: "espinho".to_string(),
            name: "Espinho".to_string(),
            latitude: 41.007,
            longitude: -8.647,
            facing: 275.0,
            swell_window: BearingArc::new(250.0, 340.0),
            offshore_wind: BearingArc::new(50.0, 140.0),
            ideal_height: IdealRange::new(1.0, 3.0),
            ideal_period: IdealRange::new(10.0, 18.0),
            min_period: 8.0,
            tide_sensitivity: 0.6,
            ideal_tide_pct: IdealRange::new(25.0, 65.0),
            depth_at_break: 2.0,
            description: "Beach break with a breakwall producing fast right-handers. Handles \
                          bigger swell but is more exposed to wind."
                .to_string(),
            weights: Weights::from_pairs([
                (SwellQuality, 1.2),
                (SwellDirection, 0.9),
                (Period, 1.1),
                (SpectralPurity, 0.9),
                (Wind, 1.3), // exposed
                (WindTrend, 1.0),
                (Tide, 0.8),
                (TideBathy, 0.7),
                (Consistency, 1.0),
            ]),
        },
    ]
}
