//! # Surf Scorer Entry Point
//!
//! Scores a JSON file of forecast readings for one location and prints a
//! plain-text report (slots, best windows, tide curve) or JSON.
//!
//! ```text
//! surf-scorer [--config PATH] [--json] [--location ID] INPUT.json
//! ```
//!
//! `INPUT.json` is an array of readings: `{"time": "...", "swell_height": 1.4, ...}`.
//! Tide fields left out are filled from the harmonic predictor. Logging goes
//! to stderr and is controlled with `RUST_LOG` (default `info`). Without
//! `--config` the scorer reads `surf-config.toml` from the working directory
//! and falls back to the built-in Porto coast locations.

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::env;
use std::fs;
use surf_score_lib::config::Config;
use surf_score_lib::scoring::SpotScorer;
use surf_score_lib::tide::TidePredictor;
use surf_score_lib::windows::{find_windows, SurfWindow};
use surf_score_lib::{report, Reading, ScoreResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOCATION: &str = "matosinhos";

const USAGE: &str = "usage: surf-scorer [--config PATH] [--json] [--location ID] INPUT.json";

/// Command line options
#[derive(Debug)]
struct Args {
    config: Option<String>,
    json: bool,
    location: String,
    input: String,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = env::args().skip(1);
    let mut config = None;
    let mut json = false;
    let mut location = DEFAULT_LOCATION.to_string();
    let mut input = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(args.next().context("--config needs a path")?),
            "--location" => location = args.next().context("--location needs an id")?,
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            path => input = Some(path.to_string()),
        }
    }

    Ok(Args {
        config,
        json,
        location,
        input: input.context(USAGE)?,
    })
}

#[derive(Serialize)]
struct JsonReport<'a> {
    location_id: &'a str,
    slots: &'a [ScoreResult],
    windows: &'a [SurfWindow],
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    // Missing or malformed config falls back to the built-in Porto coast
    let config = match &args.config {
        Some(path) => Config::try_load_from_path(path)
            .with_context(|| format!("loading config {path}"))?,
        None => Config::load(),
    };

    // Unknown location is a configuration error, never a neutral score
    let registry = config.registry().context("invalid location profiles")?;
    let profile = registry.get(&args.location)?;

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading readings from {}", args.input))?;
    let readings: Vec<Reading> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", args.input))?;
    info!(location = %profile.id, readings = readings.len(), "scoring forecast");

    let tides = TidePredictor::default()
        .with_resolution(Duration::minutes(config.scoring.extrema_resolution_minutes));
    let results = SpotScorer::new(profile).score_series(&readings, &tides);
    let windows = find_windows(
        &results,
        config.scoring.window_min_score,
        config.scoring.window_min_slots,
    );
    info!(slots = results.len(), windows = windows.len(), "scoring complete");

    if args.json {
        let out = JsonReport {
            location_id: &profile.id,
            slots: &results,
            windows: &windows,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!(
            "{}",
            report::render(&profile.name, &results, &windows, &tides, Utc::now())
        );
    }

    Ok(())
}
