//! # Surf Windows
//!
//! Finds contiguous runs of good scored slots: "when should I go?".
//!
//! Slots are grouped per location and sorted by time. A run grows while each
//! slot's total stays at or above the threshold and is emitted once a slot
//! falls below it (or the sequence ends), provided it holds enough slots.
//! Windows from every location are then ranked by peak score.

use crate::scoring::{Rating, ScoreResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Slots are hourly, so a window ends one hour after its last slot.
const SLOT_LENGTH_HOURS: i64 = 1;

/// A contiguous run of good slots for one location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfWindow {
    pub location_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub peak_score: f64,
    /// Mean of the slot totals, one decimal place
    pub avg_score: f64,
    /// Rating of the peak slot
    pub rating: Rating,
    /// Narrative of the peak slot
    pub summary: String,
}

impl SurfWindow {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    fn from_run(run: &[&ScoreResult]) -> Option<Self> {
        let first = run.first()?;
        let last = run.last()?;

        // First slot holding the maximum total
        let peak = run
            .iter()
            .copied()
            .reduce(|best, s| if s.total > best.total { s } else { best })?;

        let avg = run.iter().map(|s| s.total).sum::<f64>() / run.len() as f64;

        Some(Self {
            location_id: first.location_id.clone(),
            start: first.time,
            end: last.time + Duration::hours(SLOT_LENGTH_HOURS),
            peak_score: peak.total,
            avg_score: (avg * 10.0).round() / 10.0,
            rating: peak.rating,
            summary: peak.summary.clone(),
        })
    }
}

/// Extract surf windows from scored slots of one or more locations.
///
/// Returns windows sorted by peak score, highest first; equal peaks keep
/// their discovery order (locations in first-seen order, then time).
///
/// # Example
/// ```
/// use surf_score_lib::windows::find_windows;
///
/// assert!(find_windows(&[], 5.0, 2).is_empty());
/// ```
pub fn find_windows(scores: &[ScoreResult], min_score: f64, min_slots: usize) -> Vec<SurfWindow> {
    let mut by_location: Vec<(&str, Vec<&ScoreResult>)> = Vec::new();
    for score in scores {
        match by_location
            .iter_mut()
            .find(|(id, _)| *id == score.location_id)
        {
            Some((_, slots)) => slots.push(score),
            None => by_location.push((score.location_id.as_str(), vec![score])),
        }
    }

    let mut windows = Vec::new();
    for (_, mut slots) in by_location {
        slots.sort_by_key(|s| s.time);

        for run in slots.split(|s| s.total < min_score) {
            if !run.is_empty() && run.len() >= min_slots {
                windows.extend(SurfWindow::from_run(run));
            }
        }
    }

    windows.sort_by(|a, b| b.peak_score.total_cmp(&a.peak_score));
    windows
}
