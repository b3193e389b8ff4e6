//! # Plain-Text Report
//!
//! Renders scored slots, surf windows and a tide curve for a terminal. Every
//! function returns a `String`; the binary decides where it goes.
//!
//! The tide curve spans ±12 h around "now" with one column per half hour.
//! "Now" sits in the centre column and is drawn as `X`:
//!
//! ```text
//! 3.5m│
//!     │            •••••
//!     │         •••     ••
//! 3.0m│        •          ••
//!     ...
//!      |     |     |     |     |     |     |     |     |
//!      -12h                   Now                   +12h
//! ```

use crate::scoring::ScoreResult;
use crate::tide::TidePredictor;
use crate::windows::SurfWindow;
use chrono::{DateTime, Duration, Utc};
use std::fmt::Write;

/// Height of the tide chart in text rows.
const CHART_ROWS: usize = 12;
/// Space for Y-axis labels plus the axis line.
const Y_AXIS_WIDTH: usize = 5;
/// Minutes between chart columns.
const COLUMN_MINUTES: i64 = 30;
/// Hours shown either side of "now".
const CHART_SPAN_HOURS: i64 = 12;
/// Columns between time ticks (every 3 h).
const TICK_EVERY: usize = 6;

/// One row per scored slot: time, total, rating, summary.
pub fn slot_table(results: &[ScoreResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<17} {:>5}  {:<6}  Summary", "Time (UTC)", "Score", "Rating");
    for r in results {
        let _ = writeln!(
            out,
            "{:<17} {:>5.1}  {:<6}  {}",
            r.time.format("%Y-%m-%d %H:%M").to_string(),
            r.total,
            r.rating,
            r.summary
        );
    }
    out
}

/// Ranked surf windows, or a note that none qualified.
pub fn window_list(windows: &[SurfWindow]) -> String {
    if windows.is_empty() {
        return "No surf windows.\n".to_string();
    }

    let mut out = String::new();
    for (rank, w) in windows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} {} - {}  peak {:.1} avg {:.1} ({})  {}",
            rank + 1,
            w.location_id,
            w.start.format("%a %d %H:%M"),
            w.end.format("%H:%M"),
            w.peak_score,
            w.avg_score,
            w.rating,
            w.summary
        );
    }
    out
}

/// ASCII tide curve for the 24 hours centred on `now`.
pub fn tide_curve(tides: &TidePredictor, now: DateTime<Utc>) -> String {
    let span = Duration::hours(CHART_SPAN_HOURS);
    let samples = tides.predict_series(now - span, now + span, Duration::minutes(COLUMN_MINUTES));
    let sample_count = samples.len();
    if sample_count == 0 {
        return String::new();
    }

    let (min_h, max_h) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), s| {
            (min.min(s.height), max.max(s.height))
        });
    let range = (max_h - min_h).max(f64::EPSILON);

    let height_to_row = |h: f64| {
        let normalized = (h - min_h) / range;
        ((1.0 - normalized) * (CHART_ROWS as f64 - 1.0)).round() as usize
    };

    let mut grid = vec![vec![' '; sample_count + Y_AXIS_WIDTH]; CHART_ROWS];
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }

    // Y-axis labels on whole or half metres
    let step = if range > 2.0 { 1.0 } else { 0.5 };
    let mut label_h = (min_h / step).ceil() * step;
    while label_h <= max_h {
        let row = height_to_row(label_h);
        if row < CHART_ROWS {
            let label = format!("{:<width$}", format!("{label_h:.1}m"), width = Y_AXIS_WIDTH - 1);
            for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
                grid[row][i] = ch;
            }
        }
        label_h += step;
    }

    let center = sample_count / 2;
    for (column, sample) in samples.iter().enumerate() {
        let row = height_to_row(sample.height).min(CHART_ROWS - 1);
        grid[row][column + Y_AXIS_WIDTH] = if column == center { 'X' } else { '•' };
    }

    let mut out = String::new();
    for row in grid {
        let _ = writeln!(out, "{}", row.into_iter().collect::<String>().trim_end());
    }

    let padding = " ".repeat(Y_AXIS_WIDTH);
    let ticks: String = (0..sample_count)
        .map(|i| if i % TICK_EVERY == 0 { '|' } else { ' ' })
        .collect();
    let _ = writeln!(out, "{padding}{}", ticks.trim_end());

    let now_text = "Now";
    let left_width = center.saturating_sub(now_text.len() / 2);
    let right_width = sample_count
        .saturating_sub(left_width + now_text.len());
    let _ = writeln!(
        out,
        "{padding}{:<left_width$}{now_text}{:>right_width$}",
        format!("-{CHART_SPAN_HOURS}h"),
        format!("+{CHART_SPAN_HOURS}h"),
    );
    out
}

/// Full report: slots, windows, then the tide curve around `now`.
pub fn render(
    location_name: &str,
    results: &[ScoreResult],
    windows: &[SurfWindow],
    tides: &TidePredictor,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {location_name} ==\n");
    out.push_str(&slot_table(results));
    let _ = writeln!(out, "\nBest windows:");
    out.push_str(&window_list(windows));
    let _ = writeln!(out, "\nTide around {}:", now.format("%Y-%m-%d %H:%M UTC"));
    out.push_str(&tide_curve(tides, now));
    out
}
