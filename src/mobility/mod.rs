//! Mobility aggregation pipeline: raw location pings in, one
//! quadkey × time-window population table out.
//!
//! Single-pass batch transform: read, quantize onto tiles and windows,
//! keep one row per person per window, count, write. A failure anywhere
//! aborts the run before the output file is written.

mod aggregate;
mod dedup;
mod pings;

pub use aggregate::{count_by_tile_window, population_frame};
pub use dedup::keep_last;
pub use pings::{read_pings, Ping};

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::{io, tile, window};

/// A ping after quantization: who, which window, which tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowedPing {
    pub identifier: String,
    pub window: NaiveDateTime,
    pub quadkey: String,
}

/// Counts reported after a run. The duplicate count is the pipeline's one
/// non-fatal diagnostic.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub input_rows: usize,
    pub duplicates_dropped: usize,
    pub output_rows: usize,
}

/// Maps each ping onto its tile key and time window, order preserving.
pub fn quantize(pings: &[Ping], level: u8) -> Vec<WindowedPing> {
    pings
        .iter()
        .map(|p| WindowedPing {
            identifier: p.identifier.clone(),
            window: window::window_start(p.timestamp),
            quadkey: tile::quadkey(p.lat, p.lon, level),
        })
        .collect()
}

/// Runs the aggregator end to end and writes the population table to
/// `output` as CSV with columns `quadkey`, `fb_datetime`, `population`.
pub fn run(input: &Path, output: &Path, level: u8, verbose: u8) -> Result<RunReport> {
    let pings = pings::read_pings(input)?;
    let input_rows = pings.len();
    if verbose > 0 {
        eprintln!("[mobility] {} pings from {}", input_rows, input.display());
    }

    let rows = quantize(&pings, level);

    // One location per person per window: keep the last row after a stable
    // ascending sort on the window start.
    let (rows, duplicates_dropped) = dedup::keep_last(
        rows,
        |r| (r.identifier.clone(), r.window),
        |r| r.window,
    );
    eprintln!("[mobility] dropped {duplicates_dropped} duplicate rows (same person, same window)");

    let counts = aggregate::count_by_tile_window(&rows);
    let output_rows = counts.len();
    let mut frame = aggregate::population_frame(&counts)?;
    io::csv::write_csv(&mut frame, output)
        .with_context(|| format!("[mobility] Failed to write population table to {}", output.display()))?;
    if verbose > 0 {
        eprintln!("[mobility] {} rows -> {}", output_rows, output.display());
    }

    Ok(RunReport { input_rows, duplicates_dropped, output_rows })
}
