//! Counting surviving rows per (tile, window).

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDateTime;
use polars::{frame::DataFrame, prelude::NamedFrom, series::Series};

use super::WindowedPing;

/// Rendering of the `fb_datetime` output column.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Counts rows per (quadkey, window start).
///
/// Upstream dedup guarantees at most one row per identifier per window, so
/// the row count per group is the distinct-person count. The BTreeMap keys
/// give the output its deterministic (quadkey, window) ordering.
pub fn count_by_tile_window(rows: &[WindowedPing]) -> BTreeMap<(String, NaiveDateTime), u32> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry((row.quadkey.clone(), row.window)).or_insert(0u32) += 1;
    }
    counts
}

/// Builds the output table: `quadkey`, `fb_datetime`, `population`.
pub fn population_frame(counts: &BTreeMap<(String, NaiveDateTime), u32>) -> Result<DataFrame> {
    let mut quadkeys = Vec::with_capacity(counts.len());
    let mut datetimes = Vec::with_capacity(counts.len());
    let mut populations = Vec::with_capacity(counts.len());
    for ((quadkey, window), population) in counts {
        quadkeys.push(quadkey.clone());
        datetimes.push(window.format(DATETIME_FORMAT).to_string());
        populations.push(*population);
    }

    let df = DataFrame::new(vec![
        Series::new("quadkey".into(), quadkeys).into(),
        Series::new("fb_datetime".into(), datetimes).into(),
        Series::new("population".into(), populations).into(),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(identifier: &str, quadkey: &str, hour: u32) -> WindowedPing {
        WindowedPing {
            identifier: identifier.to_string(),
            window: NaiveDate::from_ymd_opt(2020, 2, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            quadkey: quadkey.to_string(),
        }
    }

    #[test]
    fn population_sums_to_deduplicated_row_count() {
        let rows = vec![
            row("a", "0320", 8),
            row("b", "0320", 8),
            row("c", "0321", 8),
            row("d", "0320", 16),
        ];
        let counts = count_by_tile_window(&rows);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.values().sum::<u32>() as usize, rows.len());
        assert_eq!(counts[&("0320".to_string(), rows[0].window)], 2);
    }

    #[test]
    fn output_is_sorted_by_quadkey_then_window() {
        let rows = vec![row("a", "0321", 8), row("b", "0320", 16), row("c", "0320", 0)];
        let counts = count_by_tile_window(&rows);
        let keys: Vec<_> = counts.keys().cloned().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys[0].0, "0320");
    }

    #[test]
    fn frame_has_output_schema() {
        let counts = count_by_tile_window(&[row("a", "0320", 8)]);
        let df = population_frame(&counts).unwrap();
        assert_eq!(df.get_column_names_str(), ["quadkey", "fb_datetime", "population"]);
        assert_eq!(df.height(), 1);
    }
}
