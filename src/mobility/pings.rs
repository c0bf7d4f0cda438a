//! Raw ping-table loading.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use chrono::NaiveDateTime;
use polars::prelude::DataType;

use crate::io::csv::read_csv;

/// One raw location ping, reduced to the fields the pipeline consumes.
#[derive(Debug, Clone)]
pub struct Ping {
    pub identifier: String,
    pub timestamp: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
}

/// Accepted timestamp renderings, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(t);
        }
    }
    bail!("[mobility::pings] Unparseable timestamp: {raw:?}")
}

/// Reads the raw ping table at `path`.
///
/// Required columns: `identifier`, `timestamp`, `device_lat`, `device_lon`.
/// Extra columns (the index column, the redundant `date`) are dropped by
/// selecting only the required fields. Any malformed or null row aborts the
/// run; an offline batch tool has no business guessing.
pub fn read_pings(path: &Path) -> Result<Vec<Ping>> {
    let df = read_csv(path)?;

    let identifiers = df
        .column("identifier")
        .context("[mobility::pings] Missing column: identifier")?
        .cast(&DataType::String)?;
    let timestamps = df
        .column("timestamp")
        .context("[mobility::pings] Missing column: timestamp")?
        .cast(&DataType::String)?;
    let lats = df
        .column("device_lat")
        .context("[mobility::pings] Missing column: device_lat")?
        .cast(&DataType::Float64)?;
    let lons = df
        .column("device_lon")
        .context("[mobility::pings] Missing column: device_lon")?
        .cast(&DataType::Float64)?;

    for column in [&identifiers, &timestamps, &lats, &lons] {
        ensure!(
            column.null_count() == 0,
            "[mobility::pings] Column {} has {} null rows in {}",
            column.name(),
            column.null_count(),
            path.display()
        );
    }

    identifiers
        .str()?
        .into_no_null_iter()
        .zip(timestamps.str()?.into_no_null_iter())
        .zip(lats.f64()?.into_no_null_iter())
        .zip(lons.f64()?.into_no_null_iter())
        .map(|(((identifier, timestamp), lat), lon)| {
            Ok(Ping {
                identifier: identifier.to_string(),
                timestamp: parse_timestamp(timestamp)?,
                lat,
                lon,
            })
        })
        .collect()
}
