//! Fixed 8-hour reporting windows.
//!
//! Timestamps are quantized to one of three daily buckets starting at
//! 00:00, 08:00 and 16:00, in naive local time. The exact time within a
//! window is discarded by design.

use chrono::{NaiveDateTime, Timelike};

/// Start hours of the three daily windows.
pub const WINDOW_HOURS: [u32; 3] = [0, 8, 16];

/// Window start for `t`: the hour of day decides the bucket, the date is
/// kept. Pure and idempotent on its own output.
pub fn window_start(t: NaiveDateTime) -> NaiveDateTime {
    let hour = match t.hour() {
        0..=7 => 0,
        8..=15 => 8,
        _ => 16,
    };
    t.date()
        .and_hms_opt(hour, 0, 0)
        .expect("window start hour is a valid time of day")
}
