// End-to-end runs of the mobility aggregator against small ping files.

use std::fs;
use std::path::Path;

use tilepop::{mobility, tile};

fn write_pings(path: &Path, rows: &[(&str, &str, f64, f64)]) {
    let mut csv = String::from("identifier,timestamp,date,device_lat,device_lon,accuracy\n");
    for (id, ts, lat, lon) in rows {
        let date = &ts[..10];
        csv.push_str(&format!("{id},{ts},{date},{lat},{lon},12\n"));
    }
    fs::write(path, csv).unwrap();
}

fn output_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn five_people_one_window_one_tile() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pings.csv");
    let output = dir.path().join("population.csv");

    let coords = (4.964664, -73.916862);
    write_pings(
        &input,
        &[
            ("a", "2020-02-01 08:05:00", coords.0, coords.1),
            ("b", "2020-02-01 09:30:00", coords.0, coords.1),
            ("c", "2020-02-01 11:00:00", coords.0, coords.1),
            ("d", "2020-02-01 14:45:12", coords.0, coords.1),
            ("e", "2020-02-01 15:59:59", coords.0, coords.1),
        ],
    );

    let report = mobility::run(&input, &output, tile::DEFAULT_LEVEL, 0).unwrap();
    assert_eq!(report.input_rows, 5);
    assert_eq!(report.duplicates_dropped, 0);
    assert_eq!(report.output_rows, 1);

    let lines = output_lines(&output);
    assert_eq!(lines[0], "quadkey,fb_datetime,population");
    // Level-14 key for the test coordinates, pinned rather than recomputed.
    assert_eq!(lines[1], "03223211033213,2020-02-01 08:00:00,5");
    assert_eq!(lines.len(), 2);
}

#[test]
fn person_seen_twice_in_a_window_counts_once_at_the_last_location() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pings.csv");
    let output = dir.path().join("population.csv");

    // "a" pings from two different tiles inside the 08:00 window; only the
    // later arrival survives, at its own tile.
    write_pings(
        &input,
        &[
            ("a", "2020-02-01 09:00:00", 4.964664, -73.916862),
            ("b", "2020-02-01 10:00:00", 4.964664, -73.916862),
            ("a", "2020-02-01 15:00:00", 41.850, -87.650),
        ],
    );

    let report = mobility::run(&input, &output, tile::DEFAULT_LEVEL, 0).unwrap();
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(report.output_rows, 2);

    let lines = output_lines(&output);
    let body = lines[1..].join("\n");
    assert!(body.contains("03223211033213,2020-02-01 08:00:00,1"), "{body}");
    assert!(body.contains("03022223103032,2020-02-01 08:00:00,1"), "{body}");

    // Sum of population equals the deduplicated row count.
    let total: u32 = lines[1..]
        .iter()
        .map(|l| l.rsplit(',').next().unwrap().parse::<u32>().unwrap())
        .sum();
    assert_eq!(total, 2);
}

#[test]
fn window_boundaries_split_the_day_into_three_buckets() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pings.csv");
    let output = dir.path().join("population.csv");

    write_pings(
        &input,
        &[
            ("a", "2020-02-01 00:00:00", 41.850, -87.650),
            ("b", "2020-02-01 07:59:59", 41.850, -87.650),
            ("c", "2020-02-01 08:00:00", 41.850, -87.650),
            ("d", "2020-02-01 16:00:00", 41.850, -87.650),
            ("e", "2020-02-01 23:59:59", 41.850, -87.650),
        ],
    );

    let report = mobility::run(&input, &output, tile::DEFAULT_LEVEL, 0).unwrap();
    assert_eq!(report.output_rows, 3);

    let lines = output_lines(&output);
    let body = lines[1..].join("\n");
    assert!(body.contains("2020-02-01 00:00:00,2"), "{body}");
    assert!(body.contains("2020-02-01 08:00:00,1"), "{body}");
    assert!(body.contains("2020-02-01 16:00:00,2"), "{body}");
}

#[test]
fn missing_required_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pings.csv");
    fs::write(&input, "identifier,timestamp\na,2020-02-01 08:00:00\n").unwrap();

    let err = mobility::run(&input, &dir.path().join("out.csv"), 14, 0).unwrap_err();
    assert!(err.to_string().contains("device_lat"), "{err}");
}
