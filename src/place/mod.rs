//! Place-dataset merging: concatenate disjoint layers, dissolve shared
//! roads, write one combined place.

pub mod layers;
pub mod manifest;
pub mod roads;

pub use layers::{PlaceLayers, RoadSegment};
pub use manifest::{PlaceManifest, Role};

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{common, io};

/// Output file name per layer, fixed across places.
const DENSITY_FILE: &str = "population_density.csv";
const POINTS_FILE: &str = "points.shp";
const POLYGONS_FILE: &str = "polygons.shp";
const LINES_FILE: &str = "lines.shp";

/// Counts reported after a merge run.
#[derive(Debug, Clone, Copy)]
pub struct MergeReport {
    pub density_rows: usize,
    pub points: usize,
    pub polygons: usize,
    pub road_segments: usize,
    pub road_pairs_dissolved: usize,
}

/// Reads every layer named by `manifest`.
pub fn read_place(manifest: &PlaceManifest) -> Result<PlaceLayers> {
    let density = io::csv::read_csv_raw(&manifest.density)?;
    let (points, points_fields) = io::shp::read_points(&manifest.points)?;
    let (polygons, polygons_fields) = io::shp::read_polygons(&manifest.polygons)?;
    let (lines, roads_fields) = io::shp::read_polylines(&manifest.lines)?;
    let roads = lines
        .into_iter()
        .map(|(line, record)| {
            Ok(RoadSegment { geom: layers::polyline_to_geo(&line)?, record })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("[place] Bad road geometry in {}", manifest.lines.display()))?;
    Ok(PlaceLayers { density, points, polygons, roads, points_fields, polygons_fields, roads_fields })
}

/// Merges the datasets of two places under `data_root` and writes the
/// combined dataset into `{out_root}/{place_a}-{place_b}/`.
///
/// Density, point and polygon layers concatenate without reconciliation
/// (the places are geographically disjoint); road layers go through the
/// spatial-join dissolve in [`roads::merge_road_layers`].
pub fn merge(
    data_root: &Path,
    place_a: &str,
    place_b: &str,
    out_root: &Path,
    verbose: u8,
) -> Result<MergeReport> {
    let manifest_a = PlaceManifest::resolve(place_a, &data_root.join(place_a))?;
    let manifest_b = PlaceManifest::resolve(place_b, &data_root.join(place_b))?;

    let a = read_place(&manifest_a)?;
    let b = read_place(&manifest_b)?;
    if verbose > 0 {
        eprintln!(
            "[place] {}: {} roads, {}: {} roads",
            place_a,
            a.roads.len(),
            place_b,
            b.roads.len()
        );
    }

    // Concatenated layers keep the first place's field order.
    let PlaceLayers {
        density,
        mut points,
        mut polygons,
        roads,
        points_fields,
        polygons_fields,
        roads_fields,
    } = a;

    let mut density = density
        .vstack(&b.density)
        .context("[place] Density tables have incompatible schemas")?;
    points.extend(b.points);
    polygons.extend(b.polygons);

    let road_merge = roads::merge_road_layers(roads, b.roads)?;
    if verbose > 0 {
        eprintln!("[place] dissolved {} intersecting road pairs", road_merge.intersection_pairs);
    }

    let out_dir = out_root.join(format!("{place_a}-{place_b}"));
    common::ensure_dir_exists(&out_dir)?;

    io::csv::write_csv(&mut density, &out_dir.join(DENSITY_FILE))?;
    io::shp::write_shapefile(&out_dir.join(POINTS_FILE), &points, &points_fields)?;
    io::shp::write_shapefile(&out_dir.join(POLYGONS_FILE), &polygons, &polygons_fields)?;

    let road_features: Vec<_> = road_merge
        .segments
        .iter()
        .map(|seg| (layers::geo_to_polyline(&seg.geom), seg.record.clone()))
        .collect();
    io::shp::write_shapefile(&out_dir.join(LINES_FILE), &road_features, &roads_fields)?;

    write_output_manifest(&out_dir, &manifest_a, &manifest_b)?;

    Ok(MergeReport {
        density_rows: density.height(),
        points: points.len(),
        polygons: polygons.len(),
        road_segments: road_merge.segments.len(),
        road_pairs_dissolved: road_merge.intersection_pairs,
    })
}

#[derive(Serialize)]
struct OutputManifest<'a> {
    sources: [&'a PlaceManifest; 2],
    files: [&'static str; 4],
}

/// Records which inputs produced the combined dataset.
fn write_output_manifest(out_dir: &Path, a: &PlaceManifest, b: &PlaceManifest) -> Result<()> {
    let manifest = OutputManifest {
        sources: [a, b],
        files: [DENSITY_FILE, POINTS_FILE, POLYGONS_FILE, LINES_FILE],
    };
    let bytes = serde_json::to_vec_pretty(&manifest)?;
    std::fs::write(out_dir.join("manifest.json"), bytes)
        .with_context(|| format!("[place] Failed to write manifest.json to {}", out_dir.display()))
}
