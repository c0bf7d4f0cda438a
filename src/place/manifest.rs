//! Explicit per-place file manifests.
//!
//! Inputs are resolved to roles up front, so a missing file fails the run
//! with a named role instead of an index error deep inside the pipeline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

/// The file roles a place dataset must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Density,
    Points,
    Polygons,
    Lines,
}

impl Role {
    pub fn to_str(self) -> &'static str {
        match self {
            Role::Density => "density",
            Role::Points => "points",
            Role::Polygons => "polygons",
            Role::Lines => "lines",
        }
    }

    /// Whether a path (relative to the place directory, lowercased) matches
    /// this role's naming convention. HDX extracts keep the layer kind in
    /// the folder name, e.g. `hotosm_cri_populated_places_points_shp`.
    fn matches(self, name: &str) -> bool {
        match self {
            Role::Density => false, // density is matched by extension
            Role::Points => name.contains("point"),
            Role::Polygons => name.contains("polygon") || name.contains("building"),
            Role::Lines => name.contains("line") || name.contains("road"),
        }
    }
}

/// The resolved files backing one place dataset.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceManifest {
    pub place: String,
    pub density: PathBuf,
    pub points: PathBuf,
    pub polygons: PathBuf,
    pub lines: PathBuf,
}

impl PlaceManifest {
    /// Scans `dir` and assigns each candidate file to its role: the `.csv`
    /// population grid to density, `.shp` files to geometry roles by name.
    /// Entries are visited in sorted order so resolution is deterministic;
    /// the first match per role wins. Every role is required.
    pub fn resolve(place: &str, dir: &Path) -> Result<Self> {
        crate::common::require_dir_exists(dir)?;

        let mut entries: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        entries.sort();

        let mut density = None;
        let mut points = None;
        let mut polygons = None;
        let mut lines = None;

        for path in entries {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            let name = path
                .strip_prefix(dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .to_lowercase();
            match extension {
                "csv" => {
                    density.get_or_insert(path);
                }
                "shp" => {
                    if Role::Points.matches(&name) {
                        points.get_or_insert(path);
                    } else if Role::Polygons.matches(&name) {
                        polygons.get_or_insert(path);
                    } else if Role::Lines.matches(&name) {
                        lines.get_or_insert(path);
                    }
                }
                _ => {}
            }
        }

        let require = |role: Role, found: Option<PathBuf>| {
            found.with_context(|| {
                format!(
                    "[place::manifest] Missing file for role {} under {}",
                    role.to_str(),
                    dir.display()
                )
            })
        };

        Ok(Self {
            place: place.to_string(),
            density: require(Role::Density, density)?,
            points: require(Role::Points, points)?,
            polygons: require(Role::Polygons, polygons)?,
            lines: require(Role::Lines, lines)?,
        })
    }
}
