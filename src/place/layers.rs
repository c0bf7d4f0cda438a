//! Place-layer types and shapefile ⇄ geo conversions.

use anyhow::{ensure, Result};
use geo::{LineString, MultiLineString};
use polars::frame::DataFrame;
use shapefile::{dbase::Record, Point, Polygon, Polyline};

/// All layers of one named place.
pub struct PlaceLayers {
    /// Population-density grid (tile, value rows), kept as raw strings so
    /// concatenation preserves rows unchanged.
    pub density: DataFrame,
    pub points: Vec<(Point, Record)>,
    pub polygons: Vec<(Polygon, Record)>,
    pub roads: Vec<RoadSegment>,
    /// Source field order per geometry layer. `Record` is an unordered map,
    /// so the order has to be carried separately for faithful output tables.
    pub points_fields: Vec<String>,
    pub polygons_fields: Vec<String>,
    pub roads_fields: Vec<String>,
}

/// One road feature: its line geometry plus the source attributes.
#[derive(Debug, Clone)]
pub struct RoadSegment {
    pub geom: MultiLineString<f64>,
    pub record: Record,
}

/// Converts a shapefile polyline into geo line parts.
///
/// Degenerate parts are a loud error: a road that silently vanished from
/// the spatial join would corrupt the merged network.
pub fn polyline_to_geo(line: &Polyline) -> Result<MultiLineString<f64>> {
    ensure!(!line.parts().is_empty(), "[place::layers] Road segment has no parts");
    let mut parts = Vec::with_capacity(line.parts().len());
    for part in line.parts() {
        ensure!(
            part.len() >= 2,
            "[place::layers] Road part with fewer than two points"
        );
        parts.push(LineString::from(
            part.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>(),
        ));
    }
    Ok(MultiLineString::new(parts))
}

/// Converts merged geo line parts back to a shapefile polyline.
pub fn geo_to_polyline(geom: &MultiLineString<f64>) -> Polyline {
    let parts: Vec<Vec<Point>> = geom
        .0
        .iter()
        .map(|line| line.coords().map(|c| Point::new(c.x, c.y)).collect())
        .collect();
    Polyline::with_parts(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_round_trips_through_geo() {
        let line = Polyline::with_parts(vec![
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            vec![Point::new(2.0, 2.0), Point::new(3.0, 2.0), Point::new(4.0, 2.0)],
        ]);
        let geom = polyline_to_geo(&line).unwrap();
        assert_eq!(geom.0.len(), 2);
        assert_eq!(geom.0[1].0.len(), 3);

        let back = geo_to_polyline(&geom);
        assert_eq!(back.parts().len(), 2);
        assert_eq!(back.parts()[0].len(), 2);
    }

    #[test]
    fn single_part_polyline_converts() {
        let line = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        let geom = polyline_to_geo(&line).unwrap();
        assert_eq!(geom.0.len(), 1);
    }
}
