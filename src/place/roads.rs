//! Road-network merging between two adjacent place extracts.

use anyhow::{anyhow, Result};
use geo::{BoundingRect, Intersects, MultiLineString};
use rstar::{
    primitives::{GeomWithData, Rectangle},
    RTree, AABB,
};

use super::layers::RoadSegment;

/// Outcome of merging two road layers.
pub struct RoadMerge {
    pub segments: Vec<RoadSegment>,
    pub intersection_pairs: usize,
}

/// Merges road layers A and B into one layer with the shared boundary
/// dissolved.
///
/// Every intersecting (a, b) pair forms one dissolve group. A segment that
/// touches several counterparts is dissolved once per counterpart, not once
/// overall: grouping is per pair, not per connected component, which is the
/// documented behavior of this merge. Pairs that touch at a single point
/// dissolve too, yielding a multi-part geometry.
///
/// Output order is deterministic: A's untouched segments, then B's, then
/// the dissolved pairs in (A index, B index) order.
pub fn merge_road_layers(a: Vec<RoadSegment>, b: Vec<RoadSegment>) -> Result<RoadMerge> {
    let tree = RTree::bulk_load(
        b.iter()
            .enumerate()
            .map(|(idx, seg)| Ok(GeomWithData::new(envelope_of(&seg.geom)?, idx)))
            .collect::<Result<Vec<_>>>()?,
    );

    // Candidate pairs by bounding box, confirmed by exact intersection.
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for (i, seg) in a.iter().enumerate() {
        let rect = envelope_of(&seg.geom)?;
        let search = AABB::from_corners(rect.lower(), rect.upper());
        let mut hits: Vec<usize> = tree
            .locate_in_envelope_intersecting(&search)
            .filter(|candidate| seg.geom.intersects(&b[candidate.data].geom))
            .map(|candidate| candidate.data)
            .collect();
        hits.sort_unstable();
        pairs.extend(hits.into_iter().map(|j| (i, j)));
    }

    let hit_a: ahash::AHashSet<usize> = pairs.iter().map(|&(i, _)| i).collect();
    let hit_b: ahash::AHashSet<usize> = pairs.iter().map(|&(_, j)| j).collect();

    let mut segments = Vec::with_capacity(a.len() + b.len());
    for (i, seg) in a.iter().enumerate() {
        if !hit_a.contains(&i) {
            segments.push(seg.clone());
        }
    }
    for (j, seg) in b.iter().enumerate() {
        if !hit_b.contains(&j) {
            segments.push(seg.clone());
        }
    }
    for &(i, j) in &pairs {
        segments.push(dissolve_pair(&a[i], &b[j]));
    }

    Ok(RoadMerge { segments, intersection_pairs: pairs.len() })
}

/// Dissolves one A/B pair: the union of both segments' line parts as a
/// single multi-part geometry, keeping A's attributes.
fn dissolve_pair(a: &RoadSegment, b: &RoadSegment) -> RoadSegment {
    let mut parts = a.geom.0.clone();
    parts.extend(b.geom.0.iter().cloned());
    RoadSegment { geom: MultiLineString::new(parts), record: a.record.clone() }
}

fn envelope_of(geom: &MultiLineString<f64>) -> Result<Rectangle<[f64; 2]>> {
    let rect = geom
        .bounding_rect()
        .ok_or_else(|| anyhow!("[place::roads] Road segment with empty geometry"))?;
    Ok(Rectangle::from_corners(
        [rect.min().x, rect.min().y],
        [rect.max().x, rect.max().y],
    ))
}
