//! Polygon geometry and its interior point.

use super::{Coordinate, Extent};
use crate::extent::{center, extent_of_coordinates};

/// A polygon: an exterior ring followed by zero or more holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<Vec<Coordinate>>,
}

impl Polygon {
    pub fn new(rings: Vec<Vec<Coordinate>>) -> Self {
        Self { rings }
    }

    /// The exterior ring, if any.
    pub fn exterior(&self) -> Option<&[Coordinate]> {
        self.rings.first().map(Vec::as_slice)
    }

    /// Bounding extent of the exterior ring.
    ///
    /// Holes lie inside the exterior ring, so they never widen the extent.
    pub fn extent(&self) -> Option<Extent> {
        extent_of_coordinates(self.exterior()?)
    }

    /// A point guaranteed to lie inside the polygon (for simple rings).
    ///
    /// Casts a horizontal scan line through the vertical middle of the
    /// polygon's extent, intersects it with every ring and returns the
    /// midpoint of the widest inside segment. Holes split inside segments, so
    /// the point never lands in a hole. Degenerate polygons (zero height or no
    /// crossings) fall back to the extent center.
    pub fn interior_point(&self) -> Option<Coordinate> {
        let extent = self.extent()?;
        let [center_x, y] = center(&extent);

        let mut crossings: Vec<f64> = self
            .rings
            .iter()
            .flat_map(|ring| scanline_crossings(ring, y))
            .collect();
        crossings.sort_by(f64::total_cmp);

        let mut point_x = center_x;
        let mut widest = f64::NEG_INFINITY;
        for pair in crossings.chunks_exact(2) {
            let length = (pair[1] - pair[0]).abs();
            if length > widest {
                point_x = (pair[0] + pair[1]) / 2.0;
                widest = length;
            }
        }

        Some(vec![point_x, y])
    }
}

/// X positions where the ring's edges cross the horizontal line at `y`.
///
/// Uses a half-open rule on edge end points so a vertex lying exactly on the
/// scan line is counted once.
fn scanline_crossings(ring: &[Coordinate], y: f64) -> Vec<f64> {
    let valid: Vec<(f64, f64)> = ring
        .iter()
        .filter_map(|c| match c.as_slice() {
            [x, y, ..] => Some((*x, *y)),
            _ => None,
        })
        .collect();
    if valid.len() < 2 {
        return Vec::new();
    }

    let mut crossings = Vec::new();
    for i in 0..valid.len() {
        let (x1, y1) = valid[i];
        let (x2, y2) = valid[(i + 1) % valid.len()];
        if (y1 <= y && y < y2) || (y2 <= y && y < y1) {
            crossings.push(x1 + (y - y1) / (y2 - y1) * (x2 - x1));
        }
    }
    crossings
}
