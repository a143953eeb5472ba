//! Extent arithmetic and CRS-aware extent transformation.
//!
//! Extents are `[min_x, min_y, max_x, max_y]` in a CRS's native units. Every
//! extent produced here satisfies `min <= max` on both axes; operations that
//! have nothing to measure return `None` instead of an inverted "empty"
//! extent.

use tracing::debug;

use crate::crs::{CrsRef, CrsRegistry};
use crate::error::GeoResult;
use crate::feature::Feature;
use crate::geometry::{Coordinate, Extent, Geometry};

/// Half-width, in meters, of the square extent built around a lone point.
pub const SINGLE_POINT_BUFFER_METERS: f64 = 1000.0;

/// Width of an extent.
#[inline]
pub fn width(extent: &Extent) -> f64 {
    extent[2] - extent[0]
}

/// Height of an extent.
#[inline]
pub fn height(extent: &Extent) -> f64 {
    extent[3] - extent[1]
}

/// Center point of an extent.
#[inline]
pub fn center(extent: &Extent) -> [f64; 2] {
    [
        (extent[0] + extent[2]) / 2.0,
        (extent[1] + extent[3]) / 2.0,
    ]
}

/// Component-wise union of two extents.
#[inline]
pub fn union(a: Extent, b: Extent) -> Extent {
    [
        a[0].min(b[0]),
        a[1].min(b[1]),
        a[2].max(b[2]),
        a[3].max(b[3]),
    ]
}

/// Grow `extent` to include the `(x, y)` of `coord`.
pub fn extend_with(extent: &mut Extent, coord: &[f64]) {
    if let [x, y, ..] = coord {
        extent[0] = extent[0].min(*x);
        extent[1] = extent[1].min(*y);
        extent[2] = extent[2].max(*x);
        extent[3] = extent[3].max(*y);
    }
}

/// Bounding extent of a coordinate list.
///
/// Coordinates with fewer than two ordinates are ignored; `None` if nothing
/// remains.
pub fn extent_of_coordinates(coords: &[Coordinate]) -> Option<Extent> {
    let mut valid = coords.iter().filter(|c| c.len() >= 2);
    let first = valid.next()?;
    let mut extent = [first[0], first[1], first[0], first[1]];
    for coord in valid {
        extend_with(&mut extent, coord);
    }
    Some(extent)
}

/// Square extent of half-width `half` centered on `(x, y)`.
pub fn buffer_square(x: f64, y: f64, half: f64) -> Extent {
    [x - half, y - half, x + half, y + half]
}

/// Whether two extents overlap (touching edges count).
pub fn intersects(a: &Extent, b: &Extent) -> bool {
    a[0] <= b[2] && a[2] >= b[0] && a[1] <= b[3] && a[3] >= b[1]
}

/// Whether `outer` fully contains `inner`.
pub fn contains_extent(outer: &Extent, inner: &Extent) -> bool {
    outer[0] <= inner[0] && outer[1] <= inner[1] && outer[2] >= inner[2] && outer[3] >= inner[3]
}

/// Parse `min_x,min_y,max_x,max_y`.
///
/// # Errors
///
/// Returns a message if there are not exactly four numbers or the minimum
/// exceeds the maximum on either axis.
pub fn parse_extent(text: &str) -> Result<Extent, String> {
    let values = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let extent: Extent = values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected 4 values, got {}", v.len()))?;
    if extent[0] > extent[2] || extent[1] > extent[3] {
        return Err("minimum exceeds maximum".to_string());
    }
    Ok(extent)
}

/// Combined extent of a feature set, in the units of `crs_code`.
///
/// A set made of exactly one Point feature gets a square extent of
/// [`SINGLE_POINT_BUFFER_METERS`] half-width (converted to native units)
/// around the point, so callers always get a usable viewport. Sets with more
/// features are not buffered, even if they contain points.
///
/// Features without geometry are skipped.
///
/// # Errors
///
/// Returns `UnknownProjection` if `crs_code` is not registered.
pub fn extent_of(
    registry: &CrsRegistry,
    features: &[Feature],
    crs_code: &str,
) -> GeoResult<Option<Extent>> {
    let crs = registry.resolve(crs_code)?;

    if let [feature] = features {
        if let Some(Geometry::Point(coord)) = &feature.geometry {
            if let [x, y, ..] = coord.as_slice() {
                let half = SINGLE_POINT_BUFFER_METERS / crs.meters_per_unit();
                return Ok(Some(buffer_square(*x, *y, half)));
            }
        }
    }

    Ok(features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .filter_map(Geometry::extent)
        .reduce(union))
}

/// Transform an extent between two CRSs.
///
/// If `extent` spans at least the source CRS's whole validity extent, the
/// target CRS's validity extent is returned verbatim. Reprojecting such
/// extents numerically runs into projection singularities (poles, antimeridian)
/// and produces overflowing or collapsed boxes.
///
/// Otherwise the four corners are transformed and their bounding extent
/// returned.
pub fn transform_extent<'a>(
    registry: &'a CrsRegistry,
    extent: &Extent,
    src: impl Into<CrsRef<'a>>,
    tgt: impl Into<CrsRef<'a>>,
) -> GeoResult<Extent> {
    transform_extent_with_stops(registry, extent, src, tgt, 0)
}

/// Like [`transform_extent`], sampling `stops` extra points along each edge.
///
/// Curved projections bend straight edges; densifying keeps the result from
/// clipping the bulge between corners.
pub fn transform_extent_with_stops<'a>(
    registry: &'a CrsRegistry,
    extent: &Extent,
    src: impl Into<CrsRef<'a>>,
    tgt: impl Into<CrsRef<'a>>,
    stops: usize,
) -> GeoResult<Extent> {
    let transformer = registry.transformer(src, tgt)?;
    let src_extent = transformer.source().extent();

    if contains_extent(extent, &src_extent) {
        debug!(
            src = transformer.source().code(),
            tgt = transformer.target().code(),
            "Extent spans the source domain, using target validity extent"
        );
        return Ok(transformer.target().extent());
    }

    let mut result: Option<Extent> = None;
    for (x, y) in edge_samples(extent, stops) {
        let (x, y) = transformer.transform_xy(x, y)?;
        match result.as_mut() {
            Some(acc) => extend_with(acc, &[x, y]),
            None => result = Some([x, y, x, y]),
        }
    }
    // edge_samples always yields the four corners
    Ok(result.unwrap_or(*extent))
}

/// Points around the extent's boundary, corners included, counter-clockwise
/// from the lower-left corner.
fn edge_samples(extent: &Extent, stops: usize) -> Vec<(f64, f64)> {
    let [min_x, min_y, max_x, max_y] = *extent;
    let corners = [(min_x, min_y), (max_x, min_y), (max_x, max_y), (min_x, max_y)];
    let segments = stops + 1;

    let mut samples = Vec::with_capacity(4 * segments);
    for i in 0..4 {
        let (x1, y1) = corners[i];
        let (x2, y2) = corners[(i + 1) % 4];
        for k in 0..segments {
            let t = k as f64 / segments as f64;
            samples.push((x1 + (x2 - x1) * t, y1 + (y2 - y1) * t));
        }
    }
    samples
}
