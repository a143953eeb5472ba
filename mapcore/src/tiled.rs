//! Tiled render-geometry decoder.
//!
//! Vector tiles deliver geometries in a compact form: one flat buffer of
//! interleaved `x, y` ordinates plus boundary arrays that cut it into
//! segments.
//!
//! ```text
//! coordinates: [x0 y0 x1 y1 | x2 y2 x3 y3 | x4 y4 ...]
//! ends:                   4             8      ...      exclusive end offsets into `coordinates`
//! endss:       ...                                      exclusive end offsets into `ends`
//! ```
//!
//! `ends` splits the buffer into rings or lines; `endss` groups `ends` into
//! polygons for MultiPolygon. Decoding turns this into a typed [`Geometry`],
//! optionally reprojecting tile-space coordinates into the map CRS first.

use std::sync::Arc;

use tracing::debug;

use crate::crs::CrsRegistry;
use crate::error::{GeoError, GeoResult};
use crate::feature::{generate_id, Feature};
use crate::geometry::{Coordinate, Geometry, GeometryKind, Polygon, Properties};

/// Ordinates per coordinate in the flat buffer.
pub const STRIDE: usize = 2;

/// A geometry in compact tiled form.
///
/// `Clone` deep-copies the coordinate buffer and boundary arrays but shares
/// the property map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TiledGeometry {
    /// Geometry type tag, e.g. `"Polygon"`.
    pub kind: String,

    /// Interleaved `x, y` ordinates.
    pub coordinates: Vec<f64>,

    /// Exclusive end offsets of each ring/line in `coordinates`.
    pub ends: Vec<usize>,

    /// Exclusive end offsets of each polygon's group in `ends`.
    pub endss: Vec<usize>,

    pub properties: Arc<Properties>,

    pub id: Option<String>,

    /// Already-materialized members of a GeometryCollection.
    pub geometries: Vec<Geometry>,
}

impl TiledGeometry {
    /// Create a tiled geometry with no boundaries, properties or id.
    pub fn new(kind: impl Into<String>, coordinates: Vec<f64>) -> Self {
        Self {
            kind: kind.into(),
            coordinates,
            ..Default::default()
        }
    }

    pub fn with_ends(mut self, ends: Vec<usize>) -> Self {
        self.ends = ends;
        self
    }

    pub fn with_endss(mut self, endss: Vec<usize>) -> Self {
        self.endss = endss;
        self
    }

    pub fn with_properties(mut self, properties: Arc<Properties>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_geometries(mut self, geometries: Vec<Geometry>) -> Self {
        self.geometries = geometries;
        self
    }

    /// Check that the boundary arrays fit the coordinate buffer.
    ///
    /// # Errors
    ///
    /// Returns `MalformedGeometryEncoding` if the buffer holds a partial
    /// coordinate, or `ends`/`endss` are decreasing, misaligned or out of range.
    pub fn validate(&self) -> GeoResult<()> {
        let len = self.coordinates.len();
        if len % STRIDE != 0 {
            return Err(GeoError::malformed(format!(
                "coordinate buffer length {} is not a multiple of {}",
                len, STRIDE
            )));
        }
        check_offsets("ends", &self.ends, len)?;
        if let Some((i, end)) = self.ends.iter().enumerate().find(|(_, e)| *e % STRIDE != 0) {
            return Err(GeoError::malformed(format!(
                "ends[{}]={} splits a coordinate",
                i, end
            )));
        }
        check_offsets("endss", &self.endss, self.ends.len())
    }
}

fn check_offsets(name: &str, offsets: &[usize], limit: usize) -> GeoResult<()> {
    let mut previous = 0;
    for (i, &offset) in offsets.iter().enumerate() {
        if offset > limit {
            return Err(GeoError::malformed(format!(
                "{}[{}]={} exceeds length {}",
                name, i, offset, limit
            )));
        }
        if offset < previous {
            return Err(GeoError::malformed(format!(
                "{}[{}]={} is before previous offset {}",
                name, i, offset, previous
            )));
        }
        previous = offset;
    }
    Ok(())
}

/// Decode a tiled geometry.
///
/// When both `tile_crs` and `map_crs` are given, a copy of the input is
/// reprojected from tile space to map space before decoding; otherwise the
/// buffer is decoded in its own coordinate space. The input is never
/// modified.
///
/// Returns `Ok(None)` for an unknown type tag.
///
/// # Errors
///
/// - `MalformedGeometryEncoding` if the boundary arrays do not fit the buffer
/// - `UnknownProjection` / `Transform` from the reprojection step
pub fn decode_tiled_geometry(
    registry: &CrsRegistry,
    tiled: &TiledGeometry,
    tile_crs: Option<&str>,
    map_crs: Option<&str>,
) -> GeoResult<Option<Geometry>> {
    tiled.validate()?;

    let (Some(tile_crs), Some(map_crs)) = (tile_crs, map_crs) else {
        return decode(tiled);
    };

    let transformer = registry.transformer(tile_crs, map_crs)?;
    let mut projected = tiled.clone();
    transformer.transform_flat(&mut projected.coordinates)?;
    for member in &mut projected.geometries {
        member.try_for_each_coordinate_mut(&mut |coord: &mut Coordinate| {
            *coord = transformer.transform(coord)?;
            Ok::<(), GeoError>(())
        })?;
    }
    decode(&projected)
}

/// Decode a tiled geometry into a feature.
///
/// The feature keeps the input's identifier (or gets a generated one) and
/// shares its property map.
pub fn decode_feature(
    registry: &CrsRegistry,
    tiled: &TiledGeometry,
    tile_crs: Option<&str>,
    map_crs: Option<&str>,
) -> GeoResult<Feature> {
    let geometry = decode_tiled_geometry(registry, tiled, tile_crs, map_crs)?;
    Ok(Feature {
        id: tiled.id.clone().unwrap_or_else(generate_id),
        geometry,
        properties: Arc::clone(&tiled.properties),
    })
}

fn decode(tiled: &TiledGeometry) -> GeoResult<Option<Geometry>> {
    let Some(kind) = GeometryKind::from_tag(&tiled.kind) else {
        debug!(kind = %tiled.kind, "Unsupported tiled geometry type, no geometry decoded");
        return Ok(None);
    };

    let flat = tiled.coordinates.as_slice();
    match kind {
        GeometryKind::Polygon | GeometryKind::MultiLineString => {
            check_consumed("coordinates", flat.len(), &tiled.ends)?;
        }
        GeometryKind::MultiPolygon => {
            check_consumed("ends", tiled.ends.len(), &tiled.endss)?;
            check_consumed("coordinates", flat.len(), &tiled.ends)?;
        }
        _ => {}
    }

    let geometry = match kind {
        GeometryKind::Point => Geometry::Point(first_coordinate(flat, kind)?),
        GeometryKind::LineString => Geometry::LineString(coordinates(flat)),
        GeometryKind::LinearRing => Geometry::LinearRing(close_ring(coordinates(flat))),
        GeometryKind::Polygon => Geometry::Polygon(Polygon::new(split(flat, 0, &tiled.ends))),
        GeometryKind::MultiPoint => Geometry::MultiPoint(coordinates(flat)),
        GeometryKind::MultiLineString => Geometry::MultiLineString(split(flat, 0, &tiled.ends)),
        GeometryKind::MultiPolygon => {
            Geometry::MultiPolygon(split_polygons(flat, &tiled.ends, &tiled.endss))
        }
        GeometryKind::GeometryCollection => {
            Geometry::GeometryCollection(tiled.geometries.clone())
        }
        GeometryKind::Circle => {
            let center = first_coordinate(flat, kind)?;
            let radius = match flat.get(STRIDE..2 * STRIDE) {
                Some(edge) => (edge[0] - center[0]).hypot(edge[1] - center[1]),
                None => 0.0,
            };
            Geometry::Circle { center, radius }
        }
    };
    Ok(Some(geometry))
}

fn first_coordinate(flat: &[f64], kind: GeometryKind) -> GeoResult<Coordinate> {
    flat.get(..STRIDE)
        .map(<[f64]>::to_vec)
        .ok_or_else(|| GeoError::malformed(format!("{} needs at least one coordinate", kind)))
}

fn coordinates(flat: &[f64]) -> Vec<Coordinate> {
    flat.chunks_exact(STRIDE).map(<[f64]>::to_vec).collect()
}

fn close_ring(mut ring: Vec<Coordinate>) -> Vec<Coordinate> {
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if ring.len() > 1 && first != last {
            let first = first.clone();
            ring.push(first);
        }
    }
    ring
}

/// The last offset must reach the end of the buffer it cuts.
fn check_consumed(name: &str, len: usize, offsets: &[usize]) -> GeoResult<()> {
    let consumed = offsets.last().copied().unwrap_or(0);
    if consumed != len {
        return Err(GeoError::malformed(format!(
            "{} has {} trailing entries past the last offset {}",
            name,
            len - consumed,
            consumed
        )));
    }
    Ok(())
}

/// Cut `flat` into segments starting at `offset`, one per entry of `ends`.
///
/// Offsets were checked by [`TiledGeometry::validate`].
fn split(flat: &[f64], mut offset: usize, ends: &[usize]) -> Vec<Vec<Coordinate>> {
    ends.iter()
        .map(|&end| {
            let segment = coordinates(&flat[offset..end]);
            offset = end;
            segment
        })
        .collect()
}

fn split_polygons(flat: &[f64], ends: &[usize], endss: &[usize]) -> Vec<Polygon> {
    let mut offset = 0;
    let mut ends_start = 0;
    endss
        .iter()
        .map(|&ends_end| {
            let group = &ends[ends_start..ends_end];
            let polygon = Polygon::new(split(flat, offset, group));
            if let Some(&last) = group.last() {
                offset = last;
            }
            ends_start = ends_end;
            polygon
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{GEOGRAPHIC, WEB_MERCATOR};

    fn registry() -> CrsRegistry {
        CrsRegistry::with_default_catalogue().unwrap()
    }

    fn decode_plain(tiled: &TiledGeometry) -> Option<Geometry> {
        decode_tiled_geometry(&registry(), tiled, None, None).unwrap()
    }

    #[test]
    fn test_point() {
        let tiled = TiledGeometry::new("Point", vec![3.0, 4.0]);
        assert_eq!(decode_plain(&tiled), Some(Geometry::Point(vec![3.0, 4.0])));
    }

    #[test]
    fn test_empty_point_is_malformed() {
        let tiled = TiledGeometry::new("Point", vec![]);
        let result = decode_tiled_geometry(&registry(), &tiled, None, None);
        assert!(matches!(result, Err(GeoError::MalformedGeometryEncoding { .. })));
    }

    #[test]
    fn test_linestring_uses_whole_buffer() {
        let tiled = TiledGeometry::new("LineString", vec![0.0, 0.0, 1.0, 1.0, 2.0, 0.0]);
        assert_eq!(
            decode_plain(&tiled),
            Some(Geometry::LineString(vec![
                vec![0.0, 0.0],
                vec![1.0, 1.0],
                vec![2.0, 0.0]
            ]))
        );
    }

    #[test]
    fn test_linear_ring_is_closed() {
        let tiled = TiledGeometry::new("LinearRing", vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        match decode_plain(&tiled) {
            Some(Geometry::LinearRing(ring)) => {
                assert_eq!(ring.len(), 4);
                assert_eq!(ring.first(), ring.last());
            }
            other => panic!("expected LinearRing, got {:?}", other),
        }
    }

    #[test]
    fn test_already_closed_ring_untouched() {
        let tiled = TiledGeometry::new("LinearRing", vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        match decode_plain(&tiled) {
            Some(Geometry::LinearRing(ring)) => assert_eq!(ring.len(), 3),
            other => panic!("expected LinearRing, got {:?}", other),
        }
    }

    #[test]
    fn test_polygon_split_by_ends() {
        let tiled = TiledGeometry::new(
            "Polygon",
            vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0],
        )
        .with_ends(vec![4, 8]);

        let Some(Geometry::Polygon(polygon)) = decode_plain(&tiled) else {
            panic!("expected Polygon");
        };
        assert_eq!(polygon.rings.len(), 2);
        // Start inclusive, end exclusive
        assert_eq!(polygon.rings[0], vec![vec![0.0, 0.0], vec![1.0, 1.0]]);
        assert_eq!(polygon.rings[1], vec![vec![2.0, 2.0], vec![3.0, 3.0]]);
    }

    #[test]
    fn test_multipoint() {
        let tiled = TiledGeometry::new("MultiPoint", vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            decode_plain(&tiled),
            Some(Geometry::MultiPoint(vec![vec![0.0, 1.0], vec![2.0, 3.0]]))
        );
    }

    #[test]
    fn test_multilinestring() {
        let tiled = TiledGeometry::new("MultiLineString", vec![0.0, 0.0, 1.0, 1.0, 5.0, 5.0, 6.0, 6.0, 7.0, 7.0])
            .with_ends(vec![4, 10]);
        let Some(Geometry::MultiLineString(lines)) = decode_plain(&tiled) else {
            panic!("expected MultiLineString");
        };
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[1].len(), 3);
    }

    #[test]
    fn test_multipolygon_groups_ends() {
        // Polygon A: exterior (3 coords) + hole (3 coords); polygon B: exterior (3 coords)
        let coords: Vec<f64> = (0..18).map(f64::from).collect();
        let tiled = TiledGeometry::new("MultiPolygon", coords)
            .with_ends(vec![6, 12, 18])
            .with_endss(vec![2, 3]);

        let Some(Geometry::MultiPolygon(polygons)) = decode_plain(&tiled) else {
            panic!("expected MultiPolygon");
        };
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].rings.len(), 2);
        assert_eq!(polygons[1].rings.len(), 1);
        assert_eq!(polygons[0].rings[1][0], vec![6.0, 7.0]);
        assert_eq!(polygons[1].rings[0][0], vec![12.0, 13.0]);
    }

    #[test]
    fn test_geometry_collection_uses_members() {
        let members = vec![
            Geometry::Point(vec![1.0, 2.0]),
            Geometry::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]]),
        ];
        let tiled = TiledGeometry::new("GeometryCollection", vec![]).with_geometries(members.clone());
        assert_eq!(decode_plain(&tiled), Some(Geometry::GeometryCollection(members)));
    }

    #[test]
    fn test_circle() {
        let tiled = TiledGeometry::new("Circle", vec![10.0, 10.0, 13.0, 14.0]);
        assert_eq!(
            decode_plain(&tiled),
            Some(Geometry::Circle {
                center: vec![10.0, 10.0],
                radius: 5.0
            })
        );
    }

    #[test]
    fn test_unknown_tag_is_none() {
        let tiled = TiledGeometry::new("Hexagon", vec![0.0, 0.0]);
        assert_eq!(decode_plain(&tiled), None);
    }

    #[test]
    fn test_malformed_ends_out_of_range() {
        let tiled = TiledGeometry::new("Polygon", vec![0.0, 0.0, 1.0, 1.0]).with_ends(vec![4, 8]);
        let result = decode_tiled_geometry(&registry(), &tiled, None, None);
        assert!(matches!(result, Err(GeoError::MalformedGeometryEncoding { .. })));
    }

    #[test]
    fn test_malformed_ends_decreasing() {
        let tiled = TiledGeometry::new("MultiLineString", vec![0.0; 8]).with_ends(vec![6, 4]);
        assert!(tiled.validate().is_err());
    }

    #[test]
    fn test_malformed_ends_splitting_coordinate() {
        let tiled = TiledGeometry::new("Polygon", vec![0.0; 8]).with_ends(vec![3, 8]);
        assert!(tiled.validate().is_err());
    }

    #[test]
    fn test_malformed_endss_out_of_range() {
        let tiled = TiledGeometry::new("MultiPolygon", vec![0.0; 8])
            .with_ends(vec![8])
            .with_endss(vec![2]);
        let result = decode_tiled_geometry(&registry(), &tiled, None, None);
        assert!(matches!(result, Err(GeoError::MalformedGeometryEncoding { .. })));
    }

    #[test]
    fn test_trailing_ordinates_rejected() {
        let tiled = TiledGeometry::new("Polygon", vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 9.0, 9.0])
            .with_ends(vec![6]);
        let result = decode_tiled_geometry(&registry(), &tiled, None, None);
        assert!(matches!(result, Err(GeoError::MalformedGeometryEncoding { .. })));
    }

    #[test]
    fn test_missing_ends_rejected() {
        for kind in ["Polygon", "MultiLineString"] {
            let tiled = TiledGeometry::new(kind, vec![0.0, 0.0, 1.0, 1.0]);
            let result = decode_tiled_geometry(&registry(), &tiled, None, None);
            assert!(
                matches!(result, Err(GeoError::MalformedGeometryEncoding { .. })),
                "{kind}: {result:?}"
            );
        }
    }

    #[test]
    fn test_trailing_ends_rejected() {
        let coords: Vec<f64> = (0..12).map(f64::from).collect();
        let tiled = TiledGeometry::new("MultiPolygon", coords)
            .with_ends(vec![6, 12])
            .with_endss(vec![1]);
        let result = decode_tiled_geometry(&registry(), &tiled, None, None);
        assert!(matches!(result, Err(GeoError::MalformedGeometryEncoding { .. })));
    }

    #[test]
    fn test_empty_polygon_decodes_without_rings() {
        let tiled = TiledGeometry::new("Polygon", vec![]);
        let Some(Geometry::Polygon(polygon)) = decode_plain(&tiled) else {
            panic!("expected Polygon");
        };
        assert!(polygon.rings.is_empty());
    }

    #[test]
    fn test_ends_ignored_by_linestring() {
        let tiled = TiledGeometry::new("LineString", vec![0.0, 0.0, 1.0, 1.0]).with_ends(vec![2]);
        assert_eq!(
            decode_plain(&tiled),
            Some(Geometry::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]]))
        );
    }

    #[test]
    fn test_malformed_odd_buffer() {
        let tiled = TiledGeometry::new("LineString", vec![0.0, 0.0, 1.0]);
        assert!(tiled.validate().is_err());
    }

    #[test]
    fn test_reprojection_leaves_input_untouched() {
        let registry = registry();
        let tiled = TiledGeometry::new("LineString", vec![0.0, 0.0, 180.0, 0.0]);
        let geometry = decode_tiled_geometry(&registry, &tiled, Some(GEOGRAPHIC), Some(WEB_MERCATOR))
            .unwrap()
            .unwrap();

        assert_eq!(tiled.coordinates, vec![0.0, 0.0, 180.0, 0.0]);
        let Geometry::LineString(coords) = geometry else {
            panic!("expected LineString");
        };
        assert!((coords[1][0] - crate::crs::catalogue::WEB_MERCATOR_HALF_WORLD).abs() < 1e-3);
    }

    #[test]
    fn test_reprojection_needs_both_crs() {
        let registry = registry();
        let tiled = TiledGeometry::new("Point", vec![180.0, 0.0]);
        let geometry = decode_tiled_geometry(&registry, &tiled, Some(GEOGRAPHIC), None).unwrap();
        assert_eq!(geometry, Some(Geometry::Point(vec![180.0, 0.0])));
    }

    #[test]
    fn test_reprojection_unknown_crs() {
        let registry = registry();
        let tiled = TiledGeometry::new("Point", vec![0.0, 0.0]);
        let result = decode_tiled_geometry(&registry, &tiled, Some("EPSG:0"), Some(WEB_MERCATOR));
        assert!(matches!(result, Err(GeoError::UnknownProjection(_))));
    }

    #[test]
    fn test_reprojection_reaches_collection_members() {
        let registry = registry();
        let tiled = TiledGeometry::new("GeometryCollection", vec![])
            .with_geometries(vec![Geometry::Point(vec![180.0, 0.0, 12.0])]);
        let geometry = decode_tiled_geometry(&registry, &tiled, Some(GEOGRAPHIC), Some(WEB_MERCATOR))
            .unwrap()
            .unwrap();
        let Geometry::GeometryCollection(members) = geometry else {
            panic!("expected GeometryCollection");
        };
        let Geometry::Point(coord) = &members[0] else {
            panic!("expected Point");
        };
        assert!((coord[0] - crate::crs::catalogue::WEB_MERCATOR_HALF_WORLD).abs() < 1e-3);
        assert_eq!(coord[2], 12.0);
    }

    #[test]
    fn test_clone_shares_properties() {
        let mut props = Properties::new();
        props.insert("kind".to_string(), serde_json::json!("road"));
        let tiled = TiledGeometry::new("Point", vec![0.0, 0.0]).with_properties(Arc::new(props));
        let copy = tiled.clone();
        assert!(Arc::ptr_eq(&tiled.properties, &copy.properties));
        assert_ne!(tiled.coordinates.as_ptr(), copy.coordinates.as_ptr());
    }

    #[test]
    fn test_decode_feature_keeps_id_and_properties() {
        let mut props = Properties::new();
        props.insert("name".to_string(), serde_json::json!("A1"));
        let props = Arc::new(props);
        let tiled = TiledGeometry::new("Point", vec![1.0, 2.0])
            .with_id("road-17")
            .with_properties(Arc::clone(&props));

        let feature = decode_feature(&registry(), &tiled, None, None).unwrap();
        assert_eq!(feature.id, "road-17");
        assert!(Arc::ptr_eq(&feature.properties, &props));
        assert_eq!(feature.geometry, Some(Geometry::Point(vec![1.0, 2.0])));
    }

    #[test]
    fn test_decode_feature_generates_id() {
        let tiled = TiledGeometry::new("Hexagon", vec![]);
        let feature = decode_feature(&registry(), &tiled, None, None).unwrap();
        assert!(feature.id.starts_with(crate::feature::GENERATED_ID_PREFIX));
        assert!(feature.geometry.is_none());
    }
}
