//! Geometry model.
//!
//! A closed sum type over the geometry kinds the web-map layer deals with.
//! Every variant owns its coordinate data; coordinates are `Vec<f64>` with at
//! least two ordinates (`x`, `y`, then optional extras such as elevation).

mod polygon;

pub use polygon::Polygon;

use std::fmt;

use crate::extent::{extent_of_coordinates, union};

/// A coordinate tuple: `x`, `y`, then any extra ordinates.
pub type Coordinate = Vec<f64>;

/// Axis-aligned bounding box `[min_x, min_y, max_x, max_y]`.
pub type Extent = [f64; 4];

/// Feature property map.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Geometry kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    Circle,
}

impl GeometryKind {
    /// Parse a type tag such as `"Polygon"`.
    ///
    /// Returns `None` for unknown tags; callers treat that as "no geometry".
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Point" => Some(GeometryKind::Point),
            "LineString" => Some(GeometryKind::LineString),
            "LinearRing" => Some(GeometryKind::LinearRing),
            "Polygon" => Some(GeometryKind::Polygon),
            "MultiPoint" => Some(GeometryKind::MultiPoint),
            "MultiLineString" => Some(GeometryKind::MultiLineString),
            "MultiPolygon" => Some(GeometryKind::MultiPolygon),
            "GeometryCollection" => Some(GeometryKind::GeometryCollection),
            "Circle" => Some(GeometryKind::Circle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::LinearRing => "LinearRing",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
            GeometryKind::Circle => "Circle",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geometry value.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    /// Closed ring; the last coordinate repeats the first.
    LinearRing(Vec<Coordinate>),
    Polygon(Polygon),
    MultiPoint(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
    Circle { center: Coordinate, radius: f64 },
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::LinearRing(_) => GeometryKind::LinearRing,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryKind::GeometryCollection,
            Geometry::Circle { .. } => GeometryKind::Circle,
        }
    }

    /// Bounding extent, or `None` for a geometry without coordinates.
    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::Point(coord) => extent_of_coordinates(std::slice::from_ref(coord)),
            Geometry::LineString(coords)
            | Geometry::LinearRing(coords)
            | Geometry::MultiPoint(coords) => extent_of_coordinates(coords),
            Geometry::Polygon(polygon) => polygon.extent(),
            Geometry::MultiLineString(lines) => lines
                .iter()
                .filter_map(|line| extent_of_coordinates(line))
                .reduce(union),
            Geometry::MultiPolygon(polygons) => {
                polygons.iter().filter_map(Polygon::extent).reduce(union)
            }
            Geometry::GeometryCollection(members) => {
                members.iter().filter_map(Geometry::extent).reduce(union)
            }
            Geometry::Circle { center, radius } => match center.as_slice() {
                [x, y, ..] => Some([x - radius, y - radius, x + radius, y + radius]),
                _ => None,
            },
        }
    }

    /// Visit every coordinate mutably, stopping at the first error.
    ///
    /// A circle's radius is left untouched; only its center is visited.
    pub fn try_for_each_coordinate_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Coordinate) -> Result<(), E>,
    {
        match self {
            Geometry::Point(coord) | Geometry::Circle { center: coord, .. } => f(coord),
            Geometry::LineString(coords)
            | Geometry::LinearRing(coords)
            | Geometry::MultiPoint(coords) => coords.iter_mut().try_for_each(f),
            Geometry::Polygon(polygon) => polygon
                .rings
                .iter_mut()
                .flatten()
                .try_for_each(f),
            Geometry::MultiLineString(lines) => lines.iter_mut().flatten().try_for_each(f),
            Geometry::MultiPolygon(polygons) => polygons
                .iter_mut()
                .flat_map(|p| p.rings.iter_mut())
                .flatten()
                .try_for_each(f),
            Geometry::GeometryCollection(members) => members
                .iter_mut()
                .try_for_each(|member| member.try_for_each_coordinate_mut(f)),
        }
    }

    /// Interior points of a multi-polygon's members, as one MultiPoint.
    ///
    /// Members without an interior point (empty exterior ring) are skipped.
    /// Returns `None` for any other geometry kind.
    pub fn interior_points(&self) -> Option<Geometry> {
        match self {
            Geometry::MultiPolygon(polygons) => Some(Geometry::MultiPoint(
                polygons.iter().filter_map(Polygon::interior_point).collect(),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag_roundtrip() {
        for kind in [
            GeometryKind::Point,
            GeometryKind::LineString,
            GeometryKind::LinearRing,
            GeometryKind::Polygon,
            GeometryKind::MultiPoint,
            GeometryKind::MultiLineString,
            GeometryKind::MultiPolygon,
            GeometryKind::GeometryCollection,
            GeometryKind::Circle,
        ] {
            assert_eq!(GeometryKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(GeometryKind::from_tag("Triangle"), None);
        assert_eq!(GeometryKind::from_tag("point"), None);
    }

    #[test]
    fn test_point_extent_is_degenerate() {
        let point = Geometry::Point(vec![3.0, 4.0]);
        assert_eq!(point.extent(), Some([3.0, 4.0, 3.0, 4.0]));
    }

    #[test]
    fn test_circle_extent() {
        let circle = Geometry::Circle {
            center: vec![10.0, 20.0],
            radius: 5.0,
        };
        assert_eq!(circle.extent(), Some([5.0, 15.0, 15.0, 25.0]));
    }

    #[test]
    fn test_collection_extent_unions_members() {
        let collection = Geometry::GeometryCollection(vec![
            Geometry::Point(vec![0.0, 0.0]),
            Geometry::LineString(vec![vec![5.0, -2.0], vec![7.0, 3.0]]),
            Geometry::GeometryCollection(vec![]),
        ]);
        assert_eq!(collection.extent(), Some([0.0, -2.0, 7.0, 3.0]));
    }

    #[test]
    fn test_empty_geometry_has_no_extent() {
        assert_eq!(Geometry::LineString(vec![]).extent(), None);
        assert_eq!(Geometry::GeometryCollection(vec![]).extent(), None);
        assert_eq!(Geometry::MultiPolygon(vec![]).extent(), None);
    }

    #[test]
    fn test_for_each_coordinate_visits_nested_members() {
        let mut geometry = Geometry::GeometryCollection(vec![
            Geometry::Point(vec![1.0, 1.0]),
            Geometry::MultiLineString(vec![vec![vec![2.0, 2.0], vec![3.0, 3.0]]]),
            Geometry::Circle {
                center: vec![4.0, 4.0],
                radius: 1.0,
            },
        ]);
        let mut visited = 0;
        geometry
            .try_for_each_coordinate_mut(&mut |coord: &mut Coordinate| {
                coord[0] *= 10.0;
                visited += 1;
                Ok::<(), ()>(())
            })
            .unwrap();
        assert_eq!(visited, 4);
        assert_eq!(geometry.extent(), Some([10.0, 1.0, 41.0, 5.0]));
    }

    #[test]
    fn test_interior_points_only_for_multipolygon() {
        let square = Polygon::new(vec![vec![
            vec![0.0, 0.0],
            vec![4.0, 0.0],
            vec![4.0, 4.0],
            vec![0.0, 4.0],
            vec![0.0, 0.0],
        ]]);
        let multi = Geometry::MultiPolygon(vec![square.clone(), square]);
        match multi.interior_points() {
            Some(Geometry::MultiPoint(points)) => assert_eq!(points.len(), 2),
            other => panic!("expected MultiPoint, got {:?}", other),
        }
        assert!(Geometry::Point(vec![0.0, 0.0]).interior_points().is_none());
    }
}
