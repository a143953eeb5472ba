//! Representative-point computation.
//!
//! [`centroid`] picks one coordinate that stands for a geometry, e.g. to
//! anchor a label or center a popup. It is *not* an area- or
//! length-weighted centroid: for lines and collections it picks the middle
//! member by index, which is O(1) and deterministic.

use crate::geometry::{Coordinate, Geometry};

/// Index of the member that represents a list of `count` members.
///
/// `count / 2` with integer truncation: for even counts this is the element
/// just past the midpoint.
#[inline]
pub fn middle_index(count: usize) -> usize {
    count / 2
}

/// Representative point of a geometry.
///
/// | Geometry             | Representative point                         |
/// |----------------------|----------------------------------------------|
/// | Point                | the point                                    |
/// | LineString / Ring    | coordinate at `n / 2`                        |
/// | Polygon              | its interior point                           |
/// | MultiPoint           | point at `n / 2`                             |
/// | MultiLineString      | representative point of line `n / 2`         |
/// | MultiPolygon         | representative point of the members' interior points |
/// | GeometryCollection   | representative point of member `n / 2`       |
/// | Circle               | its center                                   |
///
/// Returns `None` when `geometry` is `None` or the chosen member has no
/// coordinates.
pub fn centroid(geometry: Option<&Geometry>) -> Option<Coordinate> {
    match geometry? {
        Geometry::Point(coord) => Some(coord.clone()),
        Geometry::LineString(coords) | Geometry::LinearRing(coords) => middle(coords).cloned(),
        Geometry::Polygon(polygon) => {
            let interior = polygon.interior_point()?;
            centroid(Some(&Geometry::Point(interior)))
        }
        Geometry::MultiPoint(points) => {
            let point = middle(points)?;
            centroid(Some(&Geometry::Point(point.clone())))
        }
        Geometry::MultiLineString(lines) => {
            let line = middle(lines)?;
            centroid(Some(&Geometry::LineString(line.clone())))
        }
        multi @ Geometry::MultiPolygon(_) => centroid(multi.interior_points().as_ref()),
        Geometry::Circle { center, .. } => Some(center.clone()),
        Geometry::GeometryCollection(members) => centroid(middle(members)),
    }
}

fn middle<T>(items: &[T]) -> Option<&T> {
    items.get(middle_index(items.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    fn line(n: usize) -> Vec<Coordinate> {
        (0..n).map(|i| vec![i as f64, i as f64]).collect()
    }

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::new(vec![vec![
            vec![x, y],
            vec![x + size, y],
            vec![x + size, y + size],
            vec![x, y + size],
            vec![x, y],
        ]])
    }

    #[test]
    fn test_absent_geometry() {
        assert_eq!(centroid(None), None);
    }

    #[test]
    fn test_point() {
        let point = Geometry::Point(vec![1.0, 2.0, 3.0]);
        assert_eq!(centroid(Some(&point)), Some(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_linestring_odd_count() {
        let geometry = Geometry::LineString(line(5));
        assert_eq!(centroid(Some(&geometry)), Some(vec![2.0, 2.0]));
    }

    #[test]
    fn test_linestring_even_count_takes_element_past_midpoint() {
        let geometry = Geometry::LineString(line(4));
        assert_eq!(centroid(Some(&geometry)), Some(vec![2.0, 2.0]));
    }

    #[test]
    fn test_linear_ring() {
        let geometry = Geometry::LinearRing(line(3));
        assert_eq!(centroid(Some(&geometry)), Some(vec![1.0, 1.0]));
    }

    #[test]
    fn test_empty_linestring() {
        assert_eq!(centroid(Some(&Geometry::LineString(vec![]))), None);
    }

    #[test]
    fn test_polygon_uses_interior_point() {
        let geometry = Geometry::Polygon(square(0.0, 0.0, 10.0));
        assert_eq!(centroid(Some(&geometry)), Some(vec![5.0, 5.0]));
    }

    #[test]
    fn test_multipoint() {
        let geometry = Geometry::MultiPoint(line(3));
        assert_eq!(centroid(Some(&geometry)), Some(vec![1.0, 1.0]));
    }

    #[test]
    fn test_multilinestring_recurses_into_middle_line() {
        let geometry = Geometry::MultiLineString(vec![
            line(2),
            vec![vec![10.0, 0.0], vec![11.0, 0.0], vec![12.0, 0.0]],
            line(7),
        ]);
        assert_eq!(centroid(Some(&geometry)), Some(vec![11.0, 0.0]));
    }

    #[test]
    fn test_multipolygon_uses_middle_interior_point() {
        let geometry = Geometry::MultiPolygon(vec![
            square(0.0, 0.0, 2.0),
            square(10.0, 10.0, 2.0),
            square(20.0, 20.0, 2.0),
        ]);
        assert_eq!(centroid(Some(&geometry)), Some(vec![11.0, 11.0]));
    }

    #[test]
    fn test_circle() {
        let geometry = Geometry::Circle {
            center: vec![4.0, 5.0],
            radius: 100.0,
        };
        assert_eq!(centroid(Some(&geometry)), Some(vec![4.0, 5.0]));
    }

    #[test]
    fn test_collection_recurses() {
        let geometry = Geometry::GeometryCollection(vec![
            Geometry::Point(vec![0.0, 0.0]),
            Geometry::GeometryCollection(vec![Geometry::LineString(line(5))]),
        ]);
        assert_eq!(centroid(Some(&geometry)), Some(vec![2.0, 2.0]));
    }

    #[test]
    fn test_empty_collection() {
        let geometry = Geometry::GeometryCollection(vec![]);
        assert_eq!(centroid(Some(&geometry)), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_linestring_picks_floor_half(n in 1usize..200) {
                let geometry = Geometry::LineString(line(n));
                let expected = (n / 2) as f64;
                prop_assert_eq!(centroid(Some(&geometry)), Some(vec![expected, expected]));
            }

            #[test]
            fn test_centroid_of_point_set_is_a_member(
                points in prop::collection::vec((-1e3..1e3_f64, -1e3..1e3_f64), 1..50)
            ) {
                let coords: Vec<Coordinate> = points.iter().map(|&(x, y)| vec![x, y]).collect();
                let geometry = Geometry::MultiPoint(coords.clone());
                let c = centroid(Some(&geometry)).unwrap();
                prop_assert!(coords.contains(&c));
            }
        }
    }
}
