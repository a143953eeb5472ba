//! Spatial filtering of features.

use crate::extent::intersects;
use crate::feature::Feature;
use crate::geometry::{Extent, Geometry};

/// Selects the features that intersect a query.
///
/// This is the seam for plugins that need exact geometric predicates; the
/// crate itself only ships the bounding-box [`ExtentFilter`].
pub trait SpatialFilter: Send + Sync {
    /// Return the subset of `features` matching the query, in input order.
    fn execute(&self, features: &[Feature]) -> Vec<Feature>;
}

/// Keeps features whose bounding extent intersects a query extent.
///
/// Features without geometry, or whose geometry has no coordinates, never
/// match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentFilter {
    query: Extent,
}

impl ExtentFilter {
    pub fn new(query: Extent) -> Self {
        Self { query }
    }

    /// Filter on the extent of `query`. `None` if it has no coordinates.
    pub fn intersecting(query: &Geometry) -> Option<Self> {
        query.extent().map(Self::new)
    }

    pub fn query(&self) -> Extent {
        self.query
    }

    fn matches(&self, feature: &Feature) -> bool {
        feature
            .geometry
            .as_ref()
            .and_then(Geometry::extent)
            .is_some_and(|extent| intersects(&self.query, &extent))
    }
}

impl SpatialFilter for ExtentFilter {
    fn execute(&self, features: &[Feature]) -> Vec<Feature> {
        features
            .iter()
            .filter(|feature| self.matches(feature))
            .cloned()
            .collect()
    }
}
