//! mapcore - geometry and projection kernel for web-map plugins
//!
//! The kernel covers what map-state logic needs below the rendering layer:
//!
//! - [`crs`]: a registry of coordinate reference systems and their transforms
//! - [`tiled`]: decoding compact vector-tile geometries into typed values
//! - [`centroid`]: representative points for labels and popups
//! - [`extent`]: bounding boxes, including CRS-to-CRS extent transforms
//! - [`resolution`] and [`scale`]: zoom ladders and WMTS scale denominators
//! - [`geojson`]: reprojecting GeoJSON payloads
//!
//! A [`CrsRegistry`] is built once at start-up and passed by reference to
//! every operation that resolves CRS codes; nothing in the kernel keeps
//! global state.
//!
//! ```no_run
//! use mapcore::{centroid, CrsRegistry, Geometry};
//!
//! let registry = CrsRegistry::with_default_catalogue()?;
//! let point = registry.transform("EPSG:4326", "EPSG:3857", &[2.35, 48.85])?;
//! assert_eq!(centroid(Some(&Geometry::Point(point.clone()))), Some(point));
//! # Ok::<(), mapcore::GeoError>(())
//! ```

pub mod centroid;
pub mod config;
pub mod crs;
pub mod error;
pub mod extent;
pub mod feature;
pub mod filter;
pub mod geojson;
pub mod geometry;
pub mod logging;
pub mod resolution;
pub mod scale;
pub mod tiled;

pub use centroid::centroid;
pub use crs::{CrsDefinition, CrsRegistry, Units};
pub use error::{GeoError, GeoResult};
pub use extent::{extent_of, transform_extent};
pub use feature::Feature;
pub use geometry::{Coordinate, Extent, Geometry, GeometryKind, Polygon, Properties};
pub use resolution::generate_resolutions;
pub use scale::wmts_scale;
pub use tiled::{decode_tiled_geometry, TiledGeometry};
