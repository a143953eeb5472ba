//! GeoJSON payloads and their reprojection.
//!
//! The CRS of a payload is never read from the document itself: callers pass
//! the source code alongside it. Reprojection walks the `coordinates` array to
//! the depth implied by the geometry type and rewrites each position through a
//! [`Transformer`]. Features are processed in parallel with rayon.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::crs::{CrsRef, CrsRegistry, Transformer, GEOGRAPHIC};
use crate::error::{GeoError, GeoResult};
use crate::feature::{generate_id, Feature};
use crate::geometry::{Coordinate, Geometry, Polygon, Properties};

const FEATURE_COLLECTION_TAG: &str = "FeatureCollection";
const FEATURE_TAG: &str = "Feature";

/// Foreign member holding a bounding box in the document's own CRS.
const BBOX_MEMBER: &str = "bbox";

/// A GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<GeoJsonFeature>,
    /// Foreign members such as `bbox` or `name`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self {
            kind: FEATURE_COLLECTION_TAG.to_string(),
            features,
            extra: Map::new(),
        }
    }
}

/// A GeoJSON `Feature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type", default = "feature_tag")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Option<Properties>,
    pub geometry: Option<GeoJsonGeometry>,
}

fn feature_tag() -> String {
    FEATURE_TAG.to_string()
}

impl GeoJsonFeature {
    pub fn new(geometry: Option<GeoJsonGeometry>) -> Self {
        Self {
            kind: feature_tag(),
            id: None,
            properties: None,
            geometry,
        }
    }
}

/// A GeoJSON geometry object.
///
/// `coordinates` is kept as raw JSON so that unknown geometry types survive a
/// round trip untouched. Members other than `type` and `coordinates` (for
/// example `geometries` on a collection) land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub coordinates: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeoJsonGeometry {
    pub fn new(kind: impl Into<String>, coordinates: Value) -> Self {
        Self {
            kind: kind.into(),
            coordinates,
            extra: Map::new(),
        }
    }
}

/// Nesting depth of the `coordinates` array for a geometry type, counting a
/// single position as depth 0.
fn coordinate_depth(kind: &str) -> Option<usize> {
    match kind {
        "Point" => Some(0),
        "LineString" | "MultiPoint" => Some(1),
        "MultiLineString" | "Polygon" => Some(2),
        "MultiPolygon" => Some(3),
        _ => None,
    }
}

/// Reproject features from `src` to `tgt`.
///
/// Returns new features; property maps, identifiers and type tags are copied
/// unchanged. Geometry types without a coordinate array of known depth
/// (collections, extensions) are copied as-is. A `bbox` member on a rewritten
/// geometry is dropped since it would still describe the source coordinates.
///
/// # Errors
///
/// `UnknownProjection` if either CRS is not registered, `InvalidGeoJson` if a
/// coordinate array does not match its declared type, `Transform` if the
/// engine rejects a position.
pub fn reproject_features<'a>(
    registry: &'a CrsRegistry,
    features: &[GeoJsonFeature],
    src: impl Into<CrsRef<'a>>,
    tgt: impl Into<CrsRef<'a>>,
) -> GeoResult<Vec<GeoJsonFeature>> {
    let transformer = registry.transformer(src, tgt)?;
    reproject_all(&transformer, features)
}

/// Reproject a whole collection, keeping its foreign members.
///
/// A collection-level `bbox` is dropped unless the transform is the identity.
///
/// # Errors
///
/// Same as [`reproject_features`].
pub fn reproject_collection<'a>(
    registry: &'a CrsRegistry,
    collection: &FeatureCollection,
    src: impl Into<CrsRef<'a>>,
    tgt: impl Into<CrsRef<'a>>,
) -> GeoResult<FeatureCollection> {
    let transformer = registry.transformer(src, tgt)?;
    let features = reproject_all(&transformer, &collection.features)?;
    let mut extra = collection.extra.clone();
    if !transformer.is_identity() {
        extra.remove(BBOX_MEMBER);
    }
    Ok(FeatureCollection {
        kind: collection.kind.clone(),
        features,
        extra,
    })
}

fn reproject_all(
    transformer: &Transformer<'_>,
    features: &[GeoJsonFeature],
) -> GeoResult<Vec<GeoJsonFeature>> {
    debug!(
        src = transformer.source().code(),
        tgt = transformer.target().code(),
        features = features.len(),
        "Reprojecting GeoJSON features"
    );

    features
        .par_iter()
        .map(|feature| reproject_feature(transformer, feature))
        .collect()
}

/// Reproject features from `src` into geographic WGS 84 (`EPSG:4326`).
pub fn reproject_to_geographic<'a>(
    registry: &'a CrsRegistry,
    features: &[GeoJsonFeature],
    src: impl Into<CrsRef<'a>>,
) -> GeoResult<Vec<GeoJsonFeature>> {
    reproject_features(registry, features, src, GEOGRAPHIC)
}

fn reproject_feature(
    transformer: &Transformer<'_>,
    feature: &GeoJsonFeature,
) -> GeoResult<GeoJsonFeature> {
    let geometry = feature
        .geometry
        .as_ref()
        .map(|geometry| reproject_geometry(transformer, geometry))
        .transpose()?;
    Ok(GeoJsonFeature {
        geometry,
        ..feature.clone()
    })
}

fn reproject_geometry(
    transformer: &Transformer<'_>,
    geometry: &GeoJsonGeometry,
) -> GeoResult<GeoJsonGeometry> {
    let depth = match coordinate_depth(&geometry.kind) {
        Some(depth) if !transformer.is_identity() => depth,
        _ => return Ok(geometry.clone()),
    };
    let mut extra = geometry.extra.clone();
    extra.remove(BBOX_MEMBER);
    Ok(GeoJsonGeometry {
        kind: geometry.kind.clone(),
        coordinates: reproject_nested(transformer, &geometry.coordinates, depth)?,
        extra,
    })
}

fn reproject_nested(transformer: &Transformer<'_>, value: &Value, depth: usize) -> GeoResult<Value> {
    if depth == 0 {
        return reproject_position(transformer, value);
    }
    let items = value.as_array().ok_or_else(|| {
        GeoError::InvalidGeoJson(format!("expected a coordinate array, found {}", value))
    })?;
    items
        .iter()
        .map(|item| reproject_nested(transformer, item, depth - 1))
        .collect::<GeoResult<Vec<_>>>()
        .map(Value::Array)
}

fn reproject_position(transformer: &Transformer<'_>, value: &Value) -> GeoResult<Value> {
    let position = match value.as_array() {
        Some(position) if position.len() >= 2 => position,
        _ => {
            return Err(GeoError::InvalidGeoJson(format!(
                "expected a position with at least 2 ordinates, found {}",
                value
            )))
        }
    };
    let (x, y) = transformer.transform_xy(ordinate(&position[0])?, ordinate(&position[1])?)?;

    let mut out = Vec::with_capacity(position.len());
    out.push(finite_number(transformer, x)?);
    out.push(finite_number(transformer, y)?);
    out.extend(position[2..].iter().cloned());
    Ok(Value::Array(out))
}

fn ordinate(value: &Value) -> GeoResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| GeoError::InvalidGeoJson(format!("ordinate is not a number: {}", value)))
}

fn finite_number(transformer: &Transformer<'_>, value: f64) -> GeoResult<Value> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| GeoError::Transform {
            src: transformer.source().code().to_string(),
            tgt: transformer.target().code().to_string(),
            reason: format!("non-finite result {}", value),
        })
}

/// Convert a GeoJSON feature into the typed model.
///
/// String and numeric identifiers are kept (numbers in their JSON text form);
/// a missing identifier is generated. Unknown geometry types yield a feature
/// without geometry.
pub fn to_feature(feature: &GeoJsonFeature) -> GeoResult<Feature> {
    let geometry = match &feature.geometry {
        Some(geometry) => to_geometry(geometry)?,
        None => None,
    };
    let id = match &feature.id {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => generate_id(),
    };
    Ok(Feature {
        id,
        geometry,
        properties: Arc::new(feature.properties.clone().unwrap_or_default()),
    })
}

/// Convert a GeoJSON geometry object into a [`Geometry`].
///
/// Returns `Ok(None)` for types outside the GeoJSON set.
pub fn to_geometry(geometry: &GeoJsonGeometry) -> GeoResult<Option<Geometry>> {
    let coords = &geometry.coordinates;
    let typed = match geometry.kind.as_str() {
        "Point" => Geometry::Point(checked(decode(coords)?)?),
        "LineString" => Geometry::LineString(checked_all(decode(coords)?)?),
        "MultiPoint" => Geometry::MultiPoint(checked_all(decode(coords)?)?),
        "Polygon" => Geometry::Polygon(Polygon::new(checked_rings(decode(coords)?)?)),
        "MultiLineString" => Geometry::MultiLineString(checked_rings(decode(coords)?)?),
        "MultiPolygon" => {
            let polygons: Vec<Vec<Vec<Coordinate>>> = decode(coords)?;
            Geometry::MultiPolygon(
                polygons
                    .into_iter()
                    .map(|rings| checked_rings(rings).map(Polygon::new))
                    .collect::<GeoResult<_>>()?,
            )
        }
        "GeometryCollection" => {
            let members: Vec<GeoJsonGeometry> = match geometry.extra.get("geometries") {
                Some(members) => decode(members)?,
                None => Vec::new(),
            };
            let mut geometries = Vec::with_capacity(members.len());
            for member in &members {
                geometries.extend(to_geometry(member)?);
            }
            Geometry::GeometryCollection(geometries)
        }
        other => {
            debug!(kind = other, "Skipping unsupported GeoJSON geometry type");
            return Ok(None);
        }
    };
    Ok(Some(typed))
}

fn decode<'de, T: Deserialize<'de>>(value: &'de Value) -> GeoResult<T> {
    T::deserialize(value).map_err(|e| GeoError::InvalidGeoJson(e.to_string()))
}

fn checked(coord: Coordinate) -> GeoResult<Coordinate> {
    if coord.len() < 2 {
        return Err(GeoError::InvalidGeoJson(format!(
            "position needs at least 2 ordinates, got {}",
            coord.len()
        )));
    }
    Ok(coord)
}

fn checked_all(coords: Vec<Coordinate>) -> GeoResult<Vec<Coordinate>> {
    coords.into_iter().map(checked).collect()
}

fn checked_rings(rings: Vec<Vec<Coordinate>>) -> GeoResult<Vec<Vec<Coordinate>>> {
    rings.into_iter().map(checked_all).collect()
}
