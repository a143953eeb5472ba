//! CRS registry and coordinate transformers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use proj4rs::transform::transform;
use proj4rs::Proj;
use tracing::{debug, info, warn};

use super::catalogue::default_definitions;
use super::code::normalize_code;
use super::{CrsDefinition, Units};
use crate::error::{GeoError, GeoResult};
use crate::geometry::{Coordinate, Extent};

/// Resolved metadata for one registered CRS code.
///
/// Every alias of a definition resolves to its own `Crs` carrying the same
/// extent, unit, meters-per-unit, axis orientation and parsed projection.
#[derive(Clone)]
pub struct Crs {
    code: String,
    canonical: String,
    extent: Extent,
    units: Units,
    meters_per_unit: f64,
    axis_orientation: Option<String>,
    proj: Arc<Proj>,
}

impl Crs {
    /// The code this metadata was registered under.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Canonical code shared by all aliases of the definition.
    pub fn canonical_code(&self) -> &str {
        &self.canonical
    }

    /// Validity extent in native units.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Meters per native unit.
    pub fn meters_per_unit(&self) -> f64 {
        self.meters_per_unit
    }

    pub fn axis_orientation(&self) -> Option<&str> {
        self.axis_orientation.as_deref()
    }

    /// Whether coordinates are longitude/latitude.
    pub fn is_geographic(&self) -> bool {
        self.proj.is_latlong()
    }

    /// Whether two metadata objects describe the same coordinate system.
    pub fn is_equivalent(&self, other: &Crs) -> bool {
        self.canonical == other.canonical
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crs")
            .field("code", &self.code)
            .field("canonical", &self.canonical)
            .field("extent", &self.extent)
            .field("units", &self.units)
            .field("meters_per_unit", &self.meters_per_unit)
            .field("axis_orientation", &self.axis_orientation)
            .finish_non_exhaustive()
    }
}

/// A CRS given either by code or as already-resolved metadata.
#[derive(Debug, Clone, Copy)]
pub enum CrsRef<'a> {
    Code(&'a str),
    Resolved(&'a Crs),
}

impl<'a> From<&'a str> for CrsRef<'a> {
    fn from(code: &'a str) -> Self {
        CrsRef::Code(code)
    }
}

impl<'a> From<&'a String> for CrsRef<'a> {
    fn from(code: &'a String) -> Self {
        CrsRef::Code(code.as_str())
    }
}

impl<'a> From<&'a Crs> for CrsRef<'a> {
    fn from(crs: &'a Crs) -> Self {
        CrsRef::Resolved(crs)
    }
}

/// Catalogue of coordinate systems keyed by code.
///
/// Built once, then read-only. `CrsRegistry` is `Send + Sync`, so a single
/// instance can be shared across threads behind an `Arc`.
#[derive(Default)]
pub struct CrsRegistry {
    entries: HashMap<String, Crs>,
}

impl CrsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the compiled catalogue.
    pub fn with_default_catalogue() -> GeoResult<Self> {
        let mut registry = Self::new();
        registry.register(default_definitions())?;
        Ok(registry)
    }

    /// Register definitions.
    ///
    /// Each definition string is parsed once; every alias code then gets its
    /// own metadata entry pointing at the shared projection. A code that is
    /// already registered is replaced.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` if a definition has no codes or its
    /// definition string cannot be parsed. Definitions before the failing one
    /// stay registered.
    pub fn register(&mut self, defs: impl IntoIterator<Item = CrsDefinition>) -> GeoResult<()> {
        for def in defs {
            let canonical = def
                .canonical_code()
                .ok_or_else(|| GeoError::InvalidDefinition {
                    code: "<none>".to_string(),
                    reason: "definition has no codes".to_string(),
                })?
                .to_string();

            let proj = Proj::from_proj_string(&def.proj4).map_err(|e| {
                GeoError::InvalidDefinition {
                    code: canonical.clone(),
                    reason: e.to_string(),
                }
            })?;
            let proj = Arc::new(proj);
            let meters_per_unit = def
                .meters_per_unit
                .unwrap_or_else(|| def.units.default_meters_per_unit());

            for code in &def.codes {
                let crs = Crs {
                    code: code.clone(),
                    canonical: canonical.clone(),
                    extent: def.extent,
                    units: def.units,
                    meters_per_unit,
                    axis_orientation: def.axis_orientation.clone(),
                    proj: Arc::clone(&proj),
                };
                if self.entries.insert(code.clone(), crs).is_some() {
                    warn!(code = %code, "CRS code registered twice, keeping the latest definition");
                }
            }
            debug!(code = %canonical, aliases = def.codes.len(), "Registered CRS");
        }
        info!(codes = self.entries.len(), "CRS registry loaded");
        Ok(())
    }

    /// Resolve a code to its metadata.
    ///
    /// Codes are looked up verbatim first, then in their normalized
    /// `AUTHORITY:CODE` form (so `urn:ogc:def:crs:EPSG::4326` finds
    /// `EPSG:4326`).
    ///
    /// # Errors
    ///
    /// Returns `UnknownProjection` if neither form is registered.
    pub fn resolve(&self, code: &str) -> GeoResult<&Crs> {
        if let Some(crs) = self.entries.get(code) {
            return Ok(crs);
        }
        normalize_code(code)
            .and_then(|normalized| self.entries.get(&normalized))
            .ok_or_else(|| GeoError::UnknownProjection(code.to_string()))
    }

    /// Resolve a code, passing already-resolved metadata through.
    pub fn resolve_ref<'a>(&'a self, crs: CrsRef<'a>) -> GeoResult<&'a Crs> {
        match crs {
            CrsRef::Code(code) => self.resolve(code),
            CrsRef::Resolved(crs) => Ok(crs),
        }
    }

    /// Whether two codes name the same coordinate system.
    ///
    /// Unknown codes are never equivalent to anything.
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        match (self.resolve(a), self.resolve(b)) {
            (Ok(a), Ok(b)) => a.is_equivalent(b),
            _ => false,
        }
    }

    /// Build a reusable transformer between two CRSs.
    pub fn transformer<'a>(
        &'a self,
        src: impl Into<CrsRef<'a>>,
        tgt: impl Into<CrsRef<'a>>,
    ) -> GeoResult<Transformer<'a>> {
        let src = self.resolve_ref(src.into())?;
        let tgt = self.resolve_ref(tgt.into())?;
        Ok(Transformer::new(src, tgt))
    }

    /// Transform one coordinate. Ordinates beyond index 1 are kept as-is.
    pub fn transform(&self, src: &str, tgt: &str, coord: &[f64]) -> GeoResult<Coordinate> {
        self.transformer(src, tgt)?.transform(coord)
    }

    /// All registered codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CrsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrsRegistry")
            .field("codes", &self.codes())
            .finish()
    }
}

/// Coordinate transform between two resolved CRSs.
///
/// Equivalent CRSs produce an identity transformer that never touches the
/// projection engine.
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'a> {
    src: &'a Crs,
    tgt: &'a Crs,
    identity: bool,
}

impl<'a> Transformer<'a> {
    fn new(src: &'a Crs, tgt: &'a Crs) -> Self {
        Self {
            src,
            tgt,
            identity: src.is_equivalent(tgt),
        }
    }

    pub fn source(&self) -> &'a Crs {
        self.src
    }

    pub fn target(&self) -> &'a Crs {
        self.tgt
    }

    /// Whether this transformer leaves coordinates unchanged.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Transform an `(x, y)` pair.
    pub fn transform_xy(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        if self.identity {
            return Ok((x, y));
        }

        // proj4rs works in radians on geographic systems
        let mut point = if self.src.is_geographic() {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        transform(&self.src.proj, &self.tgt.proj, &mut point).map_err(|e| {
            GeoError::Transform {
                src: self.src.code.clone(),
                tgt: self.tgt.code.clone(),
                reason: e.to_string(),
            }
        })?;

        if self.tgt.is_geographic() {
            Ok((point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok(point)
        }
    }

    /// Transform a coordinate, copying ordinates beyond index 1 unchanged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeoJson` if the coordinate has fewer than two
    /// ordinates, or `Transform` if the engine rejects it.
    pub fn transform(&self, coord: &[f64]) -> GeoResult<Coordinate> {
        let [x, y, rest @ ..] = coord else {
            return Err(GeoError::InvalidGeoJson(format!(
                "coordinate needs at least 2 ordinates, got {}",
                coord.len()
            )));
        };
        let (x, y) = self.transform_xy(*x, *y)?;
        let mut out = Vec::with_capacity(coord.len());
        out.push(x);
        out.push(y);
        out.extend_from_slice(rest);
        Ok(out)
    }

    /// Transform an interleaved `x, y` buffer in place.
    pub fn transform_flat(&self, flat: &mut [f64]) -> GeoResult<()> {
        if self.identity {
            return Ok(());
        }
        for pair in flat.chunks_exact_mut(2) {
            let (x, y) = self.transform_xy(pair[0], pair[1])?;
            pair[0] = x;
            pair[1] = y;
        }
        Ok(())
    }
}
