//! Coordinate reference system registry.
//!
//! Holds the catalogue of named coordinate systems and resolves CRS codes to
//! metadata and coordinate transforms. The projection math itself is owned by
//! [`proj4rs`]; this module parses each definition string once and keeps the
//! result next to the metadata the rest of the kernel needs (validity extent,
//! unit, meters per unit, axis orientation).
//!
//! # Lifecycle
//!
//! A [`CrsRegistry`] is built once at start-up and then only read. Share it
//! by reference or wrap it in an `Arc`; there is no global instance.
//!
//! ```ignore
//! use mapcore::crs::CrsRegistry;
//!
//! let registry = CrsRegistry::with_default_catalogue()?;
//! let lambert = registry.resolve("IGNF:LAMB93")?;
//! assert!(registry.equivalent("EPSG:2154", "IGNF:LAMB93"));
//! let xy = registry.transform("EPSG:4326", "EPSG:2154", &[2.35, 48.85])?;
//! ```

pub mod catalogue;
mod code;
mod registry;

pub use catalogue::{default_definitions, GEOGRAPHIC, WEB_MERCATOR};
pub use code::normalize_code;
pub use registry::{Crs, CrsRef, CrsRegistry, Transformer};

use std::fmt;
use std::str::FromStr;

use crate::geometry::Extent;

/// Meters per degree on the 6 370 997 m reference sphere used by
/// web-map scale computations.
pub const METERS_PER_DEGREE: f64 = 2.0 * std::f64::consts::PI * 6_370_997.0 / 360.0;

/// Native unit of a coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    Degrees,
    Meters,
}

impl Units {
    /// Default meters-per-unit factor when a definition does not set one.
    pub fn default_meters_per_unit(&self) -> f64 {
        match self {
            Units::Degrees => METERS_PER_DEGREE,
            Units::Meters => 1.0,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Degrees => write!(f, "degrees"),
            Units::Meters => write!(f, "meters"),
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "degrees" | "degree" | "deg" => Ok(Units::Degrees),
            "meters" | "meter" | "metres" | "m" => Ok(Units::Meters),
            other => Err(format!("unknown unit '{}'", other)),
        }
    }
}

/// Static description of a coordinate system and all of its alias codes.
#[derive(Debug, Clone, PartialEq)]
pub struct CrsDefinition {
    /// Alias codes; the first one is the canonical code.
    pub codes: Vec<String>,

    /// proj4 definition string.
    pub proj4: String,

    /// Validity extent in native units.
    pub extent: Extent,

    /// Native unit.
    pub units: Units,

    /// Explicit meters-per-unit factor.
    pub meters_per_unit: Option<f64>,

    /// Axis orientation tag (e.g. "enu", "neu").
    pub axis_orientation: Option<String>,
}

impl CrsDefinition {
    /// Create a definition without meters-per-unit or axis overrides.
    pub fn new(codes: &[&str], proj4: &str, extent: Extent, units: Units) -> Self {
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            proj4: proj4.to_string(),
            extent,
            units,
            meters_per_unit: None,
            axis_orientation: None,
        }
    }

    /// Set the meters-per-unit factor.
    pub fn with_meters_per_unit(mut self, meters_per_unit: f64) -> Self {
        self.meters_per_unit = Some(meters_per_unit);
        self
    }

    /// Set the axis orientation tag.
    pub fn with_axis_orientation(mut self, axis: impl Into<String>) -> Self {
        self.axis_orientation = Some(axis.into());
        self
    }

    /// The canonical code, or `None` for a definition without codes.
    pub fn canonical_code(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_parse() {
        assert_eq!("degrees".parse::<Units>(), Ok(Units::Degrees));
        assert_eq!("Metres".parse::<Units>(), Ok(Units::Meters));
        assert!("feet".parse::<Units>().is_err());
    }

    #[test]
    fn test_meters_per_degree() {
        assert!((METERS_PER_DEGREE - 111_194.874_28).abs() < 1e-3);
        assert_eq!(Units::Meters.default_meters_per_unit(), 1.0);
    }

    #[test]
    fn test_definition_builder() {
        let def = CrsDefinition::new(&["EPSG:1", "ALIAS:1"], "+proj=longlat", [0.0; 4], Units::Degrees)
            .with_meters_per_unit(2.0)
            .with_axis_orientation("neu");
        assert_eq!(def.canonical_code(), Some("EPSG:1"));
        assert_eq!(def.meters_per_unit, Some(2.0));
        assert_eq!(def.axis_orientation.as_deref(), Some("neu"));
    }
}
