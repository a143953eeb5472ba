//! Error types for geometry and projection operations.

use thiserror::Error;

/// Result type for kernel operations.
pub type GeoResult<T> = Result<T, GeoError>;

/// Errors that can occur while resolving CRS codes, transforming coordinates
/// or decoding geometry encodings.
///
/// Unsupported geometry tags and empty feature sets are not errors; those
/// operations return `None` instead.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The CRS code is not registered.
    #[error("Unknown projection: {0}")]
    UnknownProjection(String),

    /// A tiled geometry's boundary arrays do not fit its coordinate buffer.
    #[error("Malformed geometry encoding: {reason}")]
    MalformedGeometryEncoding { reason: String },

    /// A CRS definition string could not be parsed by the transform engine.
    #[error("Invalid definition for {code}: {reason}")]
    InvalidDefinition { code: String, reason: String },

    /// The transform engine rejected a coordinate.
    #[error("Transform from {src} to {tgt} failed: {reason}")]
    Transform {
        src: String,
        tgt: String,
        reason: String,
    },

    /// A GeoJSON coordinate payload does not match its geometry type.
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),
}

impl GeoError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        GeoError::MalformedGeometryEncoding {
            reason: reason.into(),
        }
    }
}
