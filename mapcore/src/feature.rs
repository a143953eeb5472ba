//! Features: a geometry plus properties and an identifier.

use std::sync::Arc;

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::geometry::{Geometry, Properties};

/// Prefix of generated feature identifiers.
pub const GENERATED_ID_PREFIX: &str = "feature_";

const GENERATED_ID_SUFFIX_LEN: usize = 12;

/// A geometry with a property map and an identifier.
///
/// The property map is reference-counted: features decoded from the same
/// tiled source share one map instead of copying it.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub geometry: Option<Geometry>,
    pub properties: Arc<Properties>,
}

impl Feature {
    /// Create a feature with a generated identifier and no properties.
    pub fn new(geometry: Option<Geometry>) -> Self {
        Self {
            id: generate_id(),
            geometry,
            properties: Arc::new(Properties::new()),
        }
    }

    /// Replace the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Replace the property map.
    pub fn with_properties(mut self, properties: Arc<Properties>) -> Self {
        self.properties = properties;
        self
    }
}

/// Generate a feature identifier: [`GENERATED_ID_PREFIX`] plus a random
/// alphanumeric suffix.
pub fn generate_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", GENERATED_ID_PREFIX, suffix)
}
