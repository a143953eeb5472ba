//! CLI command implementations.

pub mod centroid;
pub mod common;
pub mod config;
pub mod crs;
pub mod extent;
pub mod reproject;
pub mod scale;
