//! `centroid`: representative point of every feature.

use std::path::PathBuf;

use clap::Args;
use mapcore::geojson::{to_feature, FeatureCollection};
use mapcore::{centroid, GeoResult};

use super::common::read_collection;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct CentroidArgs {
    /// GeoJSON FeatureCollection to read ('-' for stdin)
    pub input: PathBuf,
}

pub fn run(args: CentroidArgs) -> Result<(), CliError> {
    let collection = read_collection(&args.input)?;
    for line in centroid_lines(&collection)? {
        println!("{}", line);
    }
    Ok(())
}

/// `id<TAB>x,y` per feature, or `id<TAB>-` for features without coordinates.
fn centroid_lines(collection: &FeatureCollection) -> GeoResult<Vec<String>> {
    collection
        .features
        .iter()
        .map(|feature| {
            let feature = to_feature(feature)?;
            let point = centroid(feature.geometry.as_ref())
                .map(|c| c.iter().map(f64::to_string).collect::<Vec<_>>().join(","))
                .unwrap_or_else(|| "-".to_string());
            Ok(format!("{}\t{}", feature.id, point))
        })
        .collect()
}
