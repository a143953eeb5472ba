//! `extent` and `transform-extent`.

use std::path::PathBuf;

use clap::Args;
use mapcore::extent::transform_extent_with_stops;
use mapcore::geojson::{reproject_features, to_feature, FeatureCollection};
use mapcore::{extent_of, CrsRegistry, Extent, Feature, GeoResult};

use super::common::{extent_arg, format_extent, read_collection};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ExtentArgs {
    /// GeoJSON FeatureCollection to read ('-' for stdin)
    pub input: PathBuf,

    /// CRS the extent is reported in
    #[arg(long)]
    pub crs: String,

    /// CRS of the input coordinates, when it differs from --crs
    #[arg(long)]
    pub data_crs: Option<String>,
}

#[derive(Debug, Args)]
pub struct TransformExtentArgs {
    /// Extent as min_x,min_y,max_x,max_y
    #[arg(long, value_parser = extent_arg, allow_hyphen_values = true)]
    pub extent: Extent,

    /// Source CRS
    #[arg(long)]
    pub from: String,

    /// Target CRS
    #[arg(long)]
    pub to: String,

    /// Extra samples per edge, for projections that bend straight lines
    #[arg(long, default_value = "0")]
    pub stops: usize,
}

pub fn run(args: ExtentArgs, registry: &CrsRegistry) -> Result<(), CliError> {
    let collection = read_collection(&args.input)?;
    match collection_extent(registry, &collection, &args.crs, args.data_crs.as_deref())? {
        Some(extent) => println!("{}", format_extent(&extent)),
        None => println!("(empty)"),
    }
    Ok(())
}

pub fn run_transform(args: TransformExtentArgs, registry: &CrsRegistry) -> Result<(), CliError> {
    let extent =
        transform_extent_with_stops(registry, &args.extent, args.from.as_str(), args.to.as_str(), args.stops)?;
    println!("{}", format_extent(&extent));
    Ok(())
}

/// Extent of every feature in the collection, in `crs`.
fn collection_extent(
    registry: &CrsRegistry,
    collection: &FeatureCollection,
    crs: &str,
    data_crs: Option<&str>,
) -> GeoResult<Option<Extent>> {
    let features = match data_crs {
        Some(data_crs) => reproject_features(registry, &collection.features, data_crs, crs)?,
        None => collection.features.clone(),
    };
    let typed = features
        .iter()
        .map(to_feature)
        .collect::<GeoResult<Vec<Feature>>>()?;
    extent_of(registry, &typed, crs)
}
