//! `scale` and `resolutions`.

use clap::Args;
use mapcore::resolution::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use mapcore::scale::resolution_to_scale;
use mapcore::{generate_resolutions, wmts_scale, CrsRegistry, Extent};

use super::common::extent_arg;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ScaleArgs {
    /// Viewport width in pixels
    #[arg(long)]
    pub width: f64,

    /// Visible extent as min_x,min_y,max_x,max_y
    #[arg(long, value_parser = extent_arg, allow_hyphen_values = true)]
    pub extent: Extent,

    /// CRS of the extent
    #[arg(long)]
    pub crs: String,

    /// Print the unrounded scale
    #[arg(long)]
    pub exact: bool,
}

#[derive(Debug, Args)]
pub struct ResolutionsArgs {
    /// CRS to build the ladder for
    #[arg(long)]
    pub crs: String,

    /// Extent shown at the first level (defaults to the CRS validity extent)
    #[arg(long, value_parser = extent_arg, allow_hyphen_values = true)]
    pub extent: Option<Extent>,

    #[arg(long, default_value_t = DEFAULT_MIN_ZOOM)]
    pub min_zoom: u8,

    #[arg(long, default_value_t = DEFAULT_MAX_ZOOM)]
    pub max_zoom: u8,
}

pub fn run_scale(args: ScaleArgs, registry: &CrsRegistry) -> Result<(), CliError> {
    let crs = registry.resolve(&args.crs)?;
    let scale = wmts_scale(args.width, args.extent, crs.meters_per_unit(), args.exact);
    println!("1:{}", scale);
    Ok(())
}

pub fn run_resolutions(args: ResolutionsArgs, registry: &CrsRegistry) -> Result<(), CliError> {
    for line in ladder_lines(registry, &args)? {
        println!("{}", line);
    }
    Ok(())
}

/// One line per level: zoom, resolution, scale denominator.
fn ladder_lines(registry: &CrsRegistry, args: &ResolutionsArgs) -> Result<Vec<String>, CliError> {
    let crs = registry.resolve(&args.crs)?;
    let ladder = generate_resolutions(crs, args.extent, Some(args.min_zoom), Some(args.max_zoom));
    Ok(ladder
        .iter()
        .enumerate()
        .map(|(i, resolution)| {
            let zoom = usize::from(args.min_zoom) + i;
            let scale = resolution_to_scale(*resolution, crs.meters_per_unit());
            format!("{:>3}  {:<24}  1:{:.0}", zoom, resolution, scale)
        })
        .collect())
}
