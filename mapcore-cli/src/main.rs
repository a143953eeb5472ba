//! mapcore CLI - Command-line interface
//!
//! Exposes the geometry and projection kernel: CRS lookup, GeoJSON
//! reprojection, extents, centroids, scales and resolution ladders.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mapcore::config::{config_file_path, ConfigFile};
use mapcore::logging::{init_logging, LoggingGuard};
use mapcore::CrsRegistry;
use tracing::debug;

use commands::centroid::CentroidArgs;
use commands::config::ConfigCommands;
use commands::crs::CrsCommands;
use commands::extent::{ExtentArgs, TransformExtentArgs};
use commands::reproject::ReprojectArgs;
use commands::scale::{ResolutionsArgs, ScaleArgs};
use error::CliError;

#[derive(Parser)]
#[command(name = "mapcore")]
#[command(version, about = "Geometry and projection toolkit for web maps", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.mapcore/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect registered coordinate reference systems
    Crs {
        #[command(subcommand)]
        command: CrsCommands,
    },

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Reproject a GeoJSON FeatureCollection
    Reproject(ReprojectArgs),

    /// Bounding extent of a GeoJSON FeatureCollection
    Extent(ExtentArgs),

    /// Transform an extent between two CRSs
    TransformExtent(TransformExtentArgs),

    /// Representative point of each feature in a GeoJSON FeatureCollection
    Centroid(CentroidArgs),

    /// WMTS scale denominator of a viewport
    Scale(ScaleArgs),

    /// Per-zoom resolution ladder of a CRS
    Resolutions(ResolutionsArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);
    let config = ConfigFile::load_from(&config_path)?;
    let _logging_guard = start_logging(&config, cli.verbose)?;
    debug!(path = %config_path.display(), crs_sections = config.crs.len(), "Configuration loaded");

    // built on demand so config commands work even if a configured CRS is broken
    let registry = || -> Result<CrsRegistry, CliError> { Ok(config.build_registry()?) };

    match cli.command {
        Commands::Crs { command } => commands::crs::run(command, &registry()?),
        Commands::Config { command } => commands::config::run(command, &config, &config_path),
        Commands::Reproject(args) => commands::reproject::run(args, &registry()?),
        Commands::Extent(args) => commands::extent::run(args, &registry()?),
        Commands::TransformExtent(args) => commands::extent::run_transform(args, &registry()?),
        Commands::Centroid(args) => commands::centroid::run(args),
        Commands::Scale(args) => commands::scale::run_scale(args, &registry()?),
        Commands::Resolutions(args) => commands::scale::run_resolutions(args, &registry()?),
    }
}

fn start_logging(config: &ConfigFile, verbose: bool) -> Result<LoggingGuard, CliError> {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    init_logging(&config.logging.directory, &config.logging.file, level)
        .map_err(CliError::LoggingInit)
}
