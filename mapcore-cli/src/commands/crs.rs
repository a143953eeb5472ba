//! `crs list` and `crs show`.

use clap::Subcommand;
use mapcore::crs::Crs;
use mapcore::CrsRegistry;

use super::common::format_extent;
use crate::error::CliError;

/// CRS subcommands.
#[derive(Debug, Subcommand)]
pub enum CrsCommands {
    /// List registered codes
    List,

    /// Show the metadata of one code
    Show {
        /// CRS code (e.g., EPSG:2154 or urn:ogc:def:crs:EPSG::2154)
        code: String,
    },
}

/// Run a CRS subcommand.
pub fn run(command: CrsCommands, registry: &CrsRegistry) -> Result<(), CliError> {
    match command {
        CrsCommands::List => {
            for line in list_lines(registry)? {
                println!("{}", line);
            }
            Ok(())
        }
        CrsCommands::Show { code } => {
            let crs = registry.resolve(&code)?;
            print!("{}", describe(crs));
            Ok(())
        }
    }
}

/// One line per code: the code, its units and, for aliases, the canonical code.
fn list_lines(registry: &CrsRegistry) -> Result<Vec<String>, CliError> {
    registry
        .codes()
        .into_iter()
        .map(|code| {
            let crs = registry.resolve(code)?;
            let line = if crs.canonical_code() == code {
                format!("{:<24} {}", code, crs.units())
            } else {
                format!("{:<24} {:<8} -> {}", code, crs.units(), crs.canonical_code())
            };
            Ok(line)
        })
        .collect()
}

fn describe(crs: &Crs) -> String {
    format!(
        "Code:             {}\n\
         Canonical code:   {}\n\
         Units:            {}\n\
         Meters per unit:  {}\n\
         Axis orientation: {}\n\
         Validity extent:  {}\n",
        crs.code(),
        crs.canonical_code(),
        crs.units(),
        crs.meters_per_unit(),
        crs.axis_orientation().unwrap_or("(not set)"),
        format_extent(&crs.extent()),
    )
}
