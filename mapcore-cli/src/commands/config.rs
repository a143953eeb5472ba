//! Configuration CLI commands.
//!
//! Provides `config show` and `config path` for inspecting the effective
//! configuration from the command line.

use std::path::Path;

use clap::Subcommand;
use mapcore::config::ConfigFile;

use super::common::format_extent;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config: &ConfigFile, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            print!("{}", render(config));
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Render the configuration in its INI layout.
fn render(config: &ConfigFile) -> String {
    let mut out = String::new();
    out.push_str("[logging]\n");
    out.push_str(&format!("level = {}\n", config.logging.level));
    out.push_str(&format!("directory = {}\n", config.logging.directory.display()));
    out.push_str(&format!("file = {}\n", config.logging.file));

    for def in &config.crs {
        let Some((code, aliases)) = def.codes.split_first() else {
            continue;
        };
        out.push_str(&format!("\n[crs \"{}\"]\n", code));
        if !aliases.is_empty() {
            out.push_str(&format!("aliases = {}\n", aliases.join(", ")));
        }
        out.push_str(&format!("proj4 = {}\n", def.proj4));
        out.push_str(&format!("extent = {}\n", format_extent(&def.extent)));
        out.push_str(&format!("units = {}\n", def.units));
        if let Some(mpu) = def.meters_per_unit {
            out.push_str(&format!("meters_per_unit = {}\n", mpu));
        }
        if let Some(axis) = &def.axis_orientation {
            out.push_str(&format!("axis = {}\n", axis));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "[logging]\nlevel = warn\ndirectory = /tmp/logs\nfile = m.log\n\n\
        [crs \"X:1\"]\naliases = ONE, UNO\nproj4 = +proj=longlat +datum=WGS84 +no_defs\n\
        extent = -10,-10,10,10\nunits = degrees\naxis = enu\n";

    #[test]
    fn test_render_parses_back() {
        let config = ConfigFile::parse(TEXT).unwrap();
        let rendered = render(&config);
        assert!(rendered.contains("[crs \"X:1\"]\naliases = ONE, UNO\n"));

        let reparsed = ConfigFile::parse(&rendered).unwrap();
        assert_eq!(reparsed.logging, config.logging);
        assert_eq!(reparsed.crs, config.crs);
    }
}
