//! Helpers shared across CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use mapcore::extent::parse_extent;
use mapcore::geojson::FeatureCollection;
use mapcore::Extent;

use crate::error::CliError;

/// Path that stands for stdin or stdout.
const STDIO_PATH: &str = "-";

/// clap value parser for `min_x,min_y,max_x,max_y`.
pub fn extent_arg(text: &str) -> Result<Extent, String> {
    parse_extent(text)
}

/// Read a feature collection from `path`, or stdin for `-`.
pub fn read_collection(path: &Path) -> Result<FeatureCollection, CliError> {
    let text = if path == Path::new(STDIO_PATH) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::file_read(path, e))?;
        text
    } else {
        fs::read_to_string(path).map_err(|e| CliError::file_read(path, e))?
    };

    serde_json::from_str(&text).map_err(|e| CliError::InvalidInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write a feature collection as JSON to `output`, or stdout when `None`.
pub fn write_collection(
    collection: &FeatureCollection,
    output: Option<&PathBuf>,
    pretty: bool,
) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(collection)
    } else {
        serde_json::to_string(collection)
    }
    .map_err(|e| {
        CliError::file_write(
            output.map_or(Path::new(STDIO_PATH), PathBuf::as_path),
            io::Error::other(e),
        )
    })?;

    match output {
        Some(path) if path.as_path() != Path::new(STDIO_PATH) => {
            fs::write(path, json + "\n").map_err(|e| CliError::file_write(path, e))
        }
        _ => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)
                .map_err(|e| CliError::file_write(Path::new(STDIO_PATH), e))
        }
    }
}

/// Format an extent the way `extent_arg` parses it.
pub fn format_extent(extent: &Extent) -> String {
    extent
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
