//! CLI error handling with user-friendly messages.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use mapcore::config::ConfigFileError;
use mapcore::GeoError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(io::Error),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Kernel operation failed
    Geo(GeoError),
    /// Input file could not be read
    FileRead { path: PathBuf, error: io::Error },
    /// Output file could not be written
    FileWrite { path: PathBuf, error: io::Error },
    /// Input is not a GeoJSON feature collection
    InvalidInput { path: PathBuf, reason: String },
}

impl CliError {
    pub fn file_read(path: &Path, error: io::Error) -> Self {
        CliError::FileRead {
            path: path.to_path_buf(),
            error,
        }
    }

    pub fn file_write(path: &Path, error: io::Error) -> Self {
        CliError::FileWrite {
            path: path.to_path_buf(),
            error,
        }
    }

    /// Print the error and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Geo(GeoError::UnknownProjection(_)) => {
                eprintln!();
                eprintln!("Use 'mapcore crs list' to see registered codes, or add a");
                eprintln!("[crs \"CODE\"] section to the configuration file.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or pass another file with --config",
                    mapcore::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Geo(e) => write!(f, "{}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read '{}': {}", path.display(), error)
            }
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write '{}': {}", path.display(), error)
            }
            CliError::InvalidInput { path, reason } => {
                write!(f, "Invalid GeoJSON in '{}': {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Geo(e) => Some(e),
            CliError::FileRead { error, .. } | CliError::FileWrite { error, .. } => Some(error),
            CliError::InvalidInput { .. } => None,
        }
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        CliError::Geo(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_geo_error_converts() {
        let err: CliError = GeoError::UnknownProjection("EPSG:1".to_string()).into();
        assert_eq!(err.to_string(), "Unknown projection: EPSG:1");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_file_errors_name_path() {
        let err = CliError::file_read(
            Path::new("in.geojson"),
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("in.geojson"));
    }
}
