//! INI configuration file.
//!
//! Lives at `~/.mapcore/config.ini` by default. A missing file is not an
//! error: every setting has a default and the CRS catalogue works without
//! extra definitions.
//!
//! ```ini
//! [logging]
//! level = info
//! directory = ~/.mapcore/logs
//! file = mapcore.log
//!
//! [crs "EPSG:3035"]
//! aliases = ETRS89-LAEA
//! proj4 = +proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m +no_defs
//! extent = 1896628.62,1507846.05,4662111.45,6829874.45
//! units = meters
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ini::{Ini, Properties as IniSection};
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::crs::{CrsDefinition, CrsRegistry, Units};
use crate::error::GeoResult;
use crate::extent::parse_extent;
use crate::logging::{default_log_dir, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL};

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but could not be read or is not valid INI.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {section}.{key} is required")]
    MissingValue { section: String, key: String },
}

/// `[logging]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            directory: default_log_dir(),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub logging: LoggingSettings,
    /// Definitions from `[crs "CODE"]` sections, in file order.
    pub crs: Vec<CrsDefinition>,
}

impl ConfigFile {
    /// Load from the default path.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, returning defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text).map_err(ini::Error::Parse)?;
        parse_ini(&ini)
    }

    /// Registry holding the built-in catalogue plus the configured definitions.
    ///
    /// # Errors
    ///
    /// `InvalidDefinition` if a configured projection string is rejected.
    pub fn build_registry(&self) -> GeoResult<CrsRegistry> {
        let mut registry = CrsRegistry::with_default_catalogue()?;
        registry.register(self.crs.iter().cloned())?;
        Ok(registry)
    }
}

/// `~/.mapcore`, or `./.mapcore` without a home directory.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mapcore")
}

/// `~/.mapcore/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

fn crs_section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^crs\s+"([^"]+)"$"#).expect("CRS section pattern is valid")
    })
}

fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("level") {
            let v = v.trim().to_lowercase();
            if !VALID_LEVELS.contains(&v.as_str()) {
                return Err(ConfigFileError::InvalidValue {
                    section: "logging".to_string(),
                    key: "level".to_string(),
                    value: v,
                    reason: "must be one of: trace, debug, info, warn, error".to_string(),
                });
            }
            config.logging.level = v;
        }
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    for (name, section) in ini.iter() {
        let Some(code) = name
            .and_then(|name| crs_section_pattern().captures(name.trim()))
            .map(|caps| caps[1].to_string())
        else {
            continue;
        };
        config.crs.push(parse_crs_section(&code, section)?);
    }

    Ok(config)
}

fn parse_crs_section(code: &str, section: &IniSection) -> Result<CrsDefinition, ConfigFileError> {
    let section_name = format!("crs \"{}\"", code);
    let invalid = |key: &str, value: &str, reason: String| ConfigFileError::InvalidValue {
        section: section_name.clone(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };
    let required = |key: &str| {
        section
            .get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigFileError::MissingValue {
                section: section_name.clone(),
                key: key.to_string(),
            })
    };

    let proj4 = required("proj4")?;
    let extent_text = required("extent")?;
    let extent = parse_extent(extent_text).map_err(|e| invalid("extent", extent_text, e))?;
    let units = match section.get("units") {
        Some(v) => v.trim().parse::<Units>().map_err(|e| invalid("units", v, e))?,
        None => Units::Meters,
    };

    let mut codes = vec![code];
    if let Some(aliases) = section.get("aliases") {
        codes.extend(aliases.split(',').map(str::trim).filter(|a| !a.is_empty()));
    }

    let mut definition = CrsDefinition::new(&codes, proj4, extent, units);
    if let Some(v) = section.get("meters_per_unit") {
        let mpu = v
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|mpu| mpu.is_finite() && *mpu > 0.0)
            .ok_or_else(|| invalid("meters_per_unit", v, "must be a positive number".to_string()))?;
        definition = definition.with_meters_per_unit(mpu);
    }
    if let Some(v) = section.get("axis") {
        let v = v.trim();
        if v.len() != 3 || !v.chars().all(|c| "enuwsd".contains(c)) {
            return Err(invalid(
                "axis",
                v,
                "expected three letters from e, n, u, w, s, d".to_string(),
            ));
        }
        definition = definition.with_axis_orientation(v);
    }
    Ok(definition)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
