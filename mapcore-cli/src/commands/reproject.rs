//! `reproject`: rewrite a GeoJSON file into another CRS.

use std::path::PathBuf;

use clap::Args;
use mapcore::crs::GEOGRAPHIC;
use mapcore::geojson::reproject_collection;
use mapcore::CrsRegistry;
use tracing::info;

use super::common::{read_collection, write_collection};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ReprojectArgs {
    /// GeoJSON FeatureCollection to read ('-' for stdin)
    pub input: PathBuf,

    /// CRS of the input coordinates
    #[arg(long)]
    pub from: String,

    /// Target CRS
    #[arg(long, default_value = GEOGRAPHIC)]
    pub to: String,

    /// Output file (stdout if omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: ReprojectArgs, registry: &CrsRegistry) -> Result<(), CliError> {
    let collection = read_collection(&args.input)?;
    let reprojected = reproject_collection(registry, &collection, &args.from, &args.to)?;
    info!(
        features = reprojected.features.len(),
        from = %args.from,
        to = %args.to,
        "Reprojected feature collection"
    );
    write_collection(&reprojected, args.output.as_ref(), args.pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapcore::geojson::FeatureCollection;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn args(input: PathBuf, from: &str, output: PathBuf) -> ReprojectArgs {
        ReprojectArgs {
            input,
            from: from.to_string(),
            to: GEOGRAPHIC.to_string(),
            output: Some(output),
            pretty: false,
        }
    }

    #[test]
    fn test_reproject_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.geojson");
        let output = temp.path().join("out.geojson");
        let document = json!({
            "type": "FeatureCollection",
            "name": "origin",
            "bbox": [0.0, 0.0, 0.0, 0.0],
            "features": [{
                "type": "Feature",
                "properties": { "kind": "origin" },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }]
        });
        fs::write(&input, document.to_string()).unwrap();

        let registry = CrsRegistry::with_default_catalogue().unwrap();
        run(args(input, "EPSG:3857", output.clone()), &registry).unwrap();

        let out: FeatureCollection =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(out.extra["name"], json!("origin"));
        assert!(!out.extra.contains_key("bbox"));
        let coords = &out.features[0].geometry.as_ref().unwrap().coordinates;
        assert!(coords[0].as_f64().unwrap().abs() < 1e-9);
        assert!(coords[1].as_f64().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_unknown_crs_fails() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in.geojson");
        let output = temp.path().join("out.geojson");
        fs::write(&input, r#"{"type":"FeatureCollection","features":[]}"#).unwrap();

        let registry = CrsRegistry::with_default_catalogue().unwrap();
        let err = run(args(input, "EPSG:0", output.clone()), &registry).unwrap_err();
        assert!(matches!(err, CliError::Geo(_)));
        assert!(!output.exists());
    }
}
