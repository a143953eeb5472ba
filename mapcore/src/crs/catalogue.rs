//! Compiled CRS catalogue.
//!
//! Each entry lists every alias code the web-map plugins accept for a
//! coordinate system. Extents are the projected bounds of the area of use.

use super::{CrsDefinition, Units};

/// Canonical geographic CRS used by GeoJSON output.
pub const GEOGRAPHIC: &str = "EPSG:4326";

/// Web Mercator, the default map CRS.
pub const WEB_MERCATOR: &str = "EPSG:3857";

/// Half the equatorial circumference of the WGS 84 sphere used by Web Mercator.
pub const WEB_MERCATOR_HALF_WORLD: f64 = 20_037_508.342_789_244;

/// Returns the default set of CRS definitions.
pub fn default_definitions() -> Vec<CrsDefinition> {
    vec![
        CrsDefinition::new(
            &["EPSG:4326", "CRS:84", "IGNF:WGS84G", "WGS84"],
            "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs",
            [-180.0, -90.0, 180.0, 90.0],
            Units::Degrees,
        )
        .with_axis_orientation("enu"),
        CrsDefinition::new(
            &[
                "EPSG:3857",
                "EPSG:900913",
                "EPSG:102100",
                "EPSG:102113",
                "GOOGLE",
            ],
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 +x_0=0.0 +y_0=0 +k=1.0 +units=m +nadgrids=@null +no_defs",
            [
                -WEB_MERCATOR_HALF_WORLD,
                -WEB_MERCATOR_HALF_WORLD,
                WEB_MERCATOR_HALF_WORLD,
                WEB_MERCATOR_HALF_WORLD,
            ],
            Units::Meters,
        )
        .with_meters_per_unit(1.0),
        CrsDefinition::new(
            &["EPSG:4171", "IGNF:RGF93G"],
            "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs",
            [-9.86, 41.15, 10.38, 51.56],
            Units::Degrees,
        )
        .with_axis_orientation("enu"),
        CrsDefinition::new(
            &["EPSG:2154", "IGNF:LAMB93"],
            "+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 +x_0=700000 +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
            [-378_305.81, 6_093_283.21, 1_212_610.74, 7_186_901.68],
            Units::Meters,
        )
        .with_meters_per_unit(1.0),
        CrsDefinition::new(
            &["EPSG:27572", "IGNF:LAMBE"],
            "+proj=lcc +lat_1=46.8 +lat_0=46.8 +lon_0=2.337229166667 +k=0.99987742 +x_0=600000 +y_0=2200000 +a=6378249.2 +b=6356515 +towgs84=-168,-60,320,0,0,0,0 +units=m +no_defs",
            [-102_919.04, 1_636_227.23, 1_189_862.68, 2_687_651.36],
            Units::Meters,
        )
        .with_meters_per_unit(1.0),
        CrsDefinition::new(
            &["EPSG:32620", "IGNF:UTM20W84GUAD"],
            "+proj=utm +zone=20 +datum=WGS84 +units=m +no_defs",
            [166_021.44, 0.0, 833_978.56, 9_329_005.18],
            Units::Meters,
        )
        .with_meters_per_unit(1.0),
        CrsDefinition::new(
            &["EPSG:32622", "IGNF:UTM22RGFG95"],
            "+proj=utm +zone=22 +datum=WGS84 +units=m +no_defs",
            [166_021.44, 0.0, 833_978.56, 9_329_005.18],
            Units::Meters,
        )
        .with_meters_per_unit(1.0),
        CrsDefinition::new(
            &["EPSG:32740", "IGNF:RGR92UTM40S"],
            "+proj=utm +zone=40 +south +datum=WGS84 +units=m +no_defs",
            [166_021.44, 1_116_915.04, 833_978.56, 10_000_000.0],
            Units::Meters,
        )
        .with_meters_per_unit(1.0),
    ]
}
