//! Resolution ladders for tiled map views.

use crate::crs::Crs;
use crate::extent::width;
use crate::geometry::Extent;

/// Tile edge length in pixels.
pub const TILE_SIZE: f64 = 256.0;

pub const DEFAULT_MIN_ZOOM: u8 = 0;
pub const DEFAULT_MAX_ZOOM: u8 = 20;

/// Build the per-zoom resolution ladder (map units per pixel) for a CRS.
///
/// Zoom 0 shows `extent` (the CRS validity extent when `None`) in a single
/// tile; each following level halves the resolution. The ladder has
/// `max_zoom - min_zoom` entries, strictly decreasing, and is empty when
/// `max_zoom <= min_zoom`.
pub fn generate_resolutions(
    crs: &Crs,
    extent: Option<Extent>,
    min_zoom: Option<u8>,
    max_zoom: Option<u8>,
) -> Vec<f64> {
    let extent = extent.unwrap_or_else(|| crs.extent());
    let min_zoom = min_zoom.unwrap_or(DEFAULT_MIN_ZOOM);
    let max_zoom = max_zoom.unwrap_or(DEFAULT_MAX_ZOOM);
    resolutions_for_width(width(&extent), max_zoom.saturating_sub(min_zoom))
}

/// `levels` resolutions starting from `extent_width / TILE_SIZE`.
pub fn resolutions_for_width(extent_width: f64, levels: u8) -> Vec<f64> {
    let base = extent_width / TILE_SIZE;
    (0..levels)
        .map(|i| base / 2f64.powi(i32::from(i)))
        .collect()
}

/// Index of the finest resolution that is still at least `target`.
///
/// Clamps to the first level when `target` is coarser than the whole ladder
/// and to the last level when it is finer. `None` for an empty ladder.
pub fn closest_zoom(resolutions: &[f64], target: f64) -> Option<usize> {
    if resolutions.is_empty() {
        return None;
    }
    let finer = resolutions.iter().take_while(|&&r| r >= target).count();
    Some(finer.saturating_sub(1))
}
