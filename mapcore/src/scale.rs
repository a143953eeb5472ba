//! Map scale denominators in the WMTS convention.

use crate::extent::width;
use crate::geometry::Extent;

/// Physical size of one screen pixel in millimetres (OGC WMTS "standardized
/// rendering pixel").
pub const PIXEL_SIZE_MM: f64 = 0.28;

/// Raw scales at or below this are rounded to the nearest thousand, above
/// it to the nearest million.
const THOUSANDS_BAND_MAX: f64 = 950_000.0;

/// Scale denominator for a viewport `viewport_px_width` pixels wide showing
/// `projected_extent`.
///
/// Unless `exact`, the value is rounded for display: to the nearest unit below
/// 1 000, to the nearest thousand up to 950 000, to the nearest million above.
/// The result is always truncated to an integer.
pub fn wmts_scale(
    viewport_px_width: f64,
    projected_extent: Extent,
    meters_per_unit: f64,
    exact: bool,
) -> i64 {
    let span = width(&projected_extent);
    let raw = (meters_per_unit * span / viewport_px_width) * 1000.0 / PIXEL_SIZE_MM;
    let scale = if exact { raw } else { round_for_display(raw) };
    scale.trunc() as i64
}

fn round_for_display(raw: f64) -> f64 {
    let step = if raw < 1000.0 {
        1.0
    } else if raw <= THOUSANDS_BAND_MAX {
        1000.0
    } else {
        1_000_000.0
    };
    (raw / step).round() * step
}

/// Scale denominator of a resolution expressed in map units per pixel.
pub fn resolution_to_scale(resolution: f64, meters_per_unit: f64) -> f64 {
    resolution * meters_per_unit * 1000.0 / PIXEL_SIZE_MM
}

/// Map units per pixel for a scale denominator. Inverse of
/// [`resolution_to_scale`].
pub fn scale_to_resolution(scale: f64, meters_per_unit: f64) -> f64 {
    scale * PIXEL_SIZE_MM / 1000.0 / meters_per_unit
}
