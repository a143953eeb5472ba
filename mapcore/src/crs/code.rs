//! CRS code normalization.
//!
//! Map services spell the same code several ways: `EPSG:4326`,
//! `epsg:4326`, `urn:ogc:def:crs:EPSG::4326` or
//! `http://www.opengis.net/def/crs/EPSG/0/4326`. The registry stores the
//! short `AUTHORITY:CODE` form and falls back to it on lookup misses.

use std::sync::OnceLock;

use regex::Regex;

fn urn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i:urn:ogc:def:crs):([A-Za-z]+):[^:]*:([A-Za-z0-9_.]+)$")
            .expect("URN pattern is valid")
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i:https?://www\.opengis\.net/def/crs)/([A-Za-z]+)/[^/]+/([A-Za-z0-9_.]+)$")
            .expect("URL pattern is valid")
    })
}

fn short_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+):([A-Za-z0-9_.]+)$").expect("short pattern is valid")
    })
}

/// Rewrites a CRS code into its `AUTHORITY:CODE` form.
///
/// Returns `None` when the input matches none of the known spellings.
pub fn normalize_code(code: &str) -> Option<String> {
    let code = code.trim();
    [urn_pattern(), url_pattern(), short_pattern()]
        .iter()
        .find_map(|pattern| pattern.captures(code))
        .map(|caps| format!("{}:{}", caps[1].to_uppercase(), &caps[2]))
}
