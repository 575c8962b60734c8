//! Error taxonomy (spec.md §7). `detect` and `apply` never fail; only the
//! georeferencing entry points (`fit`, `scale`) return `Result`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("affine fit requires at least 3 tie points, got {found}")]
    InsufficientPoints { found: usize },

    #[error("tie points are collinear or otherwise rank-deficient in pixel space")]
    CollinearPoints,

    #[error("geo coordinate out of range: lat={lat}, lon={lon}")]
    InvalidGeoRange { lat: f64, lon: f64 },
}
