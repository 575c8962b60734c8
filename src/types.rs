//! Core data model (spec.md §3).

use serde::{Deserialize, Serialize};

/// Row-major RGB8 raster. Immutable within a pipeline run.
#[derive(Debug, Clone)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    /// Length must be `width * height * 3`, one `[r, g, b]` triple per pixel.
    pub rgb: Vec<u8>,
    /// DPI the page was rasterized at, when the ingest layer knows it.
    /// `scale()` still takes an explicit `dpi` argument; this is a place
    /// for a caller to carry the true value through instead of guessing.
    pub dpi: Option<u32>,
}

impl Raster {
    pub fn new(width: usize, height: usize, rgb: Vec<u8>) -> Self {
        assert_eq!(
            rgb.len(),
            width * height * 3,
            "rgb buffer length must be width*height*3"
        );
        Self {
            width,
            height,
            rgb,
            dpi: None,
        }
    }

    /// `dpi` if the ingest layer recorded one, else the pipeline default
    /// (spec.md §6 `DPI=300`). A caller computing `scale()`'s explicit `dpi`
    /// argument from a `Raster` should go through this rather than
    /// special-casing `None` itself.
    pub fn effective_dpi(&self) -> f64 {
        self.dpi.map(|d| d as f64).unwrap_or(crate::config::DEFAULT_DPI)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = (y * self.width + x) * 3;
        (self.rgb[i], self.rgb[i + 1], self.rgb[i + 2])
    }
}

/// Pixel-space coordinate, sub-pixel precision allowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// WGS84 geographic coordinate, no elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// User-supplied pixel ↔ geo correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiePoint {
    pub id: String,
    pub pixel: PixelPoint,
    pub geo: GeoPoint,
}

/// Which color window a detection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionKind {
    ThickBorder,
    FilledArea,
}

/// Output of detection: a simplified polygon in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedPolygon {
    pub id: u64,
    /// Ordered vertices, winding not guaranteed CW/CCW, len in [3, 50].
    pub corners: Vec<PixelPoint>,
    pub center: PixelPoint,
    pub kind: DetectionKind,
}

/// Output of georeferencing: a polygon in geographic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoreferencedPolygon {
    pub id: u64,
    pub corners: Vec<GeoPoint>,
    pub center: GeoPoint,
    pub kind: DetectionKind,
}

/// Nominal "1 : N" map scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleResult {
    pub denominator: f64,
}

/// Non-fatal diagnostics emitted alongside a successful georeference (spec.md §4.4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// Max back-projected tie-point residual, in meters, exceeded the threshold.
    HighResidual { tie_point_id: String, meters: f64, threshold_meters: f64 },
    /// A transformed corner fell outside valid WGS84 bounds.
    OutOfGeoRange { lat: f64, lon: f64 },
    /// Tie points cluster in under 30% of the raster's bounding box.
    PoorSpatialSpread { coverage_fraction: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_range_check() {
        assert!(GeoPoint::new(45.0, 90.0).in_range());
        assert!(!GeoPoint::new(91.0, 0.0).in_range());
        assert!(!GeoPoint::new(0.0, 181.0).in_range());
    }

    #[test]
    fn raster_pixel_lookup() {
        let r = Raster::new(2, 1, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(r.pixel(0, 0), (1, 2, 3));
        assert_eq!(r.pixel(1, 0), (4, 5, 6));
    }

    #[test]
    fn effective_dpi_falls_back_to_default_when_unknown() {
        let r = Raster::new(1, 1, vec![0, 0, 0]);
        assert_eq!(r.effective_dpi(), crate::config::DEFAULT_DPI);
    }

    #[test]
    fn effective_dpi_prefers_raster_value_when_known() {
        let mut r = Raster::new(1, 1, vec![0, 0, 0]);
        r.dpi = Some(600);
        assert_eq!(r.effective_dpi(), 600.0);
    }
}
