//! Georeferencer: apply the fitted affine to detected polygons and compute
//! the non-fatal warnings of spec.md §4.4.4.

use crate::affine::Affine2D;
use crate::polygon::BBox;
use crate::scale::haversine_meters;
use crate::types::{DetectedPolygon, GeoPoint, GeoreferencedPolygon, PixelPoint, TiePoint, Warning};

/// Applies `affine` to every corner and center of `polygons`. Never fails —
/// out-of-range results are reported as warnings elsewhere, not clamped.
pub fn apply(affine: &Affine2D, polygons: &[DetectedPolygon]) -> Vec<GeoreferencedPolygon> {
    polygons
        .iter()
        .map(|poly| {
            let corners = poly.corners.iter().map(|&p| to_geo(affine, p)).collect();
            let center = to_geo(affine, poly.center);
            GeoreferencedPolygon { id: poly.id, corners, center, kind: poly.kind }
        })
        .collect()
}

fn to_geo(affine: &Affine2D, p: PixelPoint) -> GeoPoint {
    let (lon, lat) = affine.transform(p);
    GeoPoint::new(lat, lon)
}

/// Residual threshold as a fraction of the median pairwise ground distance,
/// used when the caller doesn't supply an explicit one (spec.md §4.4.4).
pub const DEFAULT_RESIDUAL_FRACTION: f64 = 0.10;
/// Minimum fraction of the raster's bounding box tie points must spread
/// across before the "poor spatial spread" warning is suppressed.
pub const MIN_SPATIAL_SPREAD_FRACTION: f64 = 0.30;

/// Computes the spec.md §4.4.4 warnings for a fit applied against the tie
/// points that produced it. Takes the raster dimensions for the spatial
/// spread check.
pub fn warnings_for_fit(
    affine: &Affine2D,
    tie_points: &[TiePoint],
    raster_w: f64,
    raster_h: f64,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if tie_points.is_empty() {
        return warnings;
    }

    // Residual: back-project each tie point's geo coords and compare the
    // forward-transformed pixel position against ground-truth geo via
    // haversine distance in meters.
    let transformed: Vec<GeoPoint> = tie_points.iter().map(|tp| to_geo(affine, tp.pixel)).collect();

    let pairwise_ground: Vec<f64> = {
        let mut v = Vec::new();
        for i in 0..tie_points.len() {
            for j in (i + 1)..tie_points.len() {
                v.push(haversine_meters(tie_points[i].geo, tie_points[j].geo));
            }
        }
        v
    };
    let median_ground = median(pairwise_ground).unwrap_or(0.0);
    let threshold = median_ground * DEFAULT_RESIDUAL_FRACTION;

    if threshold > 0.0 {
        for (tp, predicted) in tie_points.iter().zip(transformed.iter()) {
            let residual = haversine_meters(tp.geo, *predicted);
            if residual > threshold {
                warnings.push(Warning::HighResidual {
                    tie_point_id: tp.id.clone(),
                    meters: residual,
                    threshold_meters: threshold,
                });
            }
        }
    }

    for predicted in &transformed {
        if !predicted.in_range() {
            warnings.push(Warning::OutOfGeoRange { lat: predicted.lat, lon: predicted.lon });
        }
    }

    if raster_w > 0.0 && raster_h > 0.0 {
        let pixels: Vec<PixelPoint> = tie_points.iter().map(|tp| tp.pixel).collect();
        let bbox = BBox::of(&pixels);
        let coverage_w = (bbox.max_x - bbox.min_x).max(0.0) / raster_w;
        let coverage_h = (bbox.max_y - bbox.min_y).max(0.0) / raster_h;
        let coverage_fraction = coverage_w * coverage_h;
        if coverage_fraction < MIN_SPATIAL_SPREAD_FRACTION {
            warnings.push(Warning::PoorSpatialSpread { coverage_fraction });
        }
    }

    for w in &warnings {
        log::warn!("georeference warning: {w:?}");
    }

    warnings
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = values.len();
    Some(if n % 2 == 1 { values[n / 2] } else { (values[n / 2 - 1] + values[n / 2]) / 2.0 })
}
