//! Scale estimation (spec.md §4.4.3): haversine ground distance vs. paper
//! distance implied by DPI, median of pairwise ratios.

use crate::error::GeoError;
use crate::types::{GeoPoint, PixelPoint, ScaleResult, TiePoint};

pub const EARTH_RADIUS_M: f64 = 6_371_008.8;
const METERS_PER_INCH: f64 = 0.0254;

pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

fn pixel_distance(a: PixelPoint, b: PixelPoint) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Per-pair ground-to-paper scale ratios, one per unordered tie-point pair.
fn pairwise_scale_ratios(tie_points: &[TiePoint], dpi: f64) -> Vec<f64> {
    let mut ratios = Vec::new();
    for i in 0..tie_points.len() {
        for j in (i + 1)..tie_points.len() {
            let dp = pixel_distance(tie_points[i].pixel, tie_points[j].pixel);
            if dp <= 0.0 {
                continue;
            }
            let dg = haversine_meters(tie_points[i].geo, tie_points[j].geo);
            let d_paper_m = dp * METERS_PER_INCH / dpi;
            if d_paper_m <= 0.0 {
                continue;
            }
            ratios.push(dg / d_paper_m);
        }
    }
    ratios
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = values.len();
    Some(if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    })
}

/// Estimates the nominal "1 : N" map scale denominator from tie-point geometry.
pub fn scale(tie_points: &[TiePoint], dpi: f64) -> Result<ScaleResult, GeoError> {
    let n = tie_points.len();
    if n < 3 {
        return Err(GeoError::InsufficientPoints { found: n });
    }

    let ratios = pairwise_scale_ratios(tie_points, dpi);
    let denominator = median(ratios).unwrap_or(0.0);
    Ok(ScaleResult { denominator })
}
