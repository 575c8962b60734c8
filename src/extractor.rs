//! PolygonExtractor (spec.md §4.2): from a binary mask, enumerate external
//! contours and simplify each to a polygon meeting the quality filters.

use crate::buffer::Mask;
use crate::config::DetectConfig;
use crate::contour::find_external_contours;
use crate::polygon::{area, centroid, compactness, perimeter};
use crate::simplify::simplify_polygon;
use crate::types::{DetectedPolygon, DetectionKind, PixelPoint};

/// Runs the full per-contour pipeline over `mask`, tagging survivors with
/// `kind`. `next_id` is called once per emitted polygon to mint a fresh
/// opaque id, stable and unique within the caller's invocation.
pub fn extract_polygons(
    mask: &Mask,
    kind: DetectionKind,
    config: &DetectConfig,
    next_id: &mut impl FnMut() -> u64,
) -> Vec<DetectedPolygon> {
    let mut out = Vec::new();

    for contour in find_external_contours(mask) {
        let Some(polygon) = extract_one(&contour, config) else {
            continue;
        };
        out.push(DetectedPolygon {
            id: next_id(),
            corners: polygon,
            center: PixelPoint::new(0.0, 0.0), // overwritten below
            kind,
        });
        let last = out.last_mut().unwrap();
        last.center = centroid(&last.corners);
    }

    out
}

/// Filters and simplifies a single raw contour. Returns `None` for the
/// cases spec.md §7 calls `InvalidPolygon` — filtered silently, never surfaced.
fn extract_one(contour: &[PixelPoint], config: &DetectConfig) -> Option<Vec<PixelPoint>> {
    let raw_perimeter = perimeter(contour);
    if raw_perimeter < config.min_perimeter {
        return None;
    }

    let epsilon = config.epsilon_frac * raw_perimeter;
    let simplified = simplify_polygon(contour, epsilon);

    let v = simplified.len();
    if v < config.vmin || v > config.vmax {
        return None;
    }

    let a = area(&simplified);
    if a < config.min_area {
        return None;
    }

    // Compactness reuses `raw_perimeter`, the same P the Pmin filter and the
    // DP epsilon were computed from (spec.md §4.2 introduces "P" once per
    // contour) — not the simplified polygon's shorter, chord-cut perimeter,
    // which would inflate κ and under-reject elongated shapes.
    let k = compactness(a, raw_perimeter);
    if k < config.compact_min {
        return None;
    }

    Some(simplified)
}
