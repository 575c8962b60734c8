//! Dedup/overlap-suppression (spec.md §4.3). IoU is computed by rasterizing
//! both candidates into a shared local mask with a scanline polygon fill —
//! a direct generalization of the teacher's `fill_poly_v2i_n`
//! (`mpoly.rs`/`poly_test.rs`) — rather than a general polygon-clipping
//! boolean op, since we only ever need the pixel count of the overlap.

use crate::polygon::BBox;
use crate::types::{DetectedPolygon, PixelPoint};

/// Scanline-fills a single closed ring into `out` (row-major, `width` wide,
/// `out.len() / width` tall), setting 1 for covered pixels, using the
/// even-odd rule. Coordinates are relative to the buffer's own origin.
fn rasterize_ring(points: &[PixelPoint], width: usize, height: usize, out: &mut [u8]) {
    let n = points.len();
    if n < 3 {
        return;
    }

    for py in 0..height as i32 {
        let y = py as f64 + 0.5;
        let mut xs: Vec<f64> = Vec::new();

        let mut j = n - 1;
        for i in 0..n {
            let a = points[i];
            let b = points[j];
            if (a.y > y) != (b.y > y) {
                let x_at_y = a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x);
                xs.push(x_at_y);
            }
            j = i;
        }
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for pair in xs.chunks_exact(2) {
            let x_src = (pair[0].ceil().max(0.0)) as i32;
            let x_dst = (pair[1].floor() as i32 + 1).min(width as i32);
            let x_src = x_src.min(width as i32);
            if x_src < x_dst {
                let row = py as usize * width;
                for x in x_src..x_dst {
                    out[row + x as usize] = 1;
                }
            }
        }
    }
}

/// Intersection-over-union of two pixel-space polygons, computed by exact
/// rasterization over their shared bounding box.
pub fn iou(a: &[PixelPoint], b: &[PixelPoint]) -> f64 {
    let bbox_a = BBox::of(a);
    let bbox_b = BBox::of(b);
    if !bbox_a.overlaps(&bbox_b) {
        return 0.0;
    }

    let min_x = bbox_a.min_x.min(bbox_b.min_x).floor();
    let min_y = bbox_a.min_y.min(bbox_b.min_y).floor();
    let max_x = bbox_a.max_x.max(bbox_b.max_x).ceil();
    let max_y = bbox_a.max_y.max(bbox_b.max_y).ceil();

    let width = ((max_x - min_x).max(1.0)) as usize + 1;
    let height = ((max_y - min_y).max(1.0)) as usize + 1;

    let shift = |pts: &[PixelPoint]| -> Vec<PixelPoint> {
        pts.iter().map(|p| PixelPoint::new(p.x - min_x, p.y - min_y)).collect()
    };

    let mut mask_a = vec![0u8; width * height];
    let mut mask_b = vec![0u8; width * height];
    rasterize_ring(&shift(a), width, height, &mut mask_a);
    rasterize_ring(&shift(b), width, height, &mut mask_b);

    let mut inter = 0usize;
    let mut union = 0usize;
    for i in 0..mask_a.len() {
        let ia = mask_a[i] != 0;
        let ib = mask_b[i] != 0;
        if ia && ib {
            inter += 1;
        }
        if ia || ib {
            union += 1;
        }
    }

    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

/// Suppresses redundant detections per spec.md §4.3: sort by area
/// descending (ties broken by original insertion order), then keep a
/// candidate only if every already-kept polygon satisfies IoU ≤ threshold,
/// the candidate's centroid is not inside it, and none of the candidate's
/// vertices is inside it.
pub fn dedup(mut candidates: Vec<DetectedPolygon>, iou_threshold: f64) -> Vec<DetectedPolygon> {
    use crate::polygon::{area, contains_point};

    let areas: Vec<f64> = candidates.iter().map(|p| area(&p.corners)).collect();
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&i, &j| {
        areas[j]
            .partial_cmp(&areas[i])
            .unwrap()
            .then(i.cmp(&j))
    });

    let mut kept: Vec<usize> = Vec::new();
    for &i in &order {
        let cand = &candidates[i];
        let mut ok = true;
        for &k in &kept {
            let keeper = &candidates[k];
            if iou(&cand.corners, &keeper.corners) > iou_threshold {
                ok = false;
                break;
            }
            if contains_point(&keeper.corners, cand.center) {
                ok = false;
                break;
            }
            if cand.corners.iter().any(|&v| contains_point(&keeper.corners, v)) {
                ok = false;
                break;
            }
        }
        if ok {
            kept.push(i);
        }
    }

    kept.sort_unstable();
    let keep_set: std::collections::HashSet<usize> = kept.into_iter().collect();
    let mut idx = 0usize;
    candidates.retain(|_| {
        let keep = keep_set.contains(&idx);
        idx += 1;
        keep
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetectionKind;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, side: f64) -> Vec<PixelPoint> {
        vec![
            PixelPoint::new(x0, y0),
            PixelPoint::new(x0 + side, y0),
            PixelPoint::new(x0 + side, y0 + side),
            PixelPoint::new(x0, y0 + side),
        ]
    }

    #[test]
    fn identical_squares_have_iou_one() {
        let a = square(0.0, 0.0, 50.0);
        let b = square(0.0, 0.0, 50.0);
        assert_relative_eq!(iou(&a, &b), 1.0, epsilon = 1e-2);
    }

    #[test]
    fn disjoint_squares_have_iou_zero() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(1000.0, 1000.0, 10.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn half_overlapping_squares_have_iou_near_a_third() {
        let a = square(0.0, 0.0, 100.0);
        let b = square(50.0, 0.0, 100.0);
        let v = iou(&a, &b);
        assert!(v > 0.3 && v < 0.4, "expected ~1/3, got {v}");
    }

    fn poly(id: u64, corners: Vec<PixelPoint>) -> DetectedPolygon {
        let center = crate::polygon::centroid(&corners);
        DetectedPolygon { id, corners, center, kind: DetectionKind::ThickBorder }
    }

    #[test]
    fn larger_of_two_overlapping_rects_survives() {
        let big = poly(1, square(0.0, 0.0, 100.0));
        let small = poly(2, square(10.0, 10.0, 30.0)); // fully inside big
        let result = dedup(vec![small, big], 0.5);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn non_overlapping_polygons_both_survive() {
        let a = poly(1, square(0.0, 0.0, 10.0));
        let b = poly(2, square(1000.0, 1000.0, 10.0));
        let result = dedup(vec![a, b], 0.5);
        assert_eq!(result.len(), 2);
    }
}
