//! Polygon geometry helpers shared by the extractor and the deduplicator
//! (spec.md §4.2, §4.3).

use crate::types::PixelPoint;

/// Signed shoelace area. Positive for CCW winding, negative for CW.
pub fn signed_area(points: &[PixelPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

pub fn area(points: &[PixelPoint]) -> f64 {
    signed_area(points).abs()
}

/// Perimeter: sum of consecutive segment lengths, ring closed back to start.
pub fn perimeter(points: &[PixelPoint]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
    }
    sum
}

/// Isoperimetric compactness `4πA/P²`; 1.0 for a circle, shrinks toward 0 for elongated shapes.
pub fn compactness(a: f64, p: f64) -> f64 {
    if p <= 0.0 {
        return 0.0;
    }
    4.0 * std::f64::consts::PI * a / (p * p)
}

/// Arithmetic mean of the vertex list — spec.md pins this, NOT the true
/// polygon centroid integral (see SPEC_FULL.md Open Questions).
pub fn centroid(points: &[PixelPoint]) -> PixelPoint {
    let n = points.len().max(1) as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    PixelPoint::new(sx / n, sy / n)
}

#[derive(Debug, Clone, Copy)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn of(points: &[PixelPoint]) -> Self {
        let mut b = BBox { min_x: f64::INFINITY, min_y: f64::INFINITY, max_x: f64::NEG_INFINITY, max_y: f64::NEG_INFINITY };
        for p in points {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        b
    }

    pub fn overlaps(&self, other: &BBox) -> bool {
        self.min_x <= other.max_x && other.min_x <= self.max_x && self.min_y <= other.max_y && other.min_y <= self.max_y
    }
}

/// Ray-casting point-in-polygon test (even-odd rule). Boundary is not
/// guaranteed either way, which is fine for the dedup use sites (spec.md
/// never requires boundary-exact semantics).
pub fn contains_point(points: &[PixelPoint], p: PixelPoint) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = points[i];
        let pj = points[j];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_at_y = pi.x + (p.y - pi.y) / (pj.y - pi.y) * (pj.x - pi.x);
            if p.x < x_at_y {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
