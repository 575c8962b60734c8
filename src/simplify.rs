//! Douglas–Peucker simplification (spec.md §4.2 step 2), delegated to
//! `clipper2`'s `simplify`, the exact call the teacher already makes in
//! `mpoly.rs`/`poly_test.rs` for the same purpose.

use clipper2::{One, Path, Paths, Point};

use crate::types::PixelPoint;

type IntPoint = Point<One>;
type IntPath = Path<One>;
type IntPaths = Paths<One>;

fn to_int_path(points: &[PixelPoint]) -> IntPath {
    IntPath::new(
        points
            .iter()
            .map(|p| IntPoint::from_scaled(p.x.round() as i64, p.y.round() as i64))
            .collect(),
    )
}

fn from_int_path(path: &IntPath) -> Vec<PixelPoint> {
    path.iter()
        .map(|pt| PixelPoint::new(pt.x_scaled() as f64, pt.y_scaled() as f64))
        .collect()
}

/// Simplifies a closed pixel-space polygon with tolerance `epsilon` (in pixels).
/// Returns the simplified vertex list in source order; empty if the source
/// degenerates below 3 vertices.
pub fn simplify_polygon(points: &[PixelPoint], epsilon: f64) -> Vec<PixelPoint> {
    if points.len() < 3 {
        return Vec::new();
    }

    let paths: IntPaths = IntPaths::new(vec![to_int_path(points)]);
    let simplified = paths.simplify(epsilon.max(0.0), false);

    match simplified.first() {
        Some(path) => from_int_path(path),
        None => Vec::new(),
    }
}
