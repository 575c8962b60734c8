//! Affine georeferencing fit (spec.md §4.4.1), generalizing the teacher's
//! hand-rolled `Mat3` (`from_affine2`, `transform_point2`) to the spec's
//! `(lon, lat) = M·(x, y) + t` axis ordering. The 6-parameter fit is two
//! independent 3-parameter ordinary least-squares problems, each solved by
//! hand via the normal equations and a 3×3 Cramer's-rule solve — the same
//! register as the teacher's other from-scratch linear algebra.

use crate::error::GeoError;
use crate::types::{PixelPoint, TiePoint};

/// `(lon, lat) = [[a, b], [d, e]] · (x, y) + (c, f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine2D {
    /// Applies the transform to a pixel point, returning `(lon, lat)`.
    #[inline]
    pub fn transform(&self, p: PixelPoint) -> (f64, f64) {
        let lon = self.a * p.x + self.b * p.y + self.c;
        let lat = self.d * p.x + self.e * p.y + self.f;
        (lon, lat)
    }
}

/// Solves the symmetric 3×3 system `m · x = rhs` by Cramer's rule. Returns
/// `None` if `m` is (near-)singular.
fn solve3x3(m: [[f64; 3]; 3], rhs: [f64; 3]) -> Option<([f64; 3], f64)> {
    let det = det3(m);
    if det.abs() < 1e-300 {
        return None;
    }

    let mut cols = [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ];

    let mut out = [0.0; 3];
    for i in 0..3 {
        let saved = cols[i];
        cols[i] = rhs;
        let mi = [
            [cols[0][0], cols[1][0], cols[2][0]],
            [cols[0][1], cols[1][1], cols[2][1]],
            [cols[0][2], cols[1][2], cols[2][2]],
        ];
        out[i] = det3(mi) / det;
        cols[i] = saved;
    }
    Some((out, det))
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Exact cross-product collinearity test on the first three tie points
/// (spec.md §4.4.1): normalized `|cross((p2-p1), (p3-p1))| < 1e-6`.
fn first_three_are_collinear(points: &[PixelPoint]) -> bool {
    if points.len() < 3 {
        return true;
    }
    let p1 = points[0];
    let p2 = points[1];
    let p3 = points[2];
    let ux = p2.x - p1.x;
    let uy = p2.y - p1.y;
    let vx = p3.x - p1.x;
    let vy = p3.y - p1.y;
    let cross = ux * vy - uy * vx;
    let norm = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
    if norm <= 0.0 {
        return true;
    }
    (cross / norm).abs() < 1e-6
}

/// Fits a 2-D affine transform from `≥3` tie points by ordinary least
/// squares (spec.md §4.4.1).
pub fn fit(tie_points: &[TiePoint]) -> Result<Affine2D, GeoError> {
    let n = tie_points.len();
    if n < 3 {
        return Err(GeoError::InsufficientPoints { found: n });
    }

    for tp in tie_points {
        if !tp.geo.in_range() {
            return Err(GeoError::InvalidGeoRange { lat: tp.geo.lat, lon: tp.geo.lon });
        }
    }

    let pixels: Vec<PixelPoint> = tie_points.iter().map(|t| t.pixel).collect();
    if first_three_are_collinear(&pixels) && n == 3 {
        return Err(GeoError::CollinearPoints);
    }

    // Normal equations for design matrix [x, y, 1] against each output axis.
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut sx = 0.0;
    let mut syy = 0.0;
    let mut sy = 0.0;
    let s_n = n as f64;

    let mut s_x_lon = 0.0;
    let mut s_y_lon = 0.0;
    let mut s_lon = 0.0;
    let mut s_x_lat = 0.0;
    let mut s_y_lat = 0.0;
    let mut s_lat = 0.0;

    for tp in tie_points {
        let x = tp.pixel.x;
        let y = tp.pixel.y;
        let lon = tp.geo.lon;
        let lat = tp.geo.lat;

        sxx += x * x;
        sxy += x * y;
        sx += x;
        syy += y * y;
        sy += y;

        s_x_lon += x * lon;
        s_y_lon += y * lon;
        s_lon += lon;

        s_x_lat += x * lat;
        s_y_lat += y * lat;
        s_lat += lat;
    }

    let normal = [[sxx, sxy, sx], [sxy, syy, sy], [sx, sy, s_n]];

    let Some((lon_coeffs, det)) = solve3x3(normal, [s_x_lon, s_y_lon, s_lon]) else {
        return Err(GeoError::CollinearPoints);
    };

    // Condition check: determinant scaled by the data's own spread, catching
    // near-singular overdetermined fits even when no single triple is exactly collinear.
    let cx = sx / s_n;
    let cy = sy / s_n;
    let mut ss = 0.0;
    for tp in tie_points {
        let dx = tp.pixel.x - cx;
        let dy = tp.pixel.y - cy;
        ss += dx * dx + dy * dy;
    }
    let scale = (ss / s_n).sqrt().max(1.0);
    if det.abs() < 1e-9 * scale.powi(4) {
        return Err(GeoError::CollinearPoints);
    }

    let Some((lat_coeffs, _)) = solve3x3(normal, [s_x_lat, s_y_lat, s_lat]) else {
        return Err(GeoError::CollinearPoints);
    };

    Ok(Affine2D {
        a: lon_coeffs[0],
        b: lon_coeffs[1],
        c: lon_coeffs[2],
        d: lat_coeffs[0],
        e: lat_coeffs[1],
        f: lat_coeffs[2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeoPoint;
    use approx::assert_relative_eq;

    fn tp(id: &str, px: f64, py: f64, lat: f64, lon: f64) -> TiePoint {
        TiePoint { id: id.to_string(), pixel: PixelPoint::new(px, py), geo: GeoPoint::new(lat, lon) }
    }

    #[test]
    fn too_few_points_is_rejected() {
        let pts = vec![tp("a", 0.0, 0.0, 0.0, 0.0), tp("b", 1.0, 0.0, 0.0, 1.0)];
        assert_eq!(fit(&pts), Err(GeoError::InsufficientPoints { found: 2 }));
    }

    #[test]
    fn out_of_range_geo_point_is_rejected() {
        let pts = vec![
            tp("a", 0.0, 0.0, 0.0, 0.0),
            tp("b", 1000.0, 0.0, 0.0, 1.0),
            tp("c", 0.0, 1000.0, 95.0, 0.0),
        ];
        assert_eq!(fit(&pts), Err(GeoError::InvalidGeoRange { lat: 95.0, lon: 0.0 }));
    }

    #[test]
    fn collinear_points_are_rejected() {
        let pts = vec![
            tp("a", 0.0, 0.0, 0.0, 0.0),
            tp("b", 500.0, 500.0, 0.5, 0.5),
            tp("c", 1000.0, 1000.0, 1.0, 1.0),
        ];
        assert_eq!(fit(&pts), Err(GeoError::CollinearPoints));
    }

    #[test]
    fn three_non_collinear_points_reproduce_themselves_exactly() {
        // Matches spec.md S1: lat decreases with y, lon increases with x.
        let pts = vec![
            tp("a", 0.0, 0.0, 0.0, 0.0),
            tp("b", 1000.0, 0.0, 0.0, 1.0),
            tp("c", 0.0, 1000.0, -1.0, 0.0),
        ];
        let affine = fit(&pts).unwrap();
        for p in &pts {
            let (lon, lat) = affine.transform(p.pixel);
            assert_relative_eq!(lon, p.geo.lon, epsilon = 1e-9);
            assert_relative_eq!(lat, p.geo.lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn fit_is_equivariant_under_pixel_translation() {
        let base = vec![
            tp("a", 0.0, 0.0, 10.0, 20.0),
            tp("b", 1000.0, 0.0, 10.0, 21.0),
            tp("c", 0.0, 1000.0, 9.0, 20.0),
            tp("d", 1000.0, 1000.0, 9.0, 21.0),
        ];
        let shifted: Vec<TiePoint> = base
            .iter()
            .map(|t| TiePoint { id: t.id.clone(), pixel: PixelPoint::new(t.pixel.x + 500.0, t.pixel.y + 250.0), geo: t.geo })
            .collect();

        let affine_base = fit(&base).unwrap();
        let affine_shifted = fit(&shifted).unwrap();

        for (b, s) in base.iter().zip(shifted.iter()) {
            let (lon_b, lat_b) = affine_base.transform(b.pixel);
            let (lon_s, lat_s) = affine_shifted.transform(s.pixel);
            assert_relative_eq!(lon_b, lon_s, epsilon = 1e-6);
            assert_relative_eq!(lat_b, lat_s, epsilon = 1e-6);
        }
    }

    #[test]
    fn more_than_three_points_with_one_collinear_triple_can_still_fit() {
        let pts = vec![
            tp("a", 0.0, 0.0, 0.0, 0.0),
            tp("b", 500.0, 500.0, 0.5, 0.5),
            tp("c", 1000.0, 1000.0, 1.0, 1.0),
            tp("d", 0.0, 1000.0, 1.0, 0.0),
        ];
        assert!(fit(&pts).is_ok());
    }
}
