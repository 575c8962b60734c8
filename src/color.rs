//! ColorSegmenter step 1-3 (spec.md §4.1): RGB → HSV and hue-window
//! thresholding. Hand-rolled, in the teacher's register of writing small
//! numeric kernels directly (`mat3.rs`, `parallelogram.rs`) rather than
//! reaching for a color-space crate.

use crate::buffer::Mask;
use crate::types::Raster;

/// Converts one RGB8 pixel to OpenCV-convention HSV: H∈[0,180], S∈[0,255], V∈[0,255].
#[inline]
pub fn rgb_to_hsv_opencv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let rf = r as f64 / 255.0;
    let gf = g as f64 / 255.0;
    let bf = b as f64 / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };

    let h_deg = if delta <= 0.0 {
        0.0
    } else if max == rf {
        60.0 * (((gf - bf) / delta).rem_euclid(6.0))
    } else if max == gf {
        60.0 * (((bf - rf) / delta) + 2.0)
    } else {
        60.0 * (((rf - gf) / delta) + 4.0)
    };

    // OpenCV halves the 0-360 hue into a single byte, 0..=180.
    let h = (h_deg / 2.0).round().clamp(0.0, 180.0) as u8;
    let s_byte = (s * 255.0).round().clamp(0.0, 255.0) as u8;
    let v_byte = (v * 255.0).round().clamp(0.0, 255.0) as u8;
    (h, s_byte, v_byte)
}

#[derive(Debug, Clone, Copy)]
pub struct HsvWindow {
    pub h_lo: u8,
    pub h_hi: u8,
    pub s_lo: u8,
    pub s_hi: u8,
    pub v_lo: u8,
    pub v_hi: u8,
}

impl HsvWindow {
    #[inline]
    fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.h_lo && h <= self.h_hi && s >= self.s_lo && s <= self.s_hi && v >= self.v_lo && v <= self.v_hi
    }
}

/// Thick-outline windows: saturated red, both ends of the cyclic hue.
pub const THICK_WINDOWS: [HsvWindow; 2] = [
    HsvWindow { h_lo: 0, h_hi: 10, s_lo: 120, s_hi: 255, v_lo: 120, v_hi: 255 },
    HsvWindow { h_lo: 170, h_hi: 180, s_lo: 120, s_hi: 255, v_lo: 120, v_hi: 255 },
];

/// Pale-fill windows: same hue span, lower saturation, higher value floor.
pub const FILLED_WINDOWS: [HsvWindow; 2] = [
    HsvWindow { h_lo: 0, h_hi: 10, s_lo: 30, s_hi: 120, v_lo: 180, v_hi: 255 },
    HsvWindow { h_lo: 170, h_hi: 180, s_lo: 30, s_hi: 120, v_lo: 180, v_hi: 255 },
];

/// Builds a binary mask: 255 where any of `windows` matches the pixel's HSV, 0 elsewhere.
pub fn threshold_hsv_windows(raster: &Raster, windows: &[HsvWindow]) -> Mask {
    let mut mask = Mask::new(raster.width, raster.height);
    for y in 0..raster.height {
        for x in 0..raster.width {
            let (r, g, b) = raster.pixel(x, y);
            let (h, s, v) = rgb_to_hsv_opencv(r, g, b);
            let hit = windows.iter().any(|w| w.contains(h, s, v));
            mask.set(x, y, 0, if hit { 255 } else { 0 });
        }
    }
    mask
}
