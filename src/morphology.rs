//! Morphological cleanup (spec.md §4.1 step 4), generalized from the
//! teacher's windowed dilation (`dilate_im.rs`) into a 3×3-rect erode/dilate
//! pair, composed into `open`/`close`.

use crate::buffer::Mask;

const SET: u8 = 255;

/// 3×3 rectangular structuring element dilation: a pixel is set if any of
/// its 8-neighbors (or itself) is set in `src`.
pub fn dilate3x3(src: &Mask) -> Mask {
    window3x3(src, true)
}

/// 3×3 rectangular structuring element erosion: a pixel is set only if all
/// of its 8-neighbors (and itself) are set in `src`.
pub fn erode3x3(src: &Mask) -> Mask {
    window3x3(src, false)
}

fn window3x3(src: &Mask, is_dilate: bool) -> Mask {
    let w = src.w;
    let h = src.h;
    let mut dst = Mask::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let mut any_set = false;
            let mut all_set = true;

            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    let set = if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                        // Out-of-bounds neighbors behave as background, matching the
                        // teacher's forced zero-border convention in `trace.rs`.
                        false
                    } else {
                        src.get(nx as usize, ny as usize, 0) != 0
                    };
                    any_set |= set;
                    all_set &= set;
                }
            }

            let v = if is_dilate { any_set } else { all_set };
            dst.set(x, y, 0, if v { SET } else { 0 });
        }
    }

    dst
}

/// CLOSE = dilate then erode: closes small gaps without growing the shape overall.
pub fn close3x3(src: &Mask) -> Mask {
    erode3x3(&dilate3x3(src))
}

/// OPEN = erode then dilate: removes salt/speckle without shrinking large regions overall.
pub fn open3x3(src: &Mask) -> Mask {
    dilate3x3(&erode3x3(src))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> Mask {
        let h = rows.len();
        let w = rows[0].len();
        let mut m = Mask::new(w, h);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                m.set(x, y, 0, if c == '#' { 255 } else { 0 });
            }
        }
        m
    }

    #[test]
    fn dilate_grows_single_pixel_into_3x3_block() {
        let src = mask_from_rows(&["....", ".#..", "....", "...."]);
        let d = dilate3x3(&src);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(d.get(x, y, 0), 255, "expected set at ({x},{y})");
            }
        }
        assert_eq!(d.get(3, 0, 0), 0);
    }

    #[test]
    fn erode_removes_isolated_speckle() {
        let src = mask_from_rows(&["....", ".#..", "....", "...."]);
        let e = erode3x3(&src);
        assert!(e.arr.iter().all(|&v| v == 0));
    }

    #[test]
    fn open_removes_speckle_but_preserves_solid_block() {
        let src = mask_from_rows(&["#.......", "........", "..####..", "..####..", "..####..", "..####..", "........", "........"]);
        let opened = open3x3(&src);
        assert_eq!(opened.get(0, 0, 0), 0, "lone speckle must be removed");
        assert_eq!(opened.get(4, 4, 0), 255, "interior of solid block survives");
    }

    #[test]
    fn close_fills_one_pixel_gap_in_outline() {
        let mut src = mask_from_rows(&[
            "#####",
            "#...#",
            "#...#",
            "#...#",
            "#####",
        ]);
        // Punch a 1px gap in the left wall.
        src.set(0, 2, 0, 0);
        let closed = close3x3(&src);
        assert_eq!(closed.get(0, 2, 0), 255, "gap should be closed");
    }
}
