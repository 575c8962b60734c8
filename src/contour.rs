//! External contour extraction (spec.md §4.2 step 1), a direct generalization
//! of the teacher's Suzuki–Abe border follower (`trace.rs`), adapted from a
//! standalone `i32`-labeled image to a binary `Mask` and narrowed to emit
//! only external (non-hole) point loops — this extractor never needs holes.

use crate::buffer::Mask;
use crate::types::PixelPoint;

struct ScratchIm {
    w: usize,
    h: usize,
    arr: Vec<i32>,
}

impl ScratchIm {
    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }
}

#[derive(Clone, Copy)]
struct Iv2 {
    x: i32,
    y: i32,
}

struct Contour {
    is_hole: bool,
    points: Vec<Iv2>,
}

const DIR_TO_DELT_CW: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const DELT_PLUS_1_TO_DIR_CW: [i32; 9] = [5, 6, 7, 4, -1, 0, 3, 2, 1];

const DIR_TO_DELT_CCW: [(i32, i32); 8] = [
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DELT_PLUS_1_TO_DIR_CCW: [i32; 9] = [3, 2, 1, 4, -1, 0, 5, 6, 7];

#[inline]
fn delt_to_dir_cw(dy: i32, dx: i32) -> i32 {
    DELT_PLUS_1_TO_DIR_CW[((dy + 1) * 3 + (dx + 1)) as usize]
}
#[inline]
fn delt_to_dir_ccw(dy: i32, dx: i32) -> i32 {
    DELT_PLUS_1_TO_DIR_CCW[((dy + 1) * 3 + (dx + 1)) as usize]
}

/// Runs Suzuki–Abe border following over `mask` and returns the external
/// (non-hole) contours only, each as an ordered closed point loop in pixel
/// coordinates. Requires at least a 2x2 image; the outermost ring of the
/// mask is forced to background, same as the teacher's implementation.
fn find_contours_i32(mask: &Mask) -> Vec<Contour> {
    let w = mask.w;
    let h = mask.h;
    if w < 2 || h < 2 {
        return Vec::new();
    }

    let mut im = ScratchIm {
        w,
        h,
        arr: vec![0i32; w * h],
    };
    for y in 0..h {
        for x in 0..w {
            im.arr[im.idx(x, y)] = if mask.get(x, y, 0) != 0 { 1 } else { 0 };
        }
    }

    let w1 = w - 1;
    let h1 = h - 1;

    for y in 0..h {
        let left = im.idx(0, y);
        let right = im.idx(w1, y);
        im.arr[left] = 0;
        im.arr[right] = 0;
    }
    for x in 0..w {
        let top = im.idx(x, 0);
        let bot = im.idx(x, h1);
        im.arr[top] = 0;
        im.arr[bot] = 0;
    }

    let mut contours: Vec<Contour> = Vec::new();
    let mut curr_id: i32 = 1;

    for y0 in 1..h1 {
        let mut last_id: i32 = 1;

        for x0 in 1..w1 {
            let mut skip_to_4 = false;

            let f0 = im.arr[im.idx(x0, y0)];
            let mut y2: i32 = 0;
            let mut x2: i32 = 0;
            let mut is_hole = false;

            if f0 == 1 && im.arr[im.idx(x0 - 1, y0)] == 0 {
                is_hole = false;
                curr_id += 1;
                y2 = y0 as i32;
                x2 = (x0 as i32) - 1;
            } else if f0 >= 1 && im.arr[im.idx(x0 + 1, y0)] == 0 {
                is_hole = true;
                curr_id += 1;
                y2 = y0 as i32;
                x2 = (x0 as i32) + 1;
                if f0 > 1 {
                    last_id = f0;
                }
            } else {
                skip_to_4 = true;
            }

            if !skip_to_4 {
                let new_index = contours.len();
                contours.push(Contour { is_hole, points: Vec::new() });

                let (mut y1, mut x1) = (0i32, 0i32);

                let dy = y2 - (y0 as i32);
                let dx = x2 - (x0 as i32);
                let dir0 = delt_to_dir_cw(dy, dx);

                let mut found_start = false;
                for d in 0..8 {
                    let dird = ((dir0 + d + 8) % 8) as usize;
                    let (ddy, ddx) = DIR_TO_DELT_CW[dird];
                    let ny = (y0 as i32) + ddy;
                    let nx = (x0 as i32) + ddx;
                    if im.arr[im.idx(nx as usize, ny as usize)] != 0 {
                        y1 = ny;
                        x1 = nx;
                        found_start = true;
                        break;
                    }
                }

                if !found_start {
                    // singleton pixel, not a polygon
                    im.arr[im.idx(x0, y0)] = -curr_id;
                    skip_to_4 = true;
                }

                if !skip_to_4 {
                    y2 = y1;
                    x2 = x1;
                    let mut y3: i32 = y0 as i32;
                    let mut x3: i32 = x0 as i32;

                    loop {
                        contours[new_index].points.push(Iv2 { x: x3, y: y3 });

                        let dy = y2 - y3;
                        let dx = x2 - x3;
                        let dir0 = delt_to_dir_ccw(dy, dx);

                        let mut east_was_examined = false;
                        let (mut y4, mut x4) = (0i32, 0i32);
                        let mut found = false;

                        for d in 0..8 {
                            let dird = ((dir0 + d + 1 + 8) % 8) as usize;
                            let (ddy, ddx) = DIR_TO_DELT_CCW[dird];
                            if ddy == 0 && ddx == 1 {
                                east_was_examined = true;
                            }
                            let ny = y3 + ddy;
                            let nx = x3 + ddx;
                            if im.arr[im.idx(nx as usize, ny as usize)] != 0 {
                                y4 = ny;
                                x4 = nx;
                                found = true;
                                break;
                            }
                        }
                        assert!(found, "non-zero pixel search failed, should be impossible");

                        let ux3 = x3 as usize;
                        let uy3 = y3 as usize;
                        let idx3 = im.idx(ux3, uy3);

                        if east_was_examined {
                            let east = im.arr[im.idx(ux3 + 1, uy3)];
                            if east == 0 {
                                im.arr[idx3] = -curr_id;
                            } else if im.arr[idx3] == 1 {
                                im.arr[idx3] = curr_id;
                            }
                        } else if im.arr[idx3] == 1 {
                            im.arr[idx3] = curr_id;
                        }

                        if y4 == (y0 as i32) && x4 == (x0 as i32) && y3 == y1 && x3 == x1 {
                            break;
                        }

                        y2 = y3;
                        x2 = x3;
                        y3 = y4;
                        x3 = x4;
                    }
                }
            }

            if im.arr[im.idx(x0, y0)] != 1 {
                last_id = im.arr[im.idx(x0, y0)].abs();
            }
            let _ = last_id;
        }
    }

    contours
}

/// Returns the external (non-hole) contours of `mask` as pixel-space point loops.
pub fn find_external_contours(mask: &Mask) -> Vec<Vec<PixelPoint>> {
    find_contours_i32(mask)
        .into_iter()
        .filter(|c| !c.is_hole && c.points.len() >= 3)
        .map(|c| c.points.into_iter().map(|p| PixelPoint::new(p.x as f64, p.y as f64)).collect())
        .collect()
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
    fn empty_mask_has_no_contours() {
        let m = Mask::new(10, 10);
        assert!(find_external_contours(&m).is_empty());
    }

    #[test]
    fn solid_rectangle_yields_one_contour() {
        let m = mask_from_rows(&[
            "..........",
            "..######..",
            "..######..",
            "..######..",
            "..######..",
            "..........",
        ]);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].len() >= 4);
    }

    #[test]
    fn ring_with_hole_yields_only_the_outer_contour() {
        let m = mask_from_rows(&[
            "...........",
            "..#######..",
            "..#.....#..",
            "..#.....#..",
            "..#.....#..",
            "..#######..",
            "...........",
        ]);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 1, "hole border must be excluded");
    }

    #[test]
    fn two_disjoint_blocks_yield_two_contours() {
        let m = mask_from_rows(&[
            "................",
            "..####....####..",
            "..####....####..",
            "..####....####..",
            "................",
        ]);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 2);
    }
}
