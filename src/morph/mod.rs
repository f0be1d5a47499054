//! Morphological primitives over binary masks.
//!
//! Kernels are flat offset lists; erosion and dilation ignore out-of-bounds
//! offsets so the image border never erodes or dilates by itself. Row loops are
//! rayon-parallel since the large bridging kernels dominate per-call cost.

pub mod flood;

pub use self::flood::flood_fill;

use crate::mask::Mask;
use rayon::prelude::*;

/// Structuring element as a list of (dx, dy) offsets.
#[derive(Clone, Debug)]
pub struct Kernel {
    pub offsets: Vec<(i32, i32)>,
}

impl Kernel {
    /// Filled ellipse inscribed in a `size × size` box (odd `size`).
    ///
    /// Produces the familiar cross at 3×3 and the rounded discs used by the
    /// closing and bridging passes at larger sizes.
    pub fn ellipse(size: usize) -> Self {
        let r = (size / 2) as i32;
        let mut offsets = Vec::new();
        if r == 0 {
            offsets.push((0, 0));
            return Self { offsets };
        }
        let rf = r as f32;
        for dy in -r..=r {
            let t = 1.0 - (dy * dy) as f32 / (rf * rf);
            let span = (rf * t.max(0.0).sqrt()).round() as i32;
            for dx in -span..=span {
                offsets.push((dx, dy));
            }
        }
        Self { offsets }
    }

    /// Full `size × size` square block.
    pub fn square(size: usize) -> Self {
        let r = (size / 2) as i32;
        let mut offsets = Vec::with_capacity(size * size);
        for dy in -r..=r {
            for dx in -r..=r {
                offsets.push((dx, dy));
            }
        }
        Self { offsets }
    }
}

fn erode_once(src: &Mask, kernel: &Kernel) -> Mask {
    let (w, h) = src.dims();
    let mut out = Mask::new(w, h);
    out.data
        .par_chunks_mut(w.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                if src.data[y * w + x] == 0 {
                    continue;
                }
                let mut keep = true;
                for &(dx, dy) in &kernel.offsets {
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    if src.data[ny as usize * w + nx as usize] == 0 {
                        keep = false;
                        break;
                    }
                }
                *px = u8::from(keep);
            }
        });
    out
}

fn dilate_once(src: &Mask, kernel: &Kernel) -> Mask {
    let (w, h) = src.dims();
    let mut out = Mask::new(w, h);
    out.data
        .par_chunks_mut(w.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let mut hit = false;
                for &(dx, dy) in &kernel.offsets {
                    let nx = x as i32 + dx;
                    let ny = y as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    if src.data[ny as usize * w + nx as usize] != 0 {
                        hit = true;
                        break;
                    }
                }
                *px = u8::from(hit);
            }
        });
    out
}

/// Morphological erosion, `iterations` passes.
pub fn erode(src: &Mask, kernel: &Kernel, iterations: usize) -> Mask {
    let mut out = src.clone();
    for _ in 0..iterations {
        out = erode_once(&out, kernel);
    }
    out
}

/// Morphological dilation, `iterations` passes.
pub fn dilate(src: &Mask, kernel: &Kernel, iterations: usize) -> Mask {
    let mut out = src.clone();
    for _ in 0..iterations {
        out = dilate_once(&out, kernel);
    }
    out
}

/// Morphological closing: `iterations` dilations followed by as many erosions.
pub fn close(src: &Mask, kernel: &Kernel, iterations: usize) -> Mask {
    let dilated = dilate(src, kernel, iterations);
    erode(&dilated, kernel, iterations)
}
