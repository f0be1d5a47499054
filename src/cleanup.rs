//! Selective morphological cleanup: closing plus interior hole filling.
//!
//! Holes are background regions fully enclosed by the mask (background
//! components that never touch the frame border). Small holes are usually
//! gating noise (shadow speckles, texture dropouts) and get filled; larger
//! ones are genuine openings (windows) and stay. Standard mode additionally
//! peeks at the edge energy inside the hole so real small details such as
//! switches or vents survive. Fine-detail selections skip this stage entirely
//! to protect lattice and mesh structures.

use crate::engine::options::{Granularity, RefinementOptions, RefinerParams};
use crate::mask::Mask;
use crate::morph::{close, Kernel};
use crate::session::ImageSession;
use log::debug;

const NEIGH_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Cleanup result plus the trace fields the diagnostics report.
#[derive(Clone, Debug)]
pub struct CleanupOutcome {
    pub mask: Mask,
    pub applied: bool,
    pub close_iterations: usize,
    pub holes_filled: usize,
}

/// Apply closing and hole filling where the mode allows it.
pub fn cleanup_mask(
    gated: &Mask,
    session: &ImageSession,
    is_box: bool,
    options: &RefinementOptions,
    small_object: bool,
    params: &RefinerParams,
) -> CleanupOutcome {
    let applies = is_box || (options.level == Some(Granularity::Standard) && !small_object);
    if !applies {
        // Fine-detail and loose levels pass through bit-identically.
        return CleanupOutcome {
            mask: gated.clone(),
            applied: false,
            close_iterations: 0,
            holes_filled: 0,
        };
    }

    let close_iterations = if options.is_wall_click { 2 } else { 1 };
    let mut mask = close(gated, &Kernel::ellipse(params.morph_kernel_px), close_iterations);
    let holes_filled = fill_holes(&mut mask, session, options.is_wall_click, params);
    if holes_filled > 0 {
        debug!("cleanup: filled {holes_filled} interior holes");
    }

    CleanupOutcome {
        mask,
        applied: true,
        close_iterations,
        holes_filled,
    }
}

/// Fill qualifying enclosed background regions in place; returns how many.
///
/// Wall-click fills every hole up to the noise-area bound (shadow patches on
/// textured walls routinely carry edges); standard mode requires the hole's
/// mean edge magnitude to stay below the smoothness bound.
fn fill_holes(
    mask: &mut Mask,
    session: &ImageSession,
    force_fill: bool,
    params: &RefinerParams,
) -> usize {
    let (w, h) = mask.dims();
    if w == 0 || h == 0 {
        return 0;
    }
    let max_hole_area = params.noise_area_ratio * (w * h) as f32;
    let mut visited = vec![false; w * h];
    let mut stack = Vec::with_capacity(64);
    let mut hole = Vec::new();
    let mut filled = 0usize;

    for start in 0..w * h {
        if visited[start] || mask.data[start] != 0 {
            continue;
        }
        // Grow one background component, tracking border contact.
        hole.clear();
        let mut touches_border = false;
        let mut edge_sum = 0u64;
        visited[start] = true;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let x = (idx % w) as i32;
            let y = (idx / w) as i32;
            if x == 0 || y == 0 || x == w as i32 - 1 || y == h as i32 - 1 {
                touches_border = true;
            }
            hole.push(idx);
            edge_sum += u64::from(session.edges.data[idx]);
            for (dx, dy) in NEIGH_4 {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if visited[nidx] || mask.data[nidx] != 0 {
                    continue;
                }
                visited[nidx] = true;
                stack.push(nidx);
            }
        }
        if touches_border {
            continue;
        }

        let area = hole.len() as f32;
        if area > max_hole_area {
            continue;
        }
        let fill = if force_fill {
            true
        } else {
            let mean_edge = edge_sum as f32 / hole.len().max(1) as f32;
            mean_edge < params.hole_edge_mean_max
        };
        if fill {
            for &idx in &hole {
                mask.data[idx] = 1;
            }
            filled += 1;
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageRgb8;

    fn flat_session(w: usize, h: usize) -> ImageSession {
        let mut img = ImageRgb8::new(w, h);
        for v in img.data.iter_mut() {
            *v = 150;
        }
        ImageSession::build(img, 1)
    }

    /// Solid ring mask with a rectangular hole of exactly `hole_w * hole_h` px.
    fn ring_mask(w: usize, h: usize, hole_w: usize, hole_h: usize) -> Mask {
        let mut m = Mask::new(w, h);
        for y in 2..h - 2 {
            for x in 2..w - 2 {
                m.set(x, y, true);
            }
        }
        let x0 = (w - hole_w) / 2;
        let y0 = (h - hole_h) / 2;
        for y in y0..y0 + hole_h {
            for x in x0..x0 + hole_w {
                m.set(x, y, false);
            }
        }
        m
    }

    #[test]
    fn hole_at_the_noise_threshold_is_filled() {
        // 100x100 frame: threshold is 1% = 100 px. A 10x10 hole fills.
        let session = flat_session(100, 100);
        let mut mask = ring_mask(100, 100, 10, 10);
        let params = RefinerParams::default();
        let filled = fill_holes(&mut mask, &session, true, &params);
        assert_eq!(filled, 1);
        assert!(mask.get(50, 50));
    }

    #[test]
    fn hole_one_pixel_larger_survives() {
        // 101 px > 1% of the frame: the hole must stay open.
        let session = flat_session(100, 100);
        let mut mask = ring_mask(100, 100, 10, 10);
        let cx = 100 / 2 - 10 / 2;
        mask.set(cx - 1, 50, false); // grow the hole by one attached pixel
        let params = RefinerParams::default();
        let filled = fill_holes(&mut mask, &session, true, &params);
        assert_eq!(filled, 0);
        assert!(!mask.get(50, 50));
    }

    #[test]
    fn background_touching_the_border_is_not_a_hole() {
        let session = flat_session(40, 40);
        let mut mask = Mask::new(40, 40);
        for y in 10..30 {
            for x in 10..30 {
                mask.set(x, y, true);
            }
        }
        let params = RefinerParams::default();
        assert_eq!(fill_holes(&mut mask, &session, true, &params), 0);
    }

    #[test]
    fn standard_mode_keeps_detail_rich_holes() {
        // Put a busy texture inside the hole so its mean edge energy is high.
        let mut img = ImageRgb8::new(60, 60);
        for v in img.data.iter_mut() {
            *v = 150;
        }
        for y in 27..33 {
            for x in 27..33 {
                let v = if x < 30 { 0 } else { 255 };
                img.set(x, y, [v, v, v]);
            }
        }
        let session = ImageSession::build(img, 1);
        let mut mask = ring_mask(60, 60, 6, 6);
        let params = RefinerParams::default();
        assert_eq!(fill_holes(&mut mask, &session, false, &params), 0);
        // Wall-click mode ignores the edge energy and fills it anyway.
        let mut mask2 = ring_mask(60, 60, 6, 6);
        assert_eq!(fill_holes(&mut mask2, &session, true, &params), 1);
    }

    #[test]
    fn fine_detail_level_passes_through_bit_identically() {
        let session = flat_session(50, 50);
        let mask = ring_mask(50, 50, 4, 4);
        let options = RefinementOptions::fine_detail();
        let params = RefinerParams::default();
        let out = cleanup_mask(&mask, &session, false, &options, false, &params);
        assert!(!out.applied);
        assert_eq!(out.mask, mask);
    }
}
