//! Flood fill bounded by a region mask.
//!
//! Used by the connected-flow bridging step: growth starts at the prompt
//! location and can only traverse pixels of the bridged gate region, so the
//! result is a single connected component containing the seed.

use crate::mask::Mask;

const NEIGH_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// 4-connected flood fill from `seed`, restricted to `region` foreground.
///
/// Returns an all-background mask when the seed is out of bounds or lands on
/// background.
pub fn flood_fill(region: &Mask, seed: (i32, i32)) -> Mask {
    let (w, h) = region.dims();
    let mut out = Mask::new(w, h);
    let (sx, sy) = seed;
    if sx < 0 || sy < 0 || sx >= w as i32 || sy >= h as i32 {
        return out;
    }
    let start = sy as usize * w + sx as usize;
    if region.data[start] == 0 {
        return out;
    }

    let mut stack = Vec::with_capacity(64);
    out.data[start] = 1;
    stack.push(start);
    while let Some(idx) = stack.pop() {
        let x = (idx % w) as i32;
        let y = (idx / w) as i32;
        for (dx, dy) in NEIGH_4 {
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                continue;
            }
            let nidx = ny as usize * w + nx as usize;
            if out.data[nidx] != 0 || region.data[nidx] == 0 {
                continue;
            }
            out.data[nidx] = 1;
            stack.push(nidx);
        }
    }
    out
}
