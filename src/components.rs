//! Connected-component analysis and disconnected-noise filtering.
//!
//! Labels the cleaned mask with 8-connectivity and applies per-mode keep rules:
//! box prompts recover every piece inside the box, wall clicks trust the merged
//! candidate and only drop true noise, standard point prompts isolate the
//! clicked component and its close, similarly sized neighbors.

use crate::mask::Mask;
use crate::engine::options::RefinerParams;
use nalgebra::Point2;

const NEIGH_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Area and centroid of one labeled component.
#[derive(Clone, Debug)]
pub struct ComponentStats {
    pub label: u32,
    pub area: usize,
    pub centroid: Point2<f32>,
}

/// Label image plus per-component statistics. Label 0 is background;
/// foreground labels start at 1 and `stats[i]` describes label `i + 1`.
#[derive(Clone, Debug)]
pub struct ComponentMap {
    pub w: usize,
    pub h: usize,
    pub labels: Vec<u32>,
    pub stats: Vec<ComponentStats>,
}

impl ComponentMap {
    #[inline]
    pub fn label_at(&self, x: usize, y: usize) -> u32 {
        self.labels[y * self.w + x]
    }

    pub fn component_count(&self) -> usize {
        self.stats.len()
    }

    /// Mask of every pixel whose label passes `keep`.
    pub fn select(&self, keep: impl Fn(u32) -> bool) -> Mask {
        let mut out = Mask::new(self.w, self.h);
        for (o, &l) in out.data.iter_mut().zip(self.labels.iter()) {
            if l != 0 && keep(l) {
                *o = 1;
            }
        }
        out
    }

    /// Label of the largest component, if any.
    pub fn largest(&self) -> Option<u32> {
        self.stats
            .iter()
            .max_by_key(|s| s.area)
            .map(|s| s.label)
    }
}

/// 8-connectivity labeling with per-component area and centroid.
pub fn label_components(mask: &Mask) -> ComponentMap {
    let (w, h) = mask.dims();
    let mut labels = vec![0u32; w * h];
    let mut stats = Vec::new();
    let mut stack = Vec::with_capacity(64);
    let mut next_label = 1u32;

    for start in 0..w * h {
        if mask.data[start] == 0 || labels[start] != 0 {
            continue;
        }
        let mut area = 0usize;
        let mut sum_x = 0f32;
        let mut sum_y = 0f32;
        labels[start] = next_label;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let x = (idx % w) as i32;
            let y = (idx / w) as i32;
            area += 1;
            sum_x += x as f32;
            sum_y += y as f32;
            for (dx, dy) in NEIGH_8 {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if mask.data[nidx] == 0 || labels[nidx] != 0 {
                    continue;
                }
                labels[nidx] = next_label;
                stack.push(nidx);
            }
        }
        let denom = area.max(1) as f32;
        stats.push(ComponentStats {
            label: next_label,
            area,
            centroid: Point2::new(sum_x / denom, sum_y / denom),
        });
        next_label += 1;
    }

    ComponentMap { w, h, labels, stats }
}

/// Result of a connectivity filtering pass.
#[derive(Clone, Debug)]
pub struct FilterOutcome {
    pub mask: Mask,
    pub total: usize,
    pub kept: usize,
    pub largest_fallback: bool,
}

/// Box-prompt multi-component recovery: keep components whose centroid lies
/// inside the box, plus any piece large enough to be part of a perforated
/// object. Keeps the input unchanged when nothing qualifies.
pub fn filter_box(mask: &Mask, bbox: [i32; 4], params: &RefinerParams) -> FilterOutcome {
    let map = label_components(mask);
    let total = map.component_count();
    if total == 0 {
        return FilterOutcome {
            mask: mask.clone(),
            total,
            kept: 0,
            largest_fallback: false,
        };
    }
    let image_area = (mask.w * mask.h) as f32;
    let [bx1, by1, bx2, by2] = bbox.map(|v| v as f32);
    let keep: Vec<u32> = map
        .stats
        .iter()
        .filter(|s| {
            let inside = s.centroid.x > bx1
                && s.centroid.x < bx2
                && s.centroid.y > by1
                && s.centroid.y < by2;
            inside || s.area as f32 > image_area * params.box_large_component_ratio
        })
        .map(|s| s.label)
        .collect();
    if keep.is_empty() {
        return FilterOutcome {
            mask: mask.clone(),
            total,
            kept: total,
            largest_fallback: false,
        };
    }
    let kept = keep.len();
    FilterOutcome {
        mask: map.select(|l| keep.contains(&l)),
        total,
        kept,
        largest_fallback: false,
    }
}

/// Point-prompt filtering. Wall-click keeps the clicked component plus every
/// component above a small area floor; standard mode keeps the clicked
/// component plus pieces that are both a reasonable fraction of its area and
/// close to the click. A click landing on background falls back to the single
/// largest component.
pub fn filter_point(
    mask: &Mask,
    reference: (i32, i32),
    is_wall_click: bool,
    params: &RefinerParams,
) -> FilterOutcome {
    let map = label_components(mask);
    let total = map.component_count();
    if total == 0 {
        return FilterOutcome {
            mask: mask.clone(),
            total,
            kept: 0,
            largest_fallback: false,
        };
    }
    let (w, h) = mask.dims();
    let ix = reference.0.clamp(0, w as i32 - 1) as usize;
    let iy = reference.1.clamp(0, h as i32 - 1) as usize;
    let target = map.label_at(ix, iy);

    if target == 0 {
        // Reference pixel was eroded away; keep the dominant component.
        let largest = map.largest().expect("at least one component");
        return FilterOutcome {
            mask: map.select(|l| l == largest),
            total,
            kept: 1,
            largest_fallback: true,
        };
    }

    let image_area = (w * h) as f32;
    let click = Point2::new(reference.0 as f32, reference.1 as f32);
    let main_area = map.stats[(target - 1) as usize].area as f32;

    let keep: Vec<u32> = map
        .stats
        .iter()
        .filter(|s| {
            if s.label == target {
                return true;
            }
            if is_wall_click {
                s.area as f32 > image_area * params.wall_click_component_min_ratio
            } else {
                s.area as f32 >= main_area * params.component_min_ratio
                    && nalgebra::distance(&s.centroid, &click) < params.component_max_distance_px
            }
        })
        .map(|s| s.label)
        .collect();
    let kept = keep.len();
    FilterOutcome {
        mask: map.select(|l| keep.contains(&l)),
        total,
        kept,
        largest_fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Mask {
        // A wide mask with a large left blob and a small blob 280+ px away,
        // beyond the standard-mode recovery distance.
        let mut m = Mask::new(300, 8);
        for y in 1..7 {
            for x in 1..7 {
                m.set(x, y, true);
            }
        }
        for y in 3..5 {
            for x in 290..292 {
                m.set(x, y, true);
            }
        }
        m
    }

    #[test]
    fn labeling_finds_both_blobs() {
        let map = label_components(&two_blobs());
        assert_eq!(map.component_count(), 2);
        let mut areas: Vec<usize> = map.stats.iter().map(|s| s.area).collect();
        areas.sort_unstable();
        assert_eq!(areas, vec![4, 36]);
    }

    #[test]
    fn diagonal_pixels_share_a_label() {
        let mut m = Mask::new(4, 4);
        m.set(0, 0, true);
        m.set(1, 1, true);
        let map = label_components(&m);
        assert_eq!(map.component_count(), 1);
    }

    #[test]
    fn strict_point_filter_drops_small_far_blob() {
        let params = RefinerParams::default();
        let out = filter_point(&two_blobs(), (3, 3), false, &params);
        assert_eq!(out.kept, 1);
        assert!(!out.mask.get(290, 3));
        assert!(out.mask.get(3, 3));
    }

    #[test]
    fn background_click_falls_back_to_largest() {
        let params = RefinerParams::default();
        let out = filter_point(&two_blobs(), (12, 0), false, &params);
        assert!(out.largest_fallback);
        assert!(out.mask.get(3, 3));
        assert!(!out.mask.get(290, 3));
    }

    #[test]
    fn box_filter_keeps_pieces_inside_the_box() {
        let params = RefinerParams::default();
        let out = filter_box(&two_blobs(), [0, 0, 10, 8], &params);
        assert!(out.mask.get(3, 3));
        assert!(!out.mask.get(290, 3));
    }
}
