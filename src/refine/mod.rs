//! Color- and edge-gated refinement of the selected candidate.
//!
//! The candidate from the model is coarse: it may bleed over boundaries or
//! include neighboring surfaces. Gating keeps only pixels whose color stays
//! near the seed and which no strong Laplacian edge separates from the click.
//! Wall modes additionally bridge small gaps and grow a single connected
//! region by flood fill from the reference point; precise modes never leave
//! the candidate.

pub mod color;

use crate::engine::options::{Granularity, RefinementOptions, RefinerParams};
use crate::engine::strategy::RefinementStrategy;
use crate::mask::Mask;
use crate::morph::{close, erode, flood_fill, Kernel};
use crate::prompt::Prompt;
use crate::session::ImageSession;
use self::color::{
    hue_deg, hue_diff_deg, max_channel_diff, median_mask_color, median_patch_color,
    seed_saturation,
};
use log::debug;
use nalgebra::Point2;
use rayon::prelude::*;

/// Gating result plus the trace fields the diagnostics report.
#[derive(Clone, Debug)]
pub struct GateOutcome {
    pub mask: Mask,
    pub strategy: RefinementStrategy,
    pub seed_rgb: [u8; 3],
    pub base_tolerance: f32,
    pub small_object: bool,
    /// Box-mode gating removed nearly everything and was discarded.
    pub reverted: bool,
}

/// Binary gate of pixels whose Laplacian magnitude stays below `threshold`.
fn edge_barrier(session: &ImageSession, threshold: u8) -> Mask {
    let mut out = Mask::new(session.width(), session.height());
    for (o, &e) in out.data.iter_mut().zip(session.edges.data.iter()) {
        *o = u8::from(e <= threshold);
    }
    out
}

/// Plain max-channel color gate at a constant tolerance.
fn color_valid_plain(session: &ImageSession, seed: [u8; 3], tol: f32) -> Mask {
    let w = session.width();
    let mut out = Mask::new(w, session.height());
    out.data
        .par_chunks_mut(w.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let diff = max_channel_diff(session.wide_pixel(y * w + x), seed);
                *px = u8::from(diff < tol);
            }
        });
    out
}

/// Linear tolerance decay away from the reference point.
struct DecayField {
    origin: Point2<f32>,
    max_distance: f32,
    min_factor: f32,
}

impl DecayField {
    #[inline]
    fn factor(&self, x: usize, y: usize) -> f32 {
        let d = nalgebra::distance(&self.origin, &Point2::new(x as f32, y as f32));
        (1.0 - d / self.max_distance).clamp(self.min_factor, 1.0)
    }
}

/// Hue-aware color gate: weighted blend of max-channel RGB distance and
/// wrapped hue distance, with an optional distance-decaying tolerance.
fn color_valid_hue(
    session: &ImageSession,
    seed: [u8; 3],
    hue_weight: f32,
    base_tol: f32,
    decay: Option<DecayField>,
) -> Mask {
    let w = session.width();
    let seed_hue = hue_deg(seed);
    let rgb_weight = 1.0 - hue_weight;
    let mut out = Mask::new(w, session.height());
    out.data
        .par_chunks_mut(w.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let i = y * w + x;
                let rgb_diff = max_channel_diff(session.wide_pixel(i), seed);
                let o = 3 * i;
                let pixel = [
                    session.rgb.data[o],
                    session.rgb.data[o + 1],
                    session.rgb.data[o + 2],
                ];
                let hue_term = hue_diff_deg(hue_deg(pixel), seed_hue);
                let diff = rgb_weight * rgb_diff + hue_weight * hue_term;
                let tol = match &decay {
                    Some(field) => base_tol * field.factor(x, y),
                    None => base_tol,
                };
                *px = u8::from(diff < tol);
            }
        });
    out
}

fn intersect3(a: &Mask, b: &Mask, c: &Mask) -> Mask {
    let mut out = a.clone();
    out.intersect(b);
    out.intersect(c);
    out
}

/// Box-prompt gating: seed from the candidate's own pixels, strict color gate
/// plus edge snap, with a self-correcting fallback when the seed was wrong.
fn refine_box(
    selected: &Mask,
    session: &ImageSession,
    reference: (i32, i32),
    params: &RefinerParams,
) -> GateOutcome {
    let seed = median_mask_color(&session.rgb, selected)
        .unwrap_or_else(|| median_patch_color(&session.rgb, reference.0, reference.1));
    let valid = color_valid_plain(session, seed, params.color_tol_box_mode);
    let barrier = edge_barrier(session, params.edge_thresh_box_mode);
    let mut refined = intersect3(selected, &valid, &barrier);

    let mut reverted = false;
    let kept = refined.area() as f32;
    if kept < selected.area() as f32 * params.refine_keep_ratio {
        // The gate keyed off a wrong seed (e.g. a window-dominated box) and
        // erased the object; trust the model candidate instead.
        debug!("refine: box gate kept {kept} px, reverting to candidate");
        refined = selected.clone();
        reverted = true;
    }

    GateOutcome {
        mask: refined,
        strategy: RefinementStrategy::Precise,
        seed_rgb: seed,
        base_tolerance: params.color_tol_box_mode,
        small_object: false,
        reverted,
    }
}

/// Standard-level point gating: small objects get a strict hue-aware gate,
/// large surfaces get distance decay and, in wall modes, connected-flow
/// bridging.
fn refine_standard_point(
    selected: &Mask,
    session: &ImageSession,
    reference: (i32, i32),
    options: &RefinementOptions,
    params: &RefinerParams,
) -> GateOutcome {
    let seed = median_patch_color(&session.rgb, reference.0, reference.1);
    let image_area = session.pixel_count() as f32;
    let small_object = (selected.area() as f32) < image_area * params.small_object_ratio;
    let saturation = seed_saturation(seed);
    let vibrant = saturation > params.vibrant_saturation_min;

    if small_object {
        let mut tol = if options.is_wall_only {
            params.color_tol_wall_only
        } else {
            params.color_tol_small_object
        };
        if vibrant {
            tol += params.vibrant_boost_small;
        }
        let edge_thresh = if options.is_wall_only {
            params.edge_thresh_wall_only
        } else {
            params.edge_thresh_small_object
        };
        let valid = color_valid_hue(session, seed, params.hue_weight_small, tol, None);
        let barrier = edge_barrier(session, edge_thresh);
        return GateOutcome {
            mask: intersect3(selected, &valid, &barrier),
            strategy: RefinementStrategy::from_options(options),
            seed_rgb: seed,
            base_tolerance: tol,
            small_object: true,
            reverted: false,
        };
    }

    let strategy = RefinementStrategy::from_options(options);
    let mut base_tol = strategy.base_tolerance(params);
    if vibrant {
        base_tol += params.vibrant_boost_standard;
    }
    let decay = DecayField {
        origin: Point2::new(reference.0 as f32, reference.1 as f32),
        max_distance: params.decay_distance_max,
        min_factor: params.decay_factor_min,
    };
    let valid = color_valid_hue(
        session,
        seed,
        params.hue_weight_standard,
        base_tol,
        Some(decay),
    );

    let mut barrier = edge_barrier(session, strategy.edge_threshold(params));
    if strategy.erodes_barrier() {
        // Thin the barrier so brick/stucco texture does not dam the flow.
        barrier = erode(&barrier, &Kernel::square(params.barrier_erode_kernel_px), 1);
    }

    let mask = match strategy.bridge_kernel(params) {
        None => intersect3(selected, &valid, &barrier),
        Some(bridge_px) => {
            // Connected flow: bridge small gaps in the gate, then keep only
            // the region reachable from the click.
            let mut flow = valid.clone();
            flow.intersect(&barrier);
            let bridged = close(&flow, &Kernel::ellipse(bridge_px), 1);
            let connected = flood_fill(&bridged, reference);
            debug!(
                "refine: bridged flow {} px, connected {} px",
                bridged.area(),
                connected.area()
            );
            close(&connected, &Kernel::ellipse(strategy.smooth_kernel(params)), 1)
        }
    };

    GateOutcome {
        mask,
        strategy,
        seed_rgb: seed,
        base_tolerance: base_tol,
        small_object: false,
        reverted: false,
    }
}

/// Gate the selected candidate against the session's feature buffers.
pub fn refine_region(
    selected: &Mask,
    session: &ImageSession,
    prompt: &Prompt,
    reference: (i32, i32),
    options: &RefinementOptions,
    params: &RefinerParams,
) -> GateOutcome {
    if prompt.is_box() {
        return refine_box(selected, session, reference, params);
    }

    let mut outcome = match options.level {
        Some(Granularity::Standard) => {
            refine_standard_point(selected, session, reference, options, params)
        }
        Some(Granularity::FineDetail) => {
            let seed = median_patch_color(&session.rgb, reference.0, reference.1);
            let valid = color_valid_plain(session, seed, params.color_tol_fine_level);
            let mut mask = selected.clone();
            mask.intersect(&valid);
            GateOutcome {
                mask,
                strategy: RefinementStrategy::Loose,
                seed_rgb: seed,
                base_tolerance: params.color_tol_fine_level,
                small_object: false,
                reverted: false,
            }
        }
        Some(Granularity::WholeObject) | None => {
            let seed = median_patch_color(&session.rgb, reference.0, reference.1);
            let valid = color_valid_plain(session, seed, params.color_tol_whole_level);
            let mut mask = selected.clone();
            mask.intersect(&valid);
            GateOutcome {
                mask,
                strategy: RefinementStrategy::Loose,
                seed_rgb: seed,
                base_tolerance: params.color_tol_whole_level,
                small_object: false,
                reverted: false,
            }
        }
    };

    // The exact click location must survive gating.
    outcome
        .mask
        .fill_circle(reference.0, reference.1, params.click_preserve_radius);
    outcome
}
