//! Candidate selection: one working mask out of the provider's three.
//!
//! Level heuristics pick a candidate index, merge several wall fragments, or
//! run the door/window classifier with its safety-margin erosion. Selection
//! never fails; degenerate inputs fall through to score-based choices.

pub mod door;

use crate::engine::options::{Granularity, RefinementOptions, RefinerParams};
use crate::mask::Mask;
use crate::morph::{erode, Kernel};
use crate::prompt::Prompt;
use crate::provider::{CandidateMaskSet, CANDIDATE_COUNT};
use self::door::{CandidateShape, DoorWindowScorer};
use log::debug;

/// Selection result plus the trace fields the diagnostics report.
#[derive(Clone, Debug)]
pub struct SelectionOutcome {
    pub mask: Mask,
    /// Chosen candidate index; `None` when several were merged.
    pub chosen: Option<usize>,
    /// Number of candidates merged in wall-click mode.
    pub merged: usize,
    /// Door/window score of the winning candidate, when the classifier ran.
    pub door_score: Option<i32>,
    /// Whether the safety-margin erosion was applied.
    pub eroded: bool,
}

/// Shape characteristics of candidate `idx`, or `None` for an empty mask.
fn candidate_shape(mask: &Mask) -> Option<CandidateShape> {
    let area_px = mask.area();
    if area_px == 0 {
        return None;
    }
    let (w, h) = mask.dims();
    let (x0, y0, x1, y1) = mask.bounding_box().expect("non-empty mask");
    let bb_w = (x1 - x0 + 1).max(1);
    let bb_h = y1 - y0 + 1;
    Some(CandidateShape {
        area_px,
        area_ratio: area_px as f32 / (w * h).max(1) as f32,
        aspect_ratio: bb_h as f32 / bb_w as f32,
        width_ratio: bb_w as f32 / w.max(1) as f32,
    })
}

/// Box-prompt rule shared by level `Standard` and the no-level default:
/// the holistic candidate when its score is trustworthy, else the middle one.
fn select_for_box(set: &CandidateMaskSet, params: &RefinerParams) -> SelectionOutcome {
    let idx = if set.scores[2] > params.min_score { 2 } else { 1 };
    SelectionOutcome {
        mask: set.masks[idx].clone(),
        chosen: Some(idx),
        merged: 0,
        door_score: None,
        eroded: false,
    }
}

/// Default point rule: the most granular candidate, unless it is noise.
fn select_granular_or_best(set: &CandidateMaskSet, params: &RefinerParams) -> SelectionOutcome {
    let idx = if set.masks[0].area() < params.min_mask_area_px {
        set.best_score_index()
    } else {
        0
    };
    SelectionOutcome {
        mask: set.masks[idx].clone(),
        chosen: Some(idx),
        merged: 0,
        door_score: None,
        eroded: false,
    }
}

/// Wall-click merge: OR every plausibly wall-sized, sufficiently confident
/// candidate so disjoint wall faces all survive selection.
fn select_wall_merge(set: &CandidateMaskSet, params: &RefinerParams) -> SelectionOutcome {
    let (w, h) = set.masks[0].dims();
    let image_area = (w * h).max(1) as f32;
    let mut combined = Mask::new(w, h);
    let mut merged = 0usize;

    // High-to-low score order, as the fragments were originally accumulated.
    let mut order: Vec<usize> = (0..CANDIDATE_COUNT).collect();
    order.sort_by(|&a, &b| set.scores[b].partial_cmp(&set.scores[a]).unwrap_or(std::cmp::Ordering::Equal));

    for idx in order {
        let ratio = set.masks[idx].area() as f32 / image_area;
        if ratio > params.merge_area_ratio_min
            && ratio < params.merge_area_ratio_max
            && set.scores[idx] > params.min_score
        {
            combined.union(&set.masks[idx]);
            merged += 1;
        }
    }

    if merged > 0 {
        debug!("selector: merged {merged} wall candidates");
        SelectionOutcome {
            mask: combined,
            chosen: None,
            merged,
            door_score: None,
            eroded: false,
        }
    } else {
        let idx = set.best_score_index();
        debug!("selector: no mergeable wall candidate, falling back to score index {idx}");
        SelectionOutcome {
            mask: set.masks[idx].clone(),
            chosen: Some(idx),
            merged: 0,
            door_score: None,
            eroded: false,
        }
    }
}

/// Standard point selection: classify all three candidates, keep the most
/// door/window-like one, erode a safety margin for confident detections and
/// fall back to the granular candidate when nothing looks like a door.
fn select_with_door_scorer(
    set: &CandidateMaskSet,
    params: &RefinerParams,
    scorer: &dyn DoorWindowScorer,
) -> SelectionOutcome {
    let mut best_idx = 0usize;
    let mut best_score = -1i32;
    for idx in 0..CANDIDATE_COUNT {
        let Some(shape) = candidate_shape(&set.masks[idx]) else {
            continue;
        };
        let score = scorer.score(&shape);
        debug!(
            "selector: candidate {idx} area={:.1}% aspect={:.2} width={:.1}% door_score={score}",
            shape.area_ratio * 100.0,
            shape.aspect_ratio,
            shape.width_ratio * 100.0
        );
        if score > best_score {
            best_score = score;
            best_idx = idx;
        }
    }

    let mut mask = set.masks[best_idx].clone();
    let mut eroded = false;

    if best_score >= params.door.erosion_trigger {
        // A confident door/window: shave a margin so the paint cannot bleed
        // onto the neighboring wall.
        if let Some(shape) = candidate_shape(&mask) {
            let iterations = params.door.erosion_iterations(shape.area_ratio);
            let kernel = Kernel::ellipse(params.door.erode_kernel_px);
            mask = erode(&mask, &kernel, iterations);
            eroded = true;
            debug!(
                "selector: door margin erosion kernel={} iterations={iterations}",
                params.door.erode_kernel_px
            );
        }
    } else if best_score < params.door.fallback_below {
        let fallback = select_granular_or_best(set, params);
        return SelectionOutcome {
            door_score: Some(best_score),
            ..fallback
        };
    }

    SelectionOutcome {
        mask,
        chosen: Some(best_idx),
        merged: 0,
        door_score: Some(best_score),
        eroded,
    }
}

/// Fine-detail rule: the granular candidate, unless it is so small that the
/// sub-segment candidate is clearly the intended object.
fn select_fine_detail(set: &CandidateMaskSet, params: &RefinerParams) -> SelectionOutcome {
    let area0 = set.masks[0].area();
    let area1 = set.masks[1].area();
    let near_empty = area0 < params.min_mask_area_px * params.fine_level_area_factor;
    let idx = if near_empty && area1 > area0 * 2 { 1 } else { 0 };
    SelectionOutcome {
        mask: set.masks[idx].clone(),
        chosen: Some(idx),
        merged: 0,
        door_score: None,
        eroded: false,
    }
}

/// Choose one working mask from the candidate set.
pub fn select_candidate(
    set: &CandidateMaskSet,
    prompt: &Prompt,
    options: &RefinementOptions,
    params: &RefinerParams,
    scorer: &dyn DoorWindowScorer,
) -> SelectionOutcome {
    match options.level {
        Some(Granularity::Standard) => {
            if prompt.is_box() {
                select_for_box(set, params)
            } else if options.is_wall_click {
                select_wall_merge(set, params)
            } else {
                select_with_door_scorer(set, params, scorer)
            }
        }
        Some(Granularity::FineDetail) => select_fine_detail(set, params),
        Some(Granularity::WholeObject) => SelectionOutcome {
            mask: set.masks[2].clone(),
            chosen: Some(2),
            merged: 0,
            door_score: None,
            eroded: false,
        },
        None => {
            if prompt.is_box() {
                select_for_box(set, params)
            } else {
                select_granular_or_best(set, params)
            }
        }
    }
}
