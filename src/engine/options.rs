//! Parameter types configuring the refinement pipeline.
//!
//! This module groups the knobs for candidate selection, color/edge gating,
//! connected-flow bridging, cleanup and component filtering. The defaults were
//! hand-tuned against interior and exterior room photographs at roughly
//! 800 px working resolution; deployments at other resolutions should expect to
//! recalibrate the kernel sizes and the decay distance.

use crate::select::door::DoorScoreOptions;
use serde::Deserialize;

/// Selection granularity requested by the user.
///
/// Candidates arrive ordered from most granular to most holistic, so the level
/// roughly maps to a candidate index, with the heuristics in
/// [`select`](crate::select) refining that choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Walls, doors and windows: the full heuristic selection.
    Standard,
    /// Small objects and fine lattice detail; cleanup is skipped.
    FineDetail,
    /// The most holistic candidate.
    WholeObject,
}

/// Per-call refinement switches.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefinementOptions {
    /// Requested granularity; `None` auto-selects per prompt kind.
    pub level: Option<Granularity>,
    /// Tighter boundary gating for wall surfaces.
    pub is_wall_only: bool,
    /// Merge wall fragments and bridge gaps via flood fill.
    pub is_wall_click: bool,
    /// Run the refinement pipeline; `false` returns the raw candidate.
    pub cleanup: bool,
}

impl Default for RefinementOptions {
    fn default() -> Self {
        Self {
            level: None,
            is_wall_only: false,
            is_wall_click: false,
            cleanup: true,
        }
    }
}

impl RefinementOptions {
    /// Standard-level precise selection (doors, windows, furniture).
    pub fn standard() -> Self {
        Self {
            level: Some(Granularity::Standard),
            ..Self::default()
        }
    }

    /// Aggressive wall selection: candidate merging plus gap bridging.
    pub fn wall_click() -> Self {
        Self {
            level: Some(Granularity::Standard),
            is_wall_click: true,
            ..Self::default()
        }
    }

    /// Fine-detail selection preserving lattice/mesh structures.
    pub fn fine_detail() -> Self {
        Self {
            level: Some(Granularity::FineDetail),
            ..Self::default()
        }
    }
}

/// Pipeline-wide tuned parameters.
///
/// Every empirically calibrated constant lives here so deployments can override
/// them from JSON instead of patching code. Color tolerances are on the 0-255
/// channel scale; edge thresholds apply to the absolute Laplacian map; kernel
/// sizes are odd pixel diameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RefinerParams {
    // --- candidate selection ---
    /// Minimum provider confidence for a candidate to be trusted.
    pub min_score: f32,
    /// Masks below this pixel count are treated as noise.
    pub min_mask_area_px: usize,
    /// Multiplier on `min_mask_area_px` for the fine-detail near-empty check.
    pub fine_level_area_factor: usize,
    /// Wall-click merge accepts candidates with area ratio inside this band.
    pub merge_area_ratio_min: f32,
    pub merge_area_ratio_max: f32,
    /// Door/window classifier bands and erosion plan.
    pub door: DoorScoreOptions,

    // --- color gating ---
    pub color_tol_small_object: f32,
    pub color_tol_wall_only: f32,
    pub color_tol_standard_wall: f32,
    pub color_tol_wall_click: f32,
    pub color_tol_box_mode: f32,
    pub color_tol_fine_level: f32,
    pub color_tol_whole_level: f32,
    /// Seed saturation above which a surface counts as vibrant.
    pub vibrant_saturation_min: f32,
    pub vibrant_boost_small: f32,
    pub vibrant_boost_standard: f32,
    /// Hue share of the combined color distance (small-object branch).
    pub hue_weight_small: f32,
    /// Hue share of the combined color distance (standard branch).
    pub hue_weight_standard: f32,
    /// Candidates below this fraction of the frame take the small-object path.
    pub small_object_ratio: f32,
    /// Distance at which the color tolerance would decay to zero.
    pub decay_distance_max: f32,
    /// Floor of the decay factor; tolerance never drops below this share.
    pub decay_factor_min: f32,

    // --- edge barriers ---
    pub edge_thresh_small_object: u8,
    pub edge_thresh_wall_only: u8,
    pub edge_thresh_standard_wall: u8,
    pub edge_thresh_wall_click: u8,
    pub edge_thresh_box_mode: u8,
    /// Square kernel diameter thinning the barrier in wall modes.
    pub barrier_erode_kernel_px: usize,

    // --- connected-flow bridging ---
    pub bridge_kernel_wall_click: usize,
    pub bridge_kernel_wall_only: usize,
    pub smooth_kernel_wall_click: usize,
    pub smooth_kernel_wall_only: usize,
    /// Radius of the circle re-stamped at the click location after gating.
    pub click_preserve_radius: i32,

    // --- adoption ---
    /// Refinement keeping less than this share of the candidate is discarded.
    pub refine_keep_ratio: f32,

    // --- morphological cleanup ---
    /// Elliptical closing kernel diameter.
    pub morph_kernel_px: usize,
    /// Holes up to this fraction of the frame qualify for filling.
    pub noise_area_ratio: f32,
    /// Standard mode fills a hole only below this mean edge energy.
    pub hole_edge_mean_max: f32,

    // --- component filtering ---
    /// Box mode keeps components above this fraction of the frame.
    pub box_large_component_ratio: f32,
    /// Wall-click keeps components above this fraction of the frame.
    pub wall_click_component_min_ratio: f32,
    /// Standard mode keeps components above this share of the clicked one.
    pub component_min_ratio: f32,
    /// ... and within this distance of the click.
    pub component_max_distance_px: f32,
}

impl Default for RefinerParams {
    fn default() -> Self {
        Self {
            min_score: 0.1,
            min_mask_area_px: 50,
            fine_level_area_factor: 10,
            merge_area_ratio_min: 0.001,
            merge_area_ratio_max: 0.95,
            door: DoorScoreOptions::default(),

            color_tol_small_object: 50.0,
            color_tol_wall_only: 95.0,
            color_tol_standard_wall: 95.0,
            color_tol_wall_click: 120.0,
            color_tol_box_mode: 100.0,
            color_tol_fine_level: 45.0,
            color_tol_whole_level: 100.0,
            vibrant_saturation_min: 0.3,
            vibrant_boost_small: 15.0,
            vibrant_boost_standard: 10.0,
            hue_weight_small: 0.3,
            hue_weight_standard: 0.6,
            small_object_ratio: 0.03,
            decay_distance_max: 3000.0,
            decay_factor_min: 0.8,

            edge_thresh_small_object: 20,
            edge_thresh_wall_only: 25,
            edge_thresh_standard_wall: 35,
            edge_thresh_wall_click: 35,
            edge_thresh_box_mode: 15,
            barrier_erode_kernel_px: 3,

            bridge_kernel_wall_click: 21,
            bridge_kernel_wall_only: 17,
            smooth_kernel_wall_click: 9,
            smooth_kernel_wall_only: 7,
            click_preserve_radius: 2,

            refine_keep_ratio: 0.1,

            morph_kernel_px: 5,
            noise_area_ratio: 0.01,
            hole_edge_mean_max: 15.0,

            box_large_component_ratio: 0.05,
            wall_click_component_min_ratio: 0.005,
            component_min_ratio: 0.02,
            component_max_distance_px: 250.0,
        }
    }
}
