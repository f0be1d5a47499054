//! Per-stage report structures.

use crate::engine::strategy::RefinementStrategy;
use serde::Serialize;

/// What the candidate selector decided.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStage {
    /// Chosen candidate index; absent when several candidates were merged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen: Option<usize>,
    /// Number of candidates merged in wall-click mode.
    pub merged: usize,
    /// Door/window score of the winner, when the classifier ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_score: Option<i32>,
    /// Whether the door safety-margin erosion was applied.
    pub eroded: bool,
    pub scores: [f32; 3],
    pub areas: [usize; 3],
    /// Selected mask area after erosion, the baseline for the adoption rule.
    pub selected_area: usize,
}

/// What the color/edge gate did.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateStage {
    pub strategy: RefinementStrategy,
    pub seed_rgb: [u8; 3],
    pub base_tolerance: f32,
    pub small_object: bool,
    pub gated_area: usize,
    /// Box-mode self-correcting fallback fired.
    pub reverted: bool,
}

/// What the morphological cleanup did.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupStage {
    pub applied: bool,
    pub close_iterations: usize,
    pub holes_filled: usize,
    /// Whether the refined mask replaced the candidate afterwards.
    pub adopted: bool,
}

/// What the connectivity filter kept and dropped.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStage {
    pub total: usize,
    pub kept: usize,
    pub dropped: usize,
    /// The reference pixel landed on background and the largest component won.
    pub largest_fallback: bool,
}
