//! Refinement strategy selection.
//!
//! The pipeline used to exist as two near-identical engine copies whose branch
//! trees drifted apart; the tagged strategy collapses them into one table of
//! per-mode knobs.

use super::options::{Granularity, RefinementOptions, RefinerParams};
use serde::Serialize;

/// How aggressively the gated region may deviate from the model candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RefinementStrategy {
    /// Stay inside the candidate; strict tolerance, intact edge barrier.
    Precise,
    /// Wall-only gating: thinned barrier and gap bridging at moderate reach.
    WallStandard,
    /// Full wall-click mode: widest tolerance, merge + bridge + flood fill.
    WallClick,
    /// Fine-detail / whole-object levels: plain color gate, no barrier.
    Loose,
}

impl RefinementStrategy {
    /// Strategy implied by the per-call options.
    pub fn from_options(options: &RefinementOptions) -> Self {
        match options.level {
            Some(Granularity::Standard) => {
                if options.is_wall_click {
                    Self::WallClick
                } else if options.is_wall_only {
                    Self::WallStandard
                } else {
                    Self::Precise
                }
            }
            Some(Granularity::FineDetail) | Some(Granularity::WholeObject) | None => Self::Loose,
        }
    }

    /// Base color tolerance of the standard/large-surface branch.
    pub fn base_tolerance(self, params: &RefinerParams) -> f32 {
        match self {
            Self::WallClick => params.color_tol_wall_click,
            Self::WallStandard => params.color_tol_wall_only,
            Self::Precise | Self::Loose => params.color_tol_standard_wall,
        }
    }

    /// Edge threshold of the standard/large-surface branch.
    pub fn edge_threshold(self, params: &RefinerParams) -> u8 {
        match self {
            Self::WallClick => params.edge_thresh_wall_click,
            Self::WallStandard => params.edge_thresh_wall_only,
            Self::Precise | Self::Loose => params.edge_thresh_standard_wall,
        }
    }

    /// Wall modes thin the barrier so fine texture (brick, stucco) does not
    /// stop the flow.
    pub fn erodes_barrier(self) -> bool {
        matches!(self, Self::WallClick | Self::WallStandard)
    }

    /// Gap-bridging closing diameter, when the strategy bridges at all.
    pub fn bridge_kernel(self, params: &RefinerParams) -> Option<usize> {
        match self {
            Self::WallClick => Some(params.bridge_kernel_wall_click),
            Self::WallStandard => Some(params.bridge_kernel_wall_only),
            Self::Precise | Self::Loose => None,
        }
    }

    /// Post-flood smoothing diameter for the bridging strategies.
    pub fn smooth_kernel(self, params: &RefinerParams) -> usize {
        match self {
            Self::WallClick => params.smooth_kernel_wall_click,
            _ => params.smooth_kernel_wall_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_pick_the_wall_strategies() {
        let mut o = RefinementOptions::standard();
        assert_eq!(RefinementStrategy::from_options(&o), RefinementStrategy::Precise);
        o.is_wall_only = true;
        assert_eq!(
            RefinementStrategy::from_options(&o),
            RefinementStrategy::WallStandard
        );
        o.is_wall_click = true;
        assert_eq!(
            RefinementStrategy::from_options(&o),
            RefinementStrategy::WallClick
        );
    }

    #[test]
    fn non_standard_levels_are_loose() {
        assert_eq!(
            RefinementStrategy::from_options(&RefinementOptions::fine_detail()),
            RefinementStrategy::Loose
        );
        assert_eq!(
            RefinementStrategy::from_options(&RefinementOptions::default()),
            RefinementStrategy::Loose
        );
    }
}
