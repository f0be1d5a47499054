//! Structured trace of one `generate_mask` run.
//!
//! Every pipeline stage reports what it decided (chosen candidate, strategy,
//! component counts) into a serializable trace instead of printing. The trace
//! rides along with the result so callers can log, persist or display it.

pub mod stages;
pub mod timing;

pub use self::stages::{CleanupStage, ComponentStage, GateStage, SelectionStage};
pub use self::timing::{StageTiming, TimingBreakdown};

use crate::engine::options::RefinementOptions;
use crate::mask::Mask;
use serde::Serialize;

/// Result of [`MaskEngine::generate_mask`](crate::MaskEngine::generate_mask):
/// the refined mask (when one could be established) plus the full trace.
#[derive(Clone, Debug)]
pub struct MaskReport {
    /// `None` when the candidate set was degenerate or refinement emptied out.
    pub mask: Option<Mask>,
    pub trace: PipelineTrace,
}

/// End-to-end trace describing the internal execution of one call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<CleanupStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentStage>,
}

/// Shape of the call: image dimensions plus the requested options.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub prompt_kind: PromptKind,
    pub level: Option<u8>,
    pub is_wall_only: bool,
    pub is_wall_click: bool,
    pub cleanup: bool,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptKind {
    Point,
    MultiPoint,
    Box,
}

impl InputDescriptor {
    pub fn new(
        width: usize,
        height: usize,
        prompt_kind: PromptKind,
        options: &RefinementOptions,
    ) -> Self {
        use crate::engine::options::Granularity;
        let level = options.level.map(|l| match l {
            Granularity::Standard => 0,
            Granularity::FineDetail => 1,
            Granularity::WholeObject => 2,
        });
        Self {
            width,
            height,
            prompt_kind,
            level,
            is_wall_only: options.is_wall_only,
            is_wall_click: options.is_wall_click,
            cleanup: options.cleanup,
        }
    }
}
