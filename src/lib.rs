#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod image;
pub mod mask;
pub mod prompt;
pub mod provider;
pub mod session;

// Pipeline-stage modules – public for tools and tests, but considered
// unstable internals.
pub mod cleanup;
pub mod components;
pub mod config;
pub mod morph;
pub mod refine;
pub mod select;

// --- High-level re-exports -------------------------------------------------

// Main entry points: engine + options + report.
pub use crate::engine::options::{Granularity, RefinementOptions, RefinerParams};
pub use crate::engine::strategy::RefinementStrategy;
pub use crate::engine::MaskEngine;
pub use crate::error::{EngineError, ProviderError};

// The provider seam and the offline implementation shipped with the crate.
pub use crate::provider::{CandidateMaskProvider, CandidateMaskSet, PrecomputedProvider, RawCandidates};

// Core data types.
pub use crate::diagnostics::{MaskReport, PipelineTrace};
pub use crate::image::ImageRgb8;
pub use crate::mask::Mask;
pub use crate::prompt::Prompt;
pub use crate::session::ImageSession;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::engine::options::{Granularity, RefinementOptions, RefinerParams};
    pub use crate::engine::MaskEngine;
    pub use crate::image::ImageRgb8;
    pub use crate::mask::Mask;
    pub use crate::prompt::Prompt;
    pub use crate::provider::PrecomputedProvider;
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    // Stage runners.
    pub use crate::cleanup::{cleanup_mask, CleanupOutcome};
    pub use crate::components::{filter_box, filter_point, label_components, ComponentMap};
    pub use crate::refine::{refine_region, GateOutcome};
    pub use crate::select::{select_candidate, SelectionOutcome};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        CleanupStage, ComponentStage, GateStage, InputDescriptor, SelectionStage, StageTiming,
        TimingBreakdown,
    };
}
