//! Engine orchestrating the end-to-end refinement pipeline.
//!
//! The [`MaskEngine`] exposes a small API: bind a photograph once, then answer
//! prompts with refined masks. Internally it coordinates prompt normalization,
//! the provider call, candidate selection, color/edge gating, morphological
//! cleanup, the refinement adoption rule and connectivity filtering, capturing
//! a structured trace with per-stage timings.
//!
//! Typical usage:
//! ```no_run
//! use mask_refiner::prelude::*;
//!
//! # fn example(photo: ImageRgb8, provider: PrecomputedProvider) -> Result<(), mask_refiner::EngineError> {
//! let mut engine = MaskEngine::new(provider, RefinerParams::default());
//! let session = engine.bind_image(photo)?;
//! let report = engine.generate_mask(
//!     &session,
//!     &Prompt::Point { x: 120, y: 200 },
//!     &RefinementOptions::wall_click(),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod options;
pub mod strategy;

use crate::cleanup::cleanup_mask;
use crate::components::{filter_box, filter_point, FilterOutcome};
use crate::diagnostics::{
    CleanupStage, ComponentStage, GateStage, InputDescriptor, MaskReport, PipelineTrace,
    PromptKind, SelectionStage, TimingBreakdown,
};
use crate::error::EngineError;
use crate::image::ImageRgb8;
use crate::mask::Mask;
use crate::prompt::Prompt;
use crate::provider::{normalize_candidates, CandidateMaskProvider};
use crate::refine::refine_region;
use crate::select::door::{AdditiveDoorScorer, DoorWindowScorer};
use crate::select::select_candidate;
use crate::session::ImageSession;
use log::debug;
use self::options::{RefinementOptions, RefinerParams};
use std::sync::Arc;
use std::time::Instant;

/// Refinement engine bound to one candidate provider.
pub struct MaskEngine<P: CandidateMaskProvider> {
    provider: P,
    params: RefinerParams,
    scorer: Box<dyn DoorWindowScorer + Send + Sync>,
    bound: Option<Arc<ImageSession>>,
    next_version: u64,
}

impl<P: CandidateMaskProvider> MaskEngine<P> {
    /// Create an engine with the supplied provider and parameters.
    pub fn new(provider: P, params: RefinerParams) -> Self {
        let scorer = Box::new(AdditiveDoorScorer::new(params.door.clone()));
        Self {
            provider,
            params,
            scorer,
            bound: None,
            next_version: 0,
        }
    }

    /// Replace the door/window scoring strategy.
    pub fn with_scorer(mut self, scorer: Box<dyn DoorWindowScorer + Send + Sync>) -> Self {
        self.scorer = scorer;
        self
    }

    /// The currently bound session, if any.
    pub fn session(&self) -> Option<&Arc<ImageSession>> {
        self.bound.as_ref()
    }

    /// Bind a photograph: precompute feature buffers and embed the image into
    /// the provider. Binding a bit-identical image is a no-op returning the
    /// existing session (observable through `Arc::ptr_eq`).
    pub fn bind_image(&mut self, rgb: ImageRgb8) -> Result<Arc<ImageSession>, EngineError> {
        if let Some(current) = &self.bound {
            if current.rgb == rgb {
                debug!("bind_image: identical image, reusing session v{}", current.version);
                return Ok(current.clone());
            }
        }
        let version = self.next_version;
        self.next_version += 1;
        let session = Arc::new(ImageSession::build(rgb, version));
        self.provider.embed(&session.rgb)?;
        debug!(
            "bind_image: session v{version} ({}x{})",
            session.width(),
            session.height()
        );
        self.bound = Some(session.clone());
        Ok(session)
    }

    /// Run the full pipeline for one prompt against the bound session.
    ///
    /// Returns `mask: None` when the candidate set is degenerate or the final
    /// mask is empty; the caller owns the user-facing messaging for that case.
    pub fn generate_mask(
        &mut self,
        session: &ImageSession,
        prompt: &Prompt,
        options: &RefinementOptions,
    ) -> Result<MaskReport, EngineError> {
        let bound = self.bound.as_ref().ok_or(EngineError::SessionNotBound)?;
        if bound.version != session.version {
            return Err(EngineError::SessionMismatch {
                bound: bound.version,
                supplied: session.version,
            });
        }

        let total_start = Instant::now();
        let (w, h) = (session.width(), session.height());
        let prompt_kind = match prompt {
            Prompt::Point { .. } => PromptKind::Point,
            Prompt::MultiPoint { .. } => PromptKind::MultiPoint,
            Prompt::Box { .. } => PromptKind::Box,
        };
        let mut trace = PipelineTrace {
            input: InputDescriptor::new(w, h, prompt_kind, options),
            timings: TimingBreakdown::default(),
            selection: None,
            gate: None,
            cleanup: None,
            components: None,
        };

        let normalized = prompt.normalize()?;
        let stage_start = Instant::now();
        let raw = self.provider.predict(&normalized)?;
        trace.timings.push("predict", elapsed_ms(stage_start));

        let Some(set) = normalize_candidates(raw, w, h)? else {
            debug!("generate_mask: degenerate candidate set");
            trace.timings.total_ms = elapsed_ms(total_start);
            return Ok(MaskReport { mask: None, trace });
        };

        let stage_start = Instant::now();
        let selection = select_candidate(&set, prompt, options, &self.params, self.scorer.as_ref());
        trace.timings.push("select", elapsed_ms(stage_start));
        let selected_area = selection.mask.area();
        trace.selection = Some(SelectionStage {
            chosen: selection.chosen,
            merged: selection.merged,
            door_score: selection.door_score,
            eroded: selection.eroded,
            scores: set.scores,
            areas: [
                set.masks[0].area(),
                set.masks[1].area(),
                set.masks[2].area(),
            ],
            selected_area,
        });

        if !options.cleanup {
            trace.timings.total_ms = elapsed_ms(total_start);
            return Ok(MaskReport {
                mask: non_empty(selection.mask),
                trace,
            });
        }

        // Background-only prompts have nothing to anchor refinement to;
        // the raw selection is the answer.
        let Some(reference) = prompt.reference_point() else {
            trace.timings.total_ms = elapsed_ms(total_start);
            return Ok(MaskReport {
                mask: non_empty(selection.mask),
                trace,
            });
        };

        let stage_start = Instant::now();
        let gate = refine_region(
            &selection.mask,
            session,
            prompt,
            reference,
            options,
            &self.params,
        );
        trace.timings.push("gate", elapsed_ms(stage_start));
        trace.gate = Some(GateStage {
            strategy: gate.strategy,
            seed_rgb: gate.seed_rgb,
            base_tolerance: gate.base_tolerance,
            small_object: gate.small_object,
            gated_area: gate.mask.area(),
            reverted: gate.reverted,
        });

        let stage_start = Instant::now();
        let cleaned = cleanup_mask(
            &gate.mask,
            session,
            prompt.is_box(),
            options,
            gate.small_object,
            &self.params,
        );
        trace.timings.push("cleanup", elapsed_ms(stage_start));

        // Adoption rule: a refinement that nearly erased the candidate points
        // at a wrong seed color; keep the candidate instead.
        let refined_area = cleaned.mask.area();
        let adopted = refined_area > self.params.min_mask_area_px
            && refined_area as f32 >= selected_area as f32 * self.params.refine_keep_ratio;
        trace.cleanup = Some(CleanupStage {
            applied: cleaned.applied,
            close_iterations: cleaned.close_iterations,
            holes_filled: cleaned.holes_filled,
            adopted,
        });
        let working = if adopted {
            cleaned.mask
        } else {
            debug!(
                "generate_mask: refinement kept {refined_area} of {selected_area} px, discarded"
            );
            selection.mask
        };

        let stage_start = Instant::now();
        let FilterOutcome {
            mask: final_mask,
            total,
            kept,
            largest_fallback,
        } = match prompt.bbox() {
            Some(bbox) => filter_box(&working, bbox, &self.params),
            None => filter_point(&working, reference, options.is_wall_click, &self.params),
        };
        trace.timings.push("components", elapsed_ms(stage_start));
        trace.components = Some(ComponentStage {
            total,
            kept,
            dropped: total.saturating_sub(kept),
            largest_fallback,
        });

        trace.timings.total_ms = elapsed_ms(total_start);
        Ok(MaskReport {
            mask: non_empty(final_mask),
            trace,
        })
    }
}

fn non_empty(mask: Mask) -> Option<Mask> {
    if mask.is_empty() {
        None
    } else {
        Some(mask)
    }
}

#[inline]
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
