//! The promptable segmentation model behind a trait.
//!
//! The neural network that answers prompts with coarse candidate masks is an
//! external collaborator: the engine only requires an `embed` step bound to the
//! current photograph and a `predict` call yielding candidate masks with
//! confidence scores. Batch or singleton output shapes are normalized to
//! exactly three candidates before entering the pipeline.

use crate::error::ProviderError;
use crate::image::ImageRgb8;
use crate::mask::Mask;
use crate::prompt::NormalizedPrompt;

/// Number of candidates every pipeline stage operates on, ordered from
/// most granular to most holistic.
pub const CANDIDATE_COUNT: usize = 3;

/// Raw prediction output as returned by a provider implementation.
#[derive(Clone, Debug)]
pub struct RawCandidates {
    pub masks: Vec<Mask>,
    pub scores: Vec<f32>,
}

/// Exactly three candidate masks + scores, all matching the session shape.
#[derive(Clone, Debug)]
pub struct CandidateMaskSet {
    pub masks: [Mask; CANDIDATE_COUNT],
    pub scores: [f32; CANDIDATE_COUNT],
}

impl CandidateMaskSet {
    /// Index of the highest-scoring candidate.
    pub fn best_score_index(&self) -> usize {
        let mut best = 0usize;
        for i in 1..CANDIDATE_COUNT {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }
        best
    }
}

/// Promptable segmentation capability consumed by the engine.
///
/// Implementations wrap a SAM-family predictor (or precomputed outputs). The
/// engine calls `embed` once per bound image and `predict` once per
/// `generate_mask` invocation; no other statefulness is assumed.
pub trait CandidateMaskProvider {
    /// Bind the photograph the subsequent predictions refer to.
    fn embed(&mut self, image: &ImageRgb8) -> Result<(), ProviderError>;

    /// Produce candidate masks and confidence scores for a prompt.
    fn predict(&mut self, prompt: &NormalizedPrompt) -> Result<RawCandidates, ProviderError>;
}

/// Provider serving fixed, precomputed candidates regardless of the prompt.
///
/// Useful for offline runs against masks exported by an external predictor and
/// for deterministic tests of the refinement pipeline.
#[derive(Clone, Debug, Default)]
pub struct PrecomputedProvider {
    masks: Vec<Mask>,
    scores: Vec<f32>,
}

impl PrecomputedProvider {
    pub fn new(masks: Vec<Mask>, scores: Vec<f32>) -> Self {
        Self { masks, scores }
    }
}

impl CandidateMaskProvider for PrecomputedProvider {
    fn embed(&mut self, _image: &ImageRgb8) -> Result<(), ProviderError> {
        Ok(())
    }

    fn predict(&mut self, _prompt: &NormalizedPrompt) -> Result<RawCandidates, ProviderError> {
        Ok(RawCandidates {
            masks: self.masks.clone(),
            scores: self.scores.clone(),
        })
    }
}

/// Normalize a raw prediction to exactly [`CANDIDATE_COUNT`] candidates.
///
/// Returns `Ok(None)` for a degenerate zero-candidate output (the caller maps
/// this to a `None` mask). A singleton output is replicated; surplus candidates
/// are truncated. Mismatched score counts or mask shapes are contract
/// violations and fail fast.
pub fn normalize_candidates(
    raw: RawCandidates,
    width: usize,
    height: usize,
) -> Result<Option<CandidateMaskSet>, ProviderError> {
    let RawCandidates { mut masks, mut scores } = raw;
    if masks.is_empty() {
        return Ok(None);
    }
    if masks.len() != scores.len() {
        return Err(ProviderError::new(format!(
            "provider returned {} masks but {} scores",
            masks.len(),
            scores.len()
        )));
    }
    for (i, m) in masks.iter().enumerate() {
        if m.dims() != (width, height) {
            return Err(ProviderError::new(format!(
                "candidate {i} has shape {}x{}, session is {width}x{height}",
                m.w, m.h
            )));
        }
    }
    if masks.len() == 1 {
        let mask = masks.remove(0);
        let score = scores[0];
        return Ok(Some(CandidateMaskSet {
            masks: [mask.clone(), mask.clone(), mask],
            scores: [score; CANDIDATE_COUNT],
        }));
    }
    if masks.len() < CANDIDATE_COUNT {
        return Err(ProviderError::new(format!(
            "provider returned {} candidates, expected 1 or at least {CANDIDATE_COUNT}",
            masks.len()
        )));
    }
    masks.truncate(CANDIDATE_COUNT);
    scores.truncate(CANDIDATE_COUNT);
    let m2 = masks.pop().expect("three masks");
    let m1 = masks.pop().expect("two masks");
    let m0 = masks.pop().expect("one mask");
    Ok(Some(CandidateMaskSet {
        masks: [m0, m1, m2],
        scores: [scores[0], scores[1], scores[2]],
    }))
}
