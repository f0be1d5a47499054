//! Error types for the mask refinement engine.

use thiserror::Error;

/// Errors surfaced by [`MaskEngine`](crate::MaskEngine) operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// `generate_mask` was called before any image was bound.
    #[error("no image session is bound; call bind_image first")]
    SessionNotBound,

    /// The supplied session is not the one currently bound to the engine.
    #[error("stale image session: bound version {bound}, supplied version {supplied}")]
    SessionMismatch { bound: u64, supplied: u64 },

    /// The candidate provider failed or violated its output contract.
    #[error("candidate provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Prompt geometry that survived caller-side validation but is unusable.
    #[error("invalid prompt: {0}")]
    InvalidPrompt(String),
}

/// Failure reported by a [`CandidateMaskProvider`](crate::CandidateMaskProvider)
/// or by the engine-side normalization of its output.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
