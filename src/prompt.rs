//! User prompt types and their normalization into the provider's input shape.
//!
//! A prompt arrives as a single click, a set of labeled clicks, or a box drawn
//! on the photograph. The provider expects point lists with one label per point
//! plus an optional box, so single points are wrapped and missing labels default
//! to all-positive. Geometry is validated upstream; the normalizer re-checks the
//! cheap invariants defensively.

use crate::error::EngineError;
use serde::Deserialize;

/// A user prompt in source-image pixel coordinates.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    /// A single positive click.
    Point { x: i32, y: i32 },
    /// Several clicks with per-point labels (1 = foreground, 0 = background).
    MultiPoint { points: Vec<(i32, i32)>, labels: Vec<u8> },
    /// An axis-aligned box with `x2 > x1`, `y2 > y1`.
    Box { x1: i32, y1: i32, x2: i32, y2: i32 },
}

/// Prompt reshaped for [`CandidateMaskProvider::predict`](crate::CandidateMaskProvider::predict).
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedPrompt {
    pub points: Vec<(i32, i32)>,
    pub labels: Vec<u8>,
    pub bbox: Option<[i32; 4]>,
}

impl Prompt {
    /// Normalize into the provider shape, re-checking basic geometry.
    pub fn normalize(&self) -> Result<NormalizedPrompt, EngineError> {
        match self {
            Prompt::Point { x, y } => Ok(NormalizedPrompt {
                points: vec![(*x, *y)],
                labels: vec![1],
                bbox: None,
            }),
            Prompt::MultiPoint { points, labels } => {
                if points.is_empty() {
                    return Err(EngineError::InvalidPrompt("empty point list".into()));
                }
                if !labels.is_empty() && labels.len() != points.len() {
                    return Err(EngineError::InvalidPrompt(format!(
                        "{} points but {} labels",
                        points.len(),
                        labels.len()
                    )));
                }
                let labels = if labels.is_empty() {
                    vec![1u8; points.len()]
                } else {
                    labels.clone()
                };
                Ok(NormalizedPrompt {
                    points: points.clone(),
                    labels,
                    bbox: None,
                })
            }
            Prompt::Box { x1, y1, x2, y2 } => {
                if x2 <= x1 || y2 <= y1 {
                    return Err(EngineError::InvalidPrompt(format!(
                        "degenerate box ({x1},{y1})-({x2},{y2})"
                    )));
                }
                Ok(NormalizedPrompt {
                    points: Vec::new(),
                    labels: Vec::new(),
                    bbox: Some([*x1, *y1, *x2, *y2]),
                })
            }
        }
    }

    pub fn is_box(&self) -> bool {
        matches!(self, Prompt::Box { .. })
    }

    pub fn bbox(&self) -> Option<[i32; 4]> {
        match self {
            Prompt::Box { x1, y1, x2, y2 } => Some([*x1, *y1, *x2, *y2]),
            _ => None,
        }
    }

    /// Reference point anchoring refinement and connectivity filtering:
    /// the last positive click, or the box center. `None` when every click is
    /// a background label; refinement has nothing to anchor to and is skipped.
    pub fn reference_point(&self) -> Option<(i32, i32)> {
        match self {
            Prompt::Point { x, y } => Some((*x, *y)),
            Prompt::MultiPoint { points, labels } => {
                let mut last = None;
                for (i, p) in points.iter().enumerate() {
                    // Missing labels default to positive, matching normalize().
                    if labels.get(i).copied().unwrap_or(1) == 1 {
                        last = Some(*p);
                    }
                }
                last
            }
            Prompt::Box { x1, y1, x2, y2 } => Some(((x1 + x2) / 2, (y1 + y2) / 2)),
        }
    }
}
