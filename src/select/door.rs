//! Hand-tuned additive door/window classifier.
//!
//! Doors and windows photographed indoors are small, tall and narrow relative
//! to the frame; the scorer awards points per band and the selector treats a
//! high total as "this candidate is the door, not the wall behind it". The
//! trait seam lets a learned classifier replace the bands without touching
//! selection.

use serde::Deserialize;

/// Shape characteristics of one candidate mask.
#[derive(Clone, Copy, Debug)]
pub struct CandidateShape {
    /// Foreground pixel count.
    pub area_px: usize,
    /// Foreground area over frame area.
    pub area_ratio: f32,
    /// Bounding-box height over width.
    pub aspect_ratio: f32,
    /// Bounding-box width over frame width.
    pub width_ratio: f32,
}

/// Scores how door/window-like a candidate mask is.
pub trait DoorWindowScorer {
    fn score(&self, shape: &CandidateShape) -> i32;
}

/// One additive band: `points` awarded when the feature passes `limit`.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ScoreBand {
    pub limit: f32,
    pub points: i32,
}

/// Bands and erosion plan of the additive classifier.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DoorScoreOptions {
    /// Area-ratio bands, checked in order; first `area_ratio < limit` wins.
    pub area_bands: Vec<ScoreBand>,
    /// Aspect-ratio bands; first `aspect_ratio > limit` wins.
    pub aspect_bands: Vec<ScoreBand>,
    /// Width-ratio bands; first `width_ratio < limit` wins.
    pub width_bands: Vec<ScoreBand>,
    /// Total score at which the safety-margin erosion kicks in.
    pub erosion_trigger: i32,
    /// Total score below which the candidate does not look like a door.
    pub fallback_below: i32,
    /// Erosion kernel diameter (elliptical).
    pub erode_kernel_px: usize,
}

impl Default for DoorScoreOptions {
    fn default() -> Self {
        Self {
            area_bands: vec![
                ScoreBand { limit: 0.05, points: 5 },
                ScoreBand { limit: 0.10, points: 3 },
                ScoreBand { limit: 0.15, points: 1 },
            ],
            aspect_bands: vec![
                ScoreBand { limit: 2.0, points: 5 },
                ScoreBand { limit: 1.5, points: 3 },
                ScoreBand { limit: 1.3, points: 1 },
            ],
            width_bands: vec![
                ScoreBand { limit: 0.15, points: 3 },
                ScoreBand { limit: 0.25, points: 2 },
                ScoreBand { limit: 0.30, points: 1 },
            ],
            erosion_trigger: 5,
            fallback_below: 3,
            erode_kernel_px: 3,
        }
    }
}

impl DoorScoreOptions {
    /// Erosion iterations for a detected door/window, scaled to its size.
    /// Smaller objects get a relatively stronger margin; the very smallest
    /// stay at one pass so lattice detail survives.
    pub fn erosion_iterations(&self, area_ratio: f32) -> usize {
        if area_ratio < 0.05 {
            1
        } else if area_ratio < 0.10 {
            2
        } else {
            1
        }
    }
}

/// The default fixed-band scorer.
#[derive(Clone, Debug, Default)]
pub struct AdditiveDoorScorer {
    pub options: DoorScoreOptions,
}

impl AdditiveDoorScorer {
    pub fn new(options: DoorScoreOptions) -> Self {
        Self { options }
    }
}

impl DoorWindowScorer for AdditiveDoorScorer {
    fn score(&self, shape: &CandidateShape) -> i32 {
        let mut score = 0;
        for band in &self.options.area_bands {
            if shape.area_ratio < band.limit {
                score += band.points;
                break;
            }
        }
        for band in &self.options.aspect_bands {
            if shape.aspect_ratio > band.limit {
                score += band.points;
                break;
            }
        }
        for band in &self.options.width_bands {
            if shape.width_ratio < band.limit {
                score += band.points;
                break;
            }
        }
        score
    }
}
