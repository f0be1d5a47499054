use crate::engine::options::{RefinementOptions, RefinerParams};
use crate::prompt::Prompt;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DemoConfig {
    /// Source photograph.
    pub input: PathBuf,
    /// Grayscale PNGs of the three candidate masks, granular first.
    pub candidate_masks: Vec<PathBuf>,
    /// Confidence score per candidate mask.
    pub candidate_scores: Vec<f32>,
    pub prompt: Prompt,
    #[serde(default)]
    pub options: RefinementOptions,
    #[serde(default)]
    pub params: RefinerParams,
    pub output: DemoOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DemoOutputConfig {
    #[serde(rename = "mask_image")]
    pub mask_image: PathBuf,
    #[serde(rename = "trace_json")]
    pub trace_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
