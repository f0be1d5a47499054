//! Offline demo: run the refinement pipeline on a photograph with candidate
//! masks exported from an external predictor.
//!
//! Usage: `mask_demo <config.json>`; see `config/demo.rs` for the schema.

use mask_refiner::config::load_config;
use mask_refiner::image::io::{load_mask_image, load_rgb_image, save_mask_image, write_json_file};
use mask_refiner::{MaskEngine, PrecomputedProvider};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let Some(config_path) = std::env::args().nth(1) else {
        eprintln!("usage: mask_demo <config.json>");
        return ExitCode::FAILURE;
    };
    match run(Path::new(&config_path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mask_demo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> Result<(), String> {
    let config = load_config(config_path)?;
    let photo = load_rgb_image(&config.input)?;

    let masks = config
        .candidate_masks
        .iter()
        .map(|p| load_mask_image(p))
        .collect::<Result<Vec<_>, _>>()?;
    let provider = PrecomputedProvider::new(masks, config.candidate_scores.clone());

    let mut engine = MaskEngine::new(provider, config.params.clone());
    let session = engine
        .bind_image(photo)
        .map_err(|e| format!("bind failed: {e}"))?;
    let report = engine
        .generate_mask(&session, &config.prompt, &config.options)
        .map_err(|e| format!("generate failed: {e}"))?;

    write_json_file(&config.output.trace_json, &report.trace)?;
    match report.mask {
        Some(mask) => {
            save_mask_image(&mask, &config.output.mask_image)?;
            println!(
                "mask: {} px ({:.1}%) in {:.1} ms -> {}",
                mask.area(),
                mask.area_ratio() * 100.0,
                report.trace.timings.total_ms,
                config.output.mask_image.display()
            );
        }
        None => println!("no valid region established (trace written)"),
    }
    Ok(())
}
