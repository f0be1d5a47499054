mod common;

use common::synthetic_image::{block_mask, half_mask, two_tone_rgb, BLUE, RED};
use mask_refiner::components::label_components;
use mask_refiner::prelude::*;
use mask_refiner::{EngineError, ImageSession, Mask};

fn engine_with(masks: Vec<Mask>, scores: Vec<f32>) -> MaskEngine<PrecomputedProvider> {
    MaskEngine::new(
        PrecomputedProvider::new(masks, scores),
        RefinerParams::default(),
    )
}

#[test]
fn wall_click_result_is_one_region_reachable_from_the_click() {
    let photo = two_tone_rgb(100, 100, 50, RED, BLUE);
    let left = half_mask(100, 100, 50);
    let far_blue = block_mask(100, 100, 70, 20, 95, 80);
    let mut engine = engine_with(
        vec![left, far_blue, Mask::new(100, 100)],
        vec![0.9, 0.5, 0.0],
    );
    let session = engine.bind_image(photo).unwrap();
    let report = engine
        .generate_mask(
            &session,
            &Prompt::Point { x: 25, y: 50 },
            &RefinementOptions::wall_click(),
        )
        .unwrap();
    let mask = report.mask.expect("a mask");
    assert_eq!(mask.dims(), (100, 100));

    // Flood fill seeded at the click guarantees a single component that
    // contains the reference point.
    let map = label_components(&mask);
    let click_label = map.label_at(25, 50);
    assert_ne!(click_label, 0, "click pixel must be foreground");
    for (i, &l) in map.labels.iter().enumerate() {
        if mask.data[i] != 0 {
            assert_eq!(l, click_label, "pixel {i} disconnected from the click");
        }
    }
    // The differently colored region cannot be reached.
    assert!(!mask.get(80, 50));
}

#[test]
fn refinement_never_keeps_less_than_a_tenth_of_the_candidate() {
    // Candidate sits entirely on the blue side while the click (and therefore
    // the seed color) is red: gating erases nearly everything and the
    // self-correcting fallback must return the unrefined candidate.
    let photo = two_tone_rgb(100, 100, 50, RED, BLUE);
    let blue_block = block_mask(100, 100, 60, 30, 90, 70);
    let mut engine = engine_with(
        vec![blue_block.clone(), Mask::new(100, 100), Mask::new(100, 100)],
        vec![0.9, 0.0, 0.0],
    );
    let session = engine.bind_image(photo).unwrap();
    let report = engine
        .generate_mask(
            &session,
            &Prompt::Point { x: 10, y: 10 },
            &RefinementOptions::standard(),
        )
        .unwrap();
    let mask = report.mask.expect("a mask");
    let candidate_area = blue_block.area();
    assert!(
        mask.area() == candidate_area || mask.area() * 10 >= candidate_area,
        "mask area {} violates the fallback invariant against candidate {}",
        mask.area(),
        candidate_area
    );
    // Here the discarded refinement means the candidate itself survives.
    assert_eq!(mask, blue_block);
}

#[test]
fn generate_before_bind_fails_fast() {
    let mut engine = engine_with(vec![], vec![]);
    let foreign = ImageSession::build(two_tone_rgb(16, 16, 8, RED, BLUE), 0);
    let err = engine
        .generate_mask(
            &foreign,
            &Prompt::Point { x: 1, y: 1 },
            &RefinementOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::SessionNotBound));
}

#[test]
fn stale_session_is_rejected() {
    let mut engine = engine_with(
        vec![Mask::new(16, 16), Mask::new(16, 16), Mask::new(16, 16)],
        vec![0.5, 0.5, 0.5],
    );
    let first = engine.bind_image(two_tone_rgb(16, 16, 8, RED, BLUE)).unwrap();
    let _second = engine.bind_image(two_tone_rgb(16, 16, 4, RED, BLUE)).unwrap();
    let err = engine
        .generate_mask(
            &first,
            &Prompt::Point { x: 1, y: 1 },
            &RefinementOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::SessionMismatch { .. }));
}

#[test]
fn invalid_box_geometry_is_rejected() {
    let mut engine = engine_with(
        vec![Mask::new(16, 16), Mask::new(16, 16), Mask::new(16, 16)],
        vec![0.5, 0.5, 0.5],
    );
    let session = engine.bind_image(two_tone_rgb(16, 16, 8, RED, BLUE)).unwrap();
    let err = engine
        .generate_mask(
            &session,
            &Prompt::Box {
                x1: 8,
                y1: 8,
                x2: 8,
                y2: 12,
            },
            &RefinementOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidPrompt(_)));
}

#[test]
fn every_result_matches_the_image_shape() {
    let photo = two_tone_rgb(73, 41, 30, RED, BLUE);
    let candidate = block_mask(73, 41, 5, 5, 25, 35);
    let mut engine = engine_with(
        vec![candidate.clone(), candidate.clone(), candidate],
        vec![0.8, 0.7, 0.6],
    );
    let session = engine.bind_image(photo).unwrap();
    let prompts = [
        Prompt::Point { x: 10, y: 20 },
        Prompt::Box {
            x1: 5,
            y1: 5,
            x2: 25,
            y2: 35,
        },
    ];
    let options = [
        RefinementOptions::default(),
        RefinementOptions::standard(),
        RefinementOptions::wall_click(),
        RefinementOptions::fine_detail(),
    ];
    for prompt in &prompts {
        for opts in &options {
            let report = engine.generate_mask(&session, prompt, opts).unwrap();
            if let Some(mask) = report.mask {
                assert_eq!(mask.dims(), (73, 41));
            }
        }
    }
}
