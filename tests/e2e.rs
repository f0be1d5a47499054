mod common;

use common::synthetic_image::{block_mask, half_mask, two_tone_rgb, BLUE, RED};
use mask_refiner::prelude::*;
use mask_refiner::Mask;

fn engine_with(
    masks: Vec<Mask>,
    scores: Vec<f32>,
) -> MaskEngine<PrecomputedProvider> {
    MaskEngine::new(
        PrecomputedProvider::new(masks, scores),
        RefinerParams::default(),
    )
}

#[test]
fn point_click_on_red_half_selects_exactly_that_half() {
    // Scenario: left half red, right half blue, perfect left-half candidate.
    let photo = two_tone_rgb(100, 100, 50, RED, BLUE);
    let left = half_mask(100, 100, 50);
    let mut engine = engine_with(
        vec![left.clone(), Mask::new(100, 100), Mask::new(100, 100)],
        vec![0.95, 0.0, 0.0],
    );
    let session = engine.bind_image(photo).unwrap();
    let report = engine
        .generate_mask(
            &session,
            &Prompt::Point { x: 25, y: 50 },
            &RefinementOptions::standard(),
        )
        .unwrap();
    let mask = report.mask.expect("a mask");
    assert_eq!(mask.dims(), (100, 100));
    assert_eq!(mask, left, "output must be exactly the red half");
}

#[test]
fn box_inside_red_region_yields_subset_of_the_box() {
    let photo = two_tone_rgb(100, 100, 50, RED, BLUE);
    let box_region = block_mask(100, 100, 10, 10, 40, 40);
    let mut engine = engine_with(
        vec![
            Mask::new(100, 100),
            Mask::new(100, 100),
            box_region.clone(),
        ],
        vec![0.0, 0.0, 0.9],
    );
    let session = engine.bind_image(photo).unwrap();
    let report = engine
        .generate_mask(
            &session,
            &Prompt::Box {
                x1: 10,
                y1: 10,
                x2: 40,
                y2: 40,
            },
            &RefinementOptions::standard(),
        )
        .unwrap();
    let mask = report.mask.expect("a mask");
    assert!(!mask.is_empty());
    for y in 0..100 {
        for x in 0..100 {
            if mask.get(x, y) {
                assert!(x < 50, "({x},{y}) outside the red region");
                assert!(
                    (10..40).contains(&x) && (10..40).contains(&y),
                    "({x},{y}) outside the box"
                );
            }
        }
    }
}

#[test]
fn fine_detail_level_falls_back_to_the_sub_segment_candidate() {
    // candidate 0 below the minimum-pixel threshold, candidate 1 far larger.
    let photo = two_tone_rgb(100, 100, 50, RED, BLUE);
    let tiny = block_mask(100, 100, 5, 5, 15, 15); // 100 px
    let sub = block_mask(100, 100, 0, 20, 40, 80); // 2400 px, red side
    let mut engine = engine_with(
        vec![tiny, sub.clone(), Mask::new(100, 100)],
        vec![0.9, 0.5, 0.1],
    );
    let session = engine.bind_image(photo).unwrap();
    let report = engine
        .generate_mask(
            &session,
            &Prompt::Point { x: 20, y: 50 },
            &RefinementOptions::fine_detail(),
        )
        .unwrap();
    let mask = report.mask.expect("a mask");
    assert_eq!(mask, sub, "selector must choose the sub-segment candidate");
}

#[test]
fn wall_click_merges_both_disjoint_candidates() {
    // Area ratios 0.05 and 0.20, both above the minimum score: the raw
    // selection (cleanup disabled) must be their union.
    let photo = two_tone_rgb(100, 100, 50, RED, BLUE);
    let frag_a = block_mask(100, 100, 0, 0, 25, 20); // 500 px
    let frag_b = block_mask(100, 100, 10, 40, 50, 90); // 2000 px
    let mut engine = engine_with(
        vec![frag_a.clone(), frag_b.clone(), Mask::new(100, 100)],
        vec![0.9, 0.8, 0.0],
    );
    let session = engine.bind_image(photo).unwrap();
    let mut options = RefinementOptions::wall_click();
    options.cleanup = false;
    let report = engine
        .generate_mask(&session, &Prompt::Point { x: 12, y: 10 }, &options)
        .unwrap();
    let mask = report.mask.expect("a mask");
    let mut expected = frag_a;
    expected.union(&frag_b);
    assert_eq!(mask, expected);
}

#[test]
fn last_positive_point_anchors_the_refinement() {
    let photo = two_tone_rgb(100, 100, 50, RED, BLUE);
    let left = half_mask(100, 100, 50);
    let mut engine = engine_with(
        vec![left.clone(), Mask::new(100, 100), Mask::new(100, 100)],
        vec![0.95, 0.0, 0.0],
    );
    let session = engine.bind_image(photo).unwrap();
    let prompt = Prompt::MultiPoint {
        points: vec![(80, 50), (25, 50)],
        labels: vec![0, 1],
    };
    let report = engine
        .generate_mask(&session, &prompt, &RefinementOptions::standard())
        .unwrap();
    assert_eq!(report.mask.expect("a mask"), left);
}

#[test]
fn degenerate_candidates_produce_null() {
    let photo = two_tone_rgb(64, 64, 32, RED, BLUE);
    // All-empty candidate masks.
    let mut engine = engine_with(
        vec![Mask::new(64, 64), Mask::new(64, 64), Mask::new(64, 64)],
        vec![0.1, 0.1, 0.1],
    );
    let session = engine.bind_image(photo.clone()).unwrap();
    let report = engine
        .generate_mask(
            &session,
            &Prompt::Point { x: 10, y: 10 },
            &RefinementOptions::default(),
        )
        .unwrap();
    assert!(report.mask.is_none());

    // Zero candidates returned at all.
    let mut engine = engine_with(vec![], vec![]);
    let session = engine.bind_image(photo).unwrap();
    let report = engine
        .generate_mask(
            &session,
            &Prompt::Point { x: 10, y: 10 },
            &RefinementOptions::default(),
        )
        .unwrap();
    assert!(report.mask.is_none());
}

#[test]
fn rebinding_identical_pixels_reuses_the_session() {
    let photo = two_tone_rgb(32, 32, 16, RED, BLUE);
    let mut engine = engine_with(vec![], vec![]);
    let first = engine.bind_image(photo.clone()).unwrap();
    let second = engine.bind_image(photo.clone()).unwrap();
    assert!(
        std::sync::Arc::ptr_eq(&first, &second),
        "bit-identical rebind must be a no-op"
    );
    let mut changed = photo;
    changed.set(0, 0, [1, 2, 3]);
    let third = engine.bind_image(changed).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &third));
}

#[test]
fn trace_records_the_pipeline_decisions() {
    let photo = two_tone_rgb(100, 100, 50, RED, BLUE);
    let left = half_mask(100, 100, 50);
    let mut engine = engine_with(
        vec![left, Mask::new(100, 100), Mask::new(100, 100)],
        vec![0.95, 0.0, 0.0],
    );
    let session = engine.bind_image(photo).unwrap();
    let report = engine
        .generate_mask(
            &session,
            &Prompt::Point { x: 25, y: 50 },
            &RefinementOptions::standard(),
        )
        .unwrap();
    let trace = report.trace;
    let selection = trace.selection.as_ref().expect("selection stage");
    assert_eq!(selection.chosen, Some(0));
    let gate = trace.gate.as_ref().expect("gate stage");
    assert!(!gate.small_object);
    assert!(!gate.reverted);
    let cleanup = trace.cleanup.as_ref().expect("cleanup stage");
    assert!(cleanup.applied);
    assert!(cleanup.adopted);
    let components = trace.components.as_ref().expect("component stage");
    assert_eq!(components.kept, 1);
    assert!(trace.timings.total_ms >= 0.0);
    // The trace serializes for persistence alongside the mask.
    let json = serde_json::to_string(&trace).unwrap();
    assert!(json.contains("\"promptKind\""));
}
