#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use visdrone_sft::task::{Coord, Detection, DetectionTask, ImageId, TaskType};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Finite coordinates in the range VisDrone frames actually use, with at
/// most two decimals so text and JSON round-trips are exact.
pub fn coord_strategy() -> BoxedStrategy<f64> {
    prop_oneof![
        (0u32..4000).prop_map(f64::from),
        (0u32..400_000).prop_map(|n| f64::from(n) / 100.0),
    ]
    .boxed()
}

/// Task file coordinates: integers stay integers, floats stay floats.
pub fn task_coord_strategy() -> BoxedStrategy<Coord> {
    prop_oneof![
        (-100i64..4000).prop_map(Coord::Int),
        coord_strategy().prop_map(Coord::Float),
    ]
    .boxed()
}

pub fn category_strategy() -> BoxedStrategy<i64> {
    (-1i64..=12).boxed()
}

/// A syntactically valid annotation row and the values it encodes.
pub fn arb_valid_line() -> BoxedStrategy<(String, [f64; 4], i64)> {
    (
        [coord_strategy(), coord_strategy(), coord_strategy(), coord_strategy()],
        category_strategy(),
        0u8..=1,
        proptest::collection::vec(0u8..=2, 0..3),
    )
        .prop_map(|(bbox, category_id, score, trailing)| {
            let mut fields: Vec<String> = bbox.iter().map(|v| v.to_string()).collect();
            fields.push(score.to_string());
            fields.push(category_id.to_string());
            fields.extend(trailing.iter().map(|v| v.to_string()));
            (fields.join(","), bbox, category_id)
        })
        .boxed()
}

/// A row with fewer than six fields.
pub fn arb_short_line() -> BoxedStrategy<String> {
    proptest::collection::vec(coord_strategy(), 1..6)
        .prop_map(|fields| {
            fields
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .boxed()
}

/// A six-field row with one required field replaced by garbage.
pub fn arb_non_numeric_line() -> BoxedStrategy<String> {
    (
        arb_valid_line(),
        prop::sample::select(vec![0usize, 1, 2, 3, 5]),
        "[a-z]{1,6}",
    )
        .prop_map(|((line, _, _), slot, junk)| {
            let mut fields: Vec<String> = line.split(',').map(str::to_string).collect();
            fields[slot] = junk;
            fields.join(",")
        })
        .boxed()
}

fn arb_detection() -> BoxedStrategy<Detection> {
    (
        proptest::option::weighted(0.9, task_coord_strategy()),
        proptest::option::weighted(0.9, task_coord_strategy()),
        proptest::option::weighted(0.9, task_coord_strategy()),
        proptest::option::weighted(0.9, task_coord_strategy()),
        "[a-z_]{1,12}",
        category_strategy(),
    )
        .prop_map(|(x1, y1, x2, y2, label, category_id)| Detection {
            x1,
            y1,
            x2,
            y2,
            label,
            category_id,
        })
        .boxed()
}

pub fn arb_tasks(max_tasks: usize, max_detections: usize) -> BoxedStrategy<Vec<DetectionTask>> {
    proptest::collection::vec(
        (
            proptest::option::of(any::<i64>().prop_map(ImageId::new)),
            proptest::option::weighted(0.95, "[a-z0-9_]{1,10}\\.jpg"),
            proptest::collection::vec(arb_detection(), 0..=max_detections),
        )
            .prop_map(|(image_id, image_file, detections)| DetectionTask {
                image_id,
                image_file,
                task_type: TaskType::Detection,
                detections,
            }),
        0..=max_tasks,
    )
    .boxed()
}
