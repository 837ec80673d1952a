use std::fs;

use visdrone_sft::annotation::{generate_detection_tasks, ParseOptions};
use visdrone_sft::category::CategoryMapping;
use visdrone_sft::parse_log::{FileParseLog, MemoryParseLog};
use visdrone_sft::sft::io_json::read_sft_json;
use visdrone_sft::sft::{convert_detection_tasks, SkipReason, Speaker};
use visdrone_sft::task::io_json::read_tasks_json;
use visdrone_sft::task::Detection;
use visdrone_sft::SftError;

mod common;

use common::Workspace;

#[test]
fn single_line_annotation_becomes_one_sft_record() {
    let ws = Workspace::new();
    ws.write_annotation("img1.txt", "10,20,30,40,1,3\n");
    ws.touch_image("img1.jpg");

    let mut log = MemoryParseLog::new();
    let summary = generate_detection_tasks(
        &ws.annotations_dir(),
        &ws.tasks_dir(),
        &ParseOptions::default(),
        &mut log,
    )
    .expect("parse annotations");

    let tasks = read_tasks_json(&summary.output_path).expect("read tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].image_file.as_deref(), Some("img1.jpg"));
    assert_eq!(
        tasks[0].detections,
        vec![Detection::new(10.0, 20.0, 30.0, 40.0, 3, "class_3")]
    );

    let mut mapping = CategoryMapping::new();
    mapping.insert(3, "car");
    let report = convert_detection_tasks(
        &summary.output_path,
        &ws.sft_path(),
        &ws.images_dir(),
        mapping,
    )
    .expect("format tasks");

    assert_eq!(report.total_tasks, 1);
    assert_eq!(report.processed, 1);
    assert!(report.skipped.is_empty());

    let records = read_sft_json(&ws.sft_path()).expect("read sft output");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(
        record.image_path,
        ws.images_dir().join("img1.jpg").to_string_lossy()
    );
    assert_eq!(record.conversation[0].from, Speaker::Human);
    assert_eq!(
        record.conversation[0].value,
        "Does the image contain the following objects? car. If yes, please mark their locations."
    );
    assert_eq!(record.conversation[1].from, Speaker::Gpt);
    assert_eq!(
        record.conversation[1].value,
        "Yes, the image contains the following objects: Object car (ID: 3), Location: [10.0, 20.0, 30.0, 40.0]."
    );
}

#[test]
fn missing_images_and_bad_lines_are_reported_not_fatal() {
    let ws = Workspace::new();
    ws.write_annotation("a.txt", "1,2,3,4,0,1\n\nnot,a,row\n5,6,7,8,0,4\n");
    ws.write_annotation("b.txt", "9,9,19,19,1,9\n");
    ws.touch_image("a.jpg");

    let mut log = FileParseLog::new(ws.log_path());
    let summary = generate_detection_tasks(
        &ws.annotations_dir(),
        &ws.tasks_dir(),
        &ParseOptions::default(),
        &mut log,
    )
    .expect("parse annotations");
    assert_eq!(summary.files, 2);
    assert_eq!(summary.tasks, 3);

    let log_text = fs::read_to_string(ws.log_path()).expect("read parse log");
    assert!(log_text.contains("[Line 2] Empty line, skipping"));
    assert!(log_text.contains("[Line 3] Insufficient fields: only 3 found. Content: not,a,row"));
    assert!(log_text.contains("Total lines=4, Successfully parsed=2, Failed=2"));

    let report = convert_detection_tasks(
        &summary.output_path,
        &ws.sft_path(),
        &ws.images_dir(),
        CategoryMapping::visdrone(),
    )
    .expect("format tasks");

    assert_eq!(report.total_tasks, 3);
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].image_file, "b.jpg");
    assert_eq!(report.skipped[0].reason, SkipReason::ImageMissing);
    assert_eq!(report.skipped[0].detections_skipped, Some(1));

    let records = read_sft_json(&ws.sft_path()).expect("read sft output");
    assert_eq!(records.len(), 2);
    assert!(records[0].conversation[1].value.contains("Object person (ID: 1)"));
    assert!(records[1].conversation[1].value.contains("Object van (ID: 4)"));

    let summary_text = report.to_string();
    assert!(summary_text.contains("- b.jpg | Reason: Image file does not exist"));
    assert!(summary_text.contains("  0: pedestrian"));
    assert!(summary_text.contains("  11: ignored"));
}

#[test]
fn null_coordinates_in_task_file_are_skipped() {
    let ws = Workspace::new();
    ws.touch_image("img.jpg");
    let tasks_path = ws.tasks_dir().join("detection_tasks.json");
    fs::create_dir_all(ws.tasks_dir()).expect("create tasks dir");
    fs::write(
        &tasks_path,
        r#"[
  {
    "image_id": 1,
    "image_file": "img.jpg",
    "task_type": "detection",
    "detections": [
      {"x1": 0, "y1": 0, "x2": 1, "y2": 1, "category_id": 3, "label": "car"},
      {"x1": null, "y1": 0, "x2": 1, "y2": 1, "category_id": 5, "label": "truck"}
    ]
  }
]"#,
    )
    .expect("write tasks");

    let report = convert_detection_tasks(
        &tasks_path,
        &ws.sft_path(),
        &ws.images_dir(),
        CategoryMapping::new(),
    )
    .expect("format tasks");

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::NullCoordinates);
    assert_eq!(report.skipped[0].detection_idx, Some(1));
    assert_eq!(report.skipped[0].category_id, Some(5));

    let records = read_sft_json(&ws.sft_path()).expect("read sft output");
    let answer = &records[0].conversation[1].value;
    assert_eq!(answer.matches("Object").count(), 1);
    // Integer coordinates in the task file print as integers.
    assert!(answer.contains("Object car (ID: 3), Location: [0, 0, 1, 1]"));
}

#[test]
fn malformed_task_fields_do_not_abort_the_batch() {
    let ws = Workspace::new();
    ws.touch_image("a.jpg");
    ws.touch_image("b.jpg");
    ws.touch_image("c.jpg");
    let tasks_path = ws.root.path().join("detection_tasks.json");
    fs::write(
        &tasks_path,
        r#"[
  {"image_id": 1, "image_file": "a.jpg", "detections": [
    {"x1": 1, "y1": 2, "x2": 3, "y2": 4, "category_id": 3, "label": "car"}
  ]},
  {"image_id": "x", "image_file": "b.jpg", "detections": [
    {"x1": 5.5, "y1": 6, "x2": 7, "y2": 8, "category_id": "4", "label": null}
  ]},
  {"image_file": null, "detections": [
    {"x1": 0, "y1": 0, "x2": 1, "y2": 1, "category_id": 3, "label": "car"}
  ]},
  {"image_file": "c.jpg", "detections": [
    {"x1": "wide", "y1": 0, "x2": 1, "y2": 1, "category_id": 9, "label": "motorcycle"}
  ]},
  42
]"#,
    )
    .expect("write tasks");

    let report = convert_detection_tasks(
        &tasks_path,
        &ws.sft_path(),
        &ws.images_dir(),
        CategoryMapping::new(),
    )
    .expect("format tasks");

    assert_eq!(report.total_tasks, 5);
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped_tasks(), 3);

    let reasons: Vec<SkipReason> = report.skipped.iter().map(|e| e.reason).collect();
    assert_eq!(
        reasons,
        vec![
            SkipReason::ImageFileMissing,
            SkipReason::NullCoordinates,
            SkipReason::NoValidDetections,
            SkipReason::ImageFileMissing,
        ]
    );
    assert_eq!(report.skipped[0].task_idx, Some(2));
    assert_eq!(report.skipped[3].task_idx, Some(4));

    let records = read_sft_json(&ws.sft_path()).expect("read sft output");
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].conversation[1].value,
        "Yes, the image contains the following objects: Object car (ID: 3), Location: [1, 2, 3, 4]."
    );
    assert_eq!(
        records[1].conversation[1].value,
        "Yes, the image contains the following objects: Object unknown (ID: 4), Location: [5.5, 6, 7, 8]."
    );
}

#[test]
fn unparseable_task_file_is_fatal() {
    let ws = Workspace::new();
    let tasks_path = ws.root.path().join("detection_tasks.json");
    fs::write(&tasks_path, "{ not json").expect("write tasks");

    let err = convert_detection_tasks(
        &tasks_path,
        &ws.sft_path(),
        &ws.images_dir(),
        CategoryMapping::new(),
    )
    .unwrap_err();

    assert!(matches!(err, SftError::TasksJsonParse { .. }));
    assert!(!ws.sft_path().exists());
}
