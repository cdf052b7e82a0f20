use std::path::PathBuf;

use detmap_rs::{labels, CategoryId, MapEval, Params};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn test_load_json_collections() {
    let gts = labels::load_ground_truths_json(&fixtures_dir().join("gt.json"))
        .expect("Failed to load GT");
    let dets = labels::load_detections_json(&fixtures_dir().join("dt.json"))
        .expect("Failed to load DT");

    assert_eq!(gts.len(), 3);
    assert_eq!(dets.len(), 3);
    assert_eq!(dets[0].category_id, CategoryId::Id(1));
    assert!(dets.iter().all(|d| d.score > 0.0));
}

#[test]
fn test_json_evaluation() {
    let gts = labels::load_ground_truths_json(&fixtures_dir().join("gt.json"))
        .expect("Failed to load GT");
    let dets = labels::load_detections_json(&fixtures_dir().join("dt.json"))
        .expect("Failed to load DT");

    let mut map_eval = MapEval::new(dets, gts, Params::new());
    map_eval.evaluate().expect("Evaluation failed");

    let eval = map_eval.eval.as_ref().expect("Evaluate should set eval");
    assert_eq!(eval.per_category.len(), 2);

    // Category 1: single perfect match. Category 2: one match out of two
    // ground truths plus a stray box, so recall tops out at 0.5 and 51 of
    // the 101 grid points see precision 1.0.
    assert!((eval.per_category[0].ap - 1.0).abs() < 1e-9);
    assert!((eval.per_category[1].ap - 51.0 / 101.0).abs() < 1e-9);

    let expected_map = (1.0 + 51.0 / 101.0) / 2.0;
    assert!((eval.map - expected_map).abs() < 1e-9);
}

#[test]
fn test_label_dir_evaluation() {
    let img_size = (100, 100);
    let gts = labels::load_ground_truth_dir(&fixtures_dir().join("labels/gt"), img_size)
        .expect("Failed to load GT labels");
    let dets = labels::load_detection_dir(&fixtures_dir().join("labels/dt"), img_size)
        .expect("Failed to load DT labels");

    assert_eq!(gts.len(), 3);
    assert_eq!(dets.len(), 3);
    // Files load in sorted order, so image ids are stable.
    assert_eq!(gts[0].image_id, 0);
    assert_eq!(gts[2].image_id, 1);
    assert_eq!(gts[0].bbox, [37.5, 37.5, 62.5, 62.5]);
    assert_eq!(dets[2].score, 0.85);

    let mut map_eval = MapEval::new(dets, gts, Params::new());
    map_eval.evaluate().expect("Evaluation failed");

    let eval = map_eval.eval.as_ref().expect("Evaluate should set eval");

    // Class 0 matches perfectly in both images; class 1's only detection
    // lands nowhere near its ground truth.
    assert_eq!(eval.per_category.len(), 2);
    assert!((eval.per_category[0].ap - 1.0).abs() < 1e-9);
    assert_eq!(eval.per_category[1].ap, 0.0);
    assert!((eval.map - 0.5).abs() < 1e-9);
}

#[test]
fn test_summarize_prints() {
    let gts = labels::load_ground_truths_json(&fixtures_dir().join("gt.json"))
        .expect("Failed to load GT");
    let dets = labels::load_detections_json(&fixtures_dir().join("dt.json"))
        .expect("Failed to load DT");

    let mut map_eval = MapEval::new(dets, gts, Params::new());
    map_eval.evaluate().expect("Evaluation failed");
    // One line per category plus the mAP line, without panicking.
    map_eval.summarize();
}
