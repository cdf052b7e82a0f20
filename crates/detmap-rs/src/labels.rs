//! Label loading: YOLO-format text labels and JSON collections.
//!
//! Text labels hold one box per line, `class x_center y_center width height`
//! with coordinates normalized to the image size; detection files may carry
//! a trailing confidence score. Conversion to the corner format the
//! evaluator consumes happens here, before the core ever sees a box.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{Detection, GroundTruth};

/// Convert a normalized center/width/height box to pixel corner coordinates.
pub fn convert_bbox(bbox: [f64; 4], img_size: (u32, u32)) -> [f64; 4] {
    let image_width = img_size.0 as f64;
    let image_height = img_size.1 as f64;
    let [x_center, y_center, width, height] = bbox;

    let x1 = x_center * image_width - (width * image_width) / 2.0;
    let y1 = y_center * image_height - (height * image_height) / 2.0;
    let x2 = x1 + width * image_width;
    let y2 = y1 + height * image_height;
    [x1, y1, x2, y2]
}

struct LabelLine {
    class_id: i64,
    bbox: [f64; 4],
    score: Option<f64>,
}

fn parse_line(line: &str, path: &Path, line_no: usize) -> Result<Option<LabelLine>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Ok(None);
    }
    if parts.len() != 5 && parts.len() != 6 {
        return Err(Error::LabelParse {
            path: path.to_path_buf(),
            line: line_no,
            reason: format!("expected 5 or 6 fields, got {}", parts.len()),
        });
    }

    let parse_f64 = |s: &str| -> Result<f64> {
        s.parse::<f64>().map_err(|_| Error::LabelParse {
            path: path.to_path_buf(),
            line: line_no,
            reason: format!("invalid number {:?}", s),
        })
    };

    let class_id = parts[0].parse::<i64>().map_err(|_| Error::LabelParse {
        path: path.to_path_buf(),
        line: line_no,
        reason: format!("invalid class id {:?}", parts[0]),
    })?;
    let bbox = [
        parse_f64(parts[1])?,
        parse_f64(parts[2])?,
        parse_f64(parts[3])?,
        parse_f64(parts[4])?,
    ];
    let score = match parts.get(5) {
        Some(s) => Some(parse_f64(s)?),
        None => None,
    };

    Ok(Some(LabelLine {
        class_id,
        bbox,
        score,
    }))
}

fn parse_file(path: &Path) -> Result<Vec<LabelLine>> {
    let content = fs::read_to_string(path)?;
    let mut lines = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if let Some(parsed) = parse_line(line, path, i + 1)? {
            lines.push(parsed);
        }
    }
    Ok(lines)
}

/// Load one image's ground-truth label file.
pub fn load_ground_truth_file(
    path: &Path,
    image_id: u64,
    img_size: (u32, u32),
) -> Result<Vec<GroundTruth>> {
    let lines = parse_file(path)?;
    Ok(lines
        .into_iter()
        .map(|line| GroundTruth {
            image_id,
            category_id: line.class_id.into(),
            bbox: convert_bbox(line.bbox, img_size),
        })
        .collect())
}

/// Load one image's detection label file. A missing trailing score defaults
/// to 1.0.
pub fn load_detection_file(
    path: &Path,
    image_id: u64,
    img_size: (u32, u32),
) -> Result<Vec<Detection>> {
    let lines = parse_file(path)?;
    Ok(lines
        .into_iter()
        .map(|line| Detection {
            image_id,
            category_id: line.class_id.into(),
            bbox: convert_bbox(line.bbox, img_size),
            score: line.score.unwrap_or(1.0),
        })
        .collect())
}

/// Collect the `.txt` label files under a directory, sorted by path so image
/// ids are stable across runs. The id of each file is its position in the
/// sorted listing.
fn label_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Load every ground-truth label file under a directory, one image per file.
pub fn load_ground_truth_dir(dir: &Path, img_size: (u32, u32)) -> Result<Vec<GroundTruth>> {
    let mut ground_truths = Vec::new();
    for (image_id, path) in label_files(dir)?.iter().enumerate() {
        ground_truths.extend(load_ground_truth_file(path, image_id as u64, img_size)?);
    }
    Ok(ground_truths)
}

/// Load every detection label file under a directory, one image per file.
pub fn load_detection_dir(dir: &Path, img_size: (u32, u32)) -> Result<Vec<Detection>> {
    let mut detections = Vec::new();
    for (image_id, path) in label_files(dir)?.iter().enumerate() {
        detections.extend(load_detection_file(path, image_id as u64, img_size)?);
    }
    Ok(detections)
}

/// Load a JSON array of detections.
pub fn load_detections_json(path: &Path) -> Result<Vec<Detection>> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Load a JSON array of ground truths.
pub fn load_ground_truths_json(path: &Path) -> Result<Vec<GroundTruth>> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
