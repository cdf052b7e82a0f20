//! Axis-aligned box geometry.

use crate::error::{Error, Result};

/// Area of a corner-format box. Assumes ordered corners; see [`validate_box`].
fn area(b: &[f64; 4]) -> f64 {
    (b[2] - b[0]) * (b[3] - b[1])
}

/// Reject a box whose corners are out of order. NaN corners fail the
/// comparison and are rejected too.
pub fn validate_box(bbox: &[f64; 4]) -> Result<()> {
    if bbox[2] >= bbox[0] && bbox[3] >= bbox[1] {
        Ok(())
    } else {
        Err(Error::MalformedBox { bbox: *bbox })
    }
}

/// Intersection over union of two corner-format boxes.
///
/// Returns 0.0 when the union is not positive (both boxes degenerate and
/// disjoint), so the result is never NaN for validated boxes.
pub fn iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x_a = a[0].max(b[0]);
    let y_a = a[1].max(b[1]);
    let x_b = a[2].min(b[2]);
    let y_b = a[3].min(b[3]);

    let intersection = (x_b - x_a).max(0.0) * (y_b - y_a).max(0.0);
    let union = area(a) + area(b) - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Dense IoU table: `result[d][g]` pairs detection box `d` with ground-truth
/// box `g`. Recomputed per category and discarded after matching.
pub fn iou_matrix(detections: &[[f64; 4]], ground_truths: &[[f64; 4]]) -> Vec<Vec<f64>> {
    detections
        .iter()
        .map(|d| ground_truths.iter().map(|g| iou(d, g)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_boxes() {
        let b = [0.0, 0.0, 10.0, 10.0];
        assert!((iou(&b, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [20.0, 20.0, 30.0, 30.0];
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_touching_edges() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [10.0, 0.0, 20.0, 10.0];
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [5.0, 5.0, 15.0, 15.0];
        // intersection 25, union 175
        assert!((iou(&a, &b) - 25.0 / 175.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let a = [0.0, 0.0, 10.0, 8.0];
        let b = [3.0, 2.0, 12.0, 11.0];
        assert_eq!(iou(&a, &b), iou(&b, &a));
    }

    #[test]
    fn test_degenerate_disjoint_boxes() {
        // Both boxes have zero area and do not overlap; the 0.0 policy
        // keeps NaN out of the pipeline.
        let a = [0.0, 0.0, 0.0, 0.0];
        let b = [5.0, 5.0, 5.0, 5.0];
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn test_contained_box() {
        let outer = [0.0, 0.0, 10.0, 10.0];
        let inner = [2.0, 2.0, 4.0, 4.0];
        assert!((iou(&outer, &inner) - 4.0 / 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_box() {
        assert!(validate_box(&[0.0, 0.0, 10.0, 10.0]).is_ok());
        assert!(validate_box(&[0.0, 0.0, 0.0, 0.0]).is_ok());
        assert!(validate_box(&[10.0, 0.0, 0.0, 10.0]).is_err());
        assert!(validate_box(&[0.0, 10.0, 10.0, 0.0]).is_err());
        assert!(validate_box(&[0.0, f64::NAN, 10.0, 10.0]).is_err());
    }

    #[test]
    fn test_iou_matrix_shape() {
        let dets = [[0.0, 0.0, 10.0, 10.0], [5.0, 5.0, 15.0, 15.0]];
        let gts = [[0.0, 0.0, 10.0, 10.0]];
        let m = iou_matrix(&dets, &gts);
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].len(), 1);
        assert!((m[0][0] - 1.0).abs() < 1e-12);
    }
}
