/// Evaluation parameters controlling matching and AP interpolation.
///
/// Defaults: IoU threshold 0.5, per-category candidate selection, and 101
/// recall thresholds (0.00, 0.01, ..., 1.00) for interpolated AP.
#[derive(Debug, Clone)]
pub struct Params {
    /// Minimum IoU for a detection to claim a ground truth. The comparison
    /// is strict: a best IoU exactly equal to the threshold is a false
    /// positive.
    pub iou_threshold: f64,
    /// When true, every category's candidate set is ALL detections with a
    /// positive score, regardless of their own category. Ground-truth
    /// selection stays per-category.
    pub class_agnostic: bool,
    /// Recall grid for interpolated precision. AP is the mean interpolated
    /// precision over this grid.
    pub recall_thresholds: Vec<f64>,
}

impl Params {
    /// Create default parameters.
    pub fn new() -> Self {
        let recall_thresholds: Vec<f64> = (0..=100).map(|i| i as f64 / 100.0).collect();

        Params {
            iou_threshold: 0.5,
            class_agnostic: false,
            recall_thresholds,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}
