use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for evaluation and loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by evaluation and label loading.
#[derive(Error, Debug)]
pub enum Error {
    /// The detection set names no categories, so the mAP denominator would
    /// be zero.
    #[error("no categories to evaluate: the detection set is empty")]
    EmptyDetections,

    /// A box whose corners are out of order (or NaN). Rejected before any
    /// matching runs so sign errors cannot reach the IoU computation.
    #[error("malformed bounding box {bbox:?}: corners must satisfy x1 <= x2 and y1 <= y2")]
    MalformedBox { bbox: [f64; 4] },

    #[error("label file {path}: line {line}: {reason}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
