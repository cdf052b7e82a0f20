pub mod error;
pub mod eval;
pub mod geometry;
pub mod labels;
pub mod params;
pub mod types;

pub use error::{Error, Result};
pub use eval::{mean_average_precision, CategoryEval, Evaluation, MapEval};
pub use geometry::{iou, iou_matrix};
pub use params::Params;
pub use types::{CategoryId, Detection, GroundTruth};
