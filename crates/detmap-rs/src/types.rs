use std::fmt;

use serde::{Deserialize, Serialize};

/// Category identifier.
///
/// Label sources disagree on the id type: COCO-style JSON uses integers,
/// class-name exports use strings. Both deserialize from their natural JSON
/// form. The derived total order (integers first, then names) makes category
/// iteration deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CategoryId {
    Id(i64),
    Name(String),
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        CategoryId::Id(id)
    }
}

impl From<&str> for CategoryId {
    fn from(name: &str) -> Self {
        CategoryId::Name(name.to_owned())
    }
}

impl From<String> for CategoryId {
    fn from(name: String) -> Self {
        CategoryId::Name(name)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryId::Id(id) => write!(f, "{}", id),
            CategoryId::Name(name) => f.write_str(name),
        }
    }
}

/// A predicted bounding box.
///
/// `bbox` is `[x1, y1, x2, y2]` in corner coordinates with `x1 <= x2` and
/// `y1 <= y2`. A detection belongs to exactly one category and one image.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Detection {
    pub image_id: u64,
    pub category_id: CategoryId,
    pub bbox: [f64; 4],
    pub score: f64,
}

/// A reference bounding box, same corner format as [`Detection`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GroundTruth {
    pub image_id: u64,
    pub category_id: CategoryId,
    pub bbox: [f64; 4],
}
