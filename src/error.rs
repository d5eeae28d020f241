//! Error types shared by the generation pipeline and the map registry.

use thiserror::Error;

/// Everything that can abort a generation run or a map (de)serialization.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("coordinate {} outside grid {}", fmt_coord(.x, .y, .z), fmt_coord(.width, .height, .depth))]
    OutOfRangeCoordinate {
        x: usize,
        y: usize,
        z: Option<usize>,
        width: usize,
        height: usize,
        depth: Option<usize>,
    },
    #[error("unknown map type: {0}")]
    UnknownMapType(String),
    #[error("malformed structured input: {0}")]
    MalformedStructuredInput(String),
    #[error("noise field is degenerate (maximum {max}), cannot rescale to elevation range")]
    DegenerateNoiseField { max: f64 },
    #[error("unknown cell property: {0}")]
    UnknownCellProperty(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TerrainError>;

fn fmt_coord(x: &usize, y: &usize, z: &Option<usize>) -> String {
    match z {
        Some(z) => format!("({}, {}, {})", x, y, z),
        None => format!("({}, {})", x, y),
    }
}

impl TerrainError {
    pub(crate) fn out_of_range_2d(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self::OutOfRangeCoordinate { x, y, z: None, width, height, depth: None }
    }

    pub(crate) fn out_of_range_3d(
        (x, y, z): (usize, usize, usize),
        (width, height, depth): (usize, usize, usize),
    ) -> Self {
        Self::OutOfRangeCoordinate {
            x,
            y,
            z: Some(z),
            width,
            height,
            depth: Some(depth),
        }
    }
}
