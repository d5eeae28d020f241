use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tilemap::Tilemap;

/// Grid of precipitation amounts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationMap {
    pub width: usize,
    pub height: usize,
    #[serde(with = "super::rows")]
    pub grid: Tilemap<f64>,
}

impl Default for PrecipitationMap {
    fn default() -> Self {
        Self::new(10, 10, 0.0)
    }
}

impl PrecipitationMap {
    pub fn new(width: usize, height: usize, default_value: f64) -> Self {
        Self {
            width,
            height,
            grid: Tilemap::new_with(width, height, default_value),
        }
    }

    /// Clamp every cell into `[min_value, max_value]`.
    pub fn clamp(&mut self, min_value: f64, max_value: f64) {
        for (_, _, v) in self.grid.iter_mut() {
            *v = v.clamp(min_value, max_value);
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        super::check_dimensions(
            "PrecipitationMap",
            (self.width, self.height),
            (self.grid.width, self.grid.height),
        )
    }
}
