use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::tilemap::Tilemap;

/// Plain grid of scalars (temperature, elevation, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridMap {
    pub width: usize,
    pub height: usize,
    #[serde(with = "super::rows")]
    pub grid: Tilemap<f64>,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new(10, 10, 0.0)
    }
}

impl GridMap {
    pub fn new(width: usize, height: usize, default_value: f64) -> Self {
        Self {
            width,
            height,
            grid: Tilemap::new_with(width, height, default_value),
        }
    }

    pub fn from_tilemap(grid: Tilemap<f64>) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            grid,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<f64> {
        self.grid
            .try_get(x, y)
            .copied()
            .ok_or_else(|| TerrainError::out_of_range_2d(x, y, self.width, self.height))
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) -> Result<()> {
        if !self.grid.in_bounds(x, y) {
            return Err(TerrainError::out_of_range_2d(x, y, self.width, self.height));
        }
        self.grid.set(x, y, value);
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<()> {
        super::check_dimensions("GridMap", (self.width, self.height), (self.grid.width, self.grid.height))
    }
}
