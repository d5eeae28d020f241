use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::tilemap::Tilemap;

/// Spread below which `normalize` leaves the map untouched.
const MIN_NORMALIZE_SPREAD: f64 = 0.0001;

/// Grid of heights with an absolute range and the range it normalizes into.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeightMap {
    pub width: usize,
    pub height: usize,
    #[serde(with = "super::rows")]
    pub grid: Tilemap<f64>,
    /// `(min, max)` heights the grid values are expressed against
    pub height_range: (f64, f64),
    /// `(min, max)` of the normalized projection
    pub height_range_normalized: (f64, f64),
}

impl Default for HeightMap {
    fn default() -> Self {
        Self::new(10, 10, 0.0, (0.0, 10000.0))
    }
}

impl HeightMap {
    pub fn new(width: usize, height: usize, default_value: f64, height_range: (f64, f64)) -> Self {
        Self {
            width,
            height,
            grid: Tilemap::new_with(width, height, default_value),
            height_range,
            height_range_normalized: (0.0, 1.0),
        }
    }

    pub fn from_tilemap(grid: Tilemap<f64>, height_range: (f64, f64)) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            grid,
            height_range,
            height_range_normalized: (0.0, 1.0),
        }
    }

    pub fn min_height(&self) -> f64 {
        self.height_range.0
    }

    pub fn max_height(&self) -> f64 {
        self.height_range.1
    }

    pub fn get_height(&self, x: usize, y: usize) -> Result<f64> {
        self.grid
            .try_get(x, y)
            .copied()
            .ok_or_else(|| TerrainError::out_of_range_2d(x, y, self.width, self.height))
    }

    pub fn set_height(&mut self, x: usize, y: usize, value: f64) -> Result<()> {
        if !self.grid.in_bounds(x, y) {
            return Err(TerrainError::out_of_range_2d(x, y, self.width, self.height));
        }
        self.grid.set(x, y, value);
        Ok(())
    }

    fn project(&self, value: f64) -> f64 {
        let (lo, hi) = self.height_range;
        let (n_lo, n_hi) = self.height_range_normalized;
        n_lo + (value - lo) / (hi - lo) * (n_hi - n_lo)
    }

    pub fn get_normalized_height(&self, x: usize, y: usize) -> Result<f64> {
        Ok(self.project(self.get_height(x, y)?))
    }

    /// The whole grid mapped from `height_range` into `height_range_normalized`.
    pub fn normalized_grid(&self) -> Tilemap<f64> {
        self.grid.map(|&v| self.project(v))
    }

    /// Rescale the stored values to span exactly `[0, 1]`.
    pub fn normalize(&mut self) {
        let (Some(min), Some(max)) = (self.grid.min_value(), self.grid.max_value()) else {
            return;
        };
        let spread = max - min;
        if spread < MIN_NORMALIZE_SPREAD {
            return;
        }
        for (_, _, v) in self.grid.iter_mut() {
            *v = (*v - min) / spread;
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        super::check_dimensions("HeightMap", (self.width, self.height), (self.grid.width, self.grid.height))?;
        if self.height_range.1 <= self.height_range.0 {
            return Err(TerrainError::MalformedStructuredInput(format!(
                "height_range {:?} is empty",
                self.height_range
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let mut map = HeightMap::new(3, 3, 10.0, (0.0, 100.0));
        map.set_height(1, 1, 50.0).unwrap();
        map.normalize();
        assert_eq!(map.grid.min_value(), Some(0.0));
        assert_eq!(map.grid.max_value(), Some(1.0));
    }

    #[test]
    fn test_flat_map_not_normalized() {
        let mut map = HeightMap::new(2, 2, 3.0, (0.0, 10.0));
        map.normalize();
        assert!(map.grid.values().all(|&v| v == 3.0));
    }

    #[test]
    fn test_normalized_projection_tracks_writes() {
        let mut map = HeightMap::new(2, 2, 0.0, (-5.0, 15.0));
        map.set_height(0, 1, 10.0).unwrap();
        assert!((map.get_normalized_height(0, 1).unwrap() - 0.75).abs() < 1e-12);
        assert!((map.get_normalized_height(1, 1).unwrap() - 0.25).abs() < 1e-12);
        assert_eq!(map.normalized_grid().width, 2);
    }

    #[test]
    fn test_empty_range_rejected() {
        let map = HeightMap::new(1, 1, 0.0, (5.0, 5.0));
        assert!(map.validate().is_err());
    }
}
