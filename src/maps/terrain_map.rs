use serde::{Deserialize, Serialize};

use crate::grid::{Grid2D, VerticalRange};

/// The authoritative terrain grid in map form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainMap {
    pub grid: Grid2D,
}

impl Default for TerrainMap {
    fn default() -> Self {
        let range = VerticalRange {
            max_elevation: 10.0,
            max_depth: 5.0,
        };
        Self {
            grid: Grid2D::new(10, 10, range),
        }
    }
}

impl TerrainMap {
    pub fn from_grid(grid: Grid2D) -> Self {
        Self { grid }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }
}
