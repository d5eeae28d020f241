//! Elevation-banded 3D grid
//!
//! Each `(x, y)` column is split into `z_levels = round(range * 1000)` meter-thick levels.
//! Level `z` sits `z / 1000` km above the column floor (the deepest configurable point).
//! Writing a column elevation marks every level below it as land; the remaining levels
//! are water up to sea level and air above it.

use crate::error::{Result, TerrainError};
use crate::grid::{Cell, Material, TerrainGrid, VerticalRange, LEVELS_PER_KM};
use crate::tilemap::Tilemap;

/// Dense voxel-column grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid3D {
    width: usize,
    height: usize,
    z_levels: usize,
    range: VerticalRange,
    /// Last elevation written per column (km above the floor)
    columns: Tilemap<f64>,
    /// Levels filled with land per column
    land_levels: Tilemap<usize>,
    cells: Vec<Cell>,
}

impl Grid3D {
    pub fn new(width: usize, height: usize, range: VerticalRange) -> Self {
        let z_levels = range.z_levels();
        let mut grid = Self {
            width,
            height,
            z_levels,
            range,
            columns: Tilemap::new_with(width, height, 0.0),
            land_levels: Tilemap::new_with(width, height, 0),
            cells: vec![Cell::default(); width * height * z_levels],
        };
        for x in 0..width {
            for y in 0..height {
                grid.rebuild_column(x, y);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn z_levels(&self) -> usize {
        self.z_levels
    }

    pub fn range(&self) -> VerticalRange {
        self.range
    }

    /// Index of the highest level still at or below sea level.
    pub fn sea_level_index(&self) -> usize {
        (self.range.max_depth * LEVELS_PER_KM).round() as usize
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.height + y) * self.z_levels + z
    }

    fn check(&self, x: usize, y: usize, z: usize) -> Result<()> {
        if x < self.width && y < self.height && z < self.z_levels {
            Ok(())
        } else {
            Err(TerrainError::out_of_range_3d(
                (x, y, z),
                (self.width, self.height, self.z_levels),
            ))
        }
    }

    pub fn cell(&self, x: usize, y: usize, z: usize) -> Result<&Cell> {
        self.check(x, y, z)?;
        Ok(&self.cells[self.index(x, y, z)])
    }

    /// Set the column surface and re-derive every level of the column.
    pub fn set_cell_elevation(&mut self, x: usize, y: usize, elevation: f64) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(TerrainError::out_of_range_3d(
                (x, y, 0),
                (self.width, self.height, self.z_levels),
            ));
        }
        let filled = (elevation * LEVELS_PER_KM).floor().max(0.0) as usize;
        self.columns.set(x, y, elevation);
        self.land_levels.set(x, y, filled.min(self.z_levels));
        self.rebuild_column(x, y);
        Ok(())
    }

    fn rebuild_column(&mut self, x: usize, y: usize) {
        let filled = *self.land_levels.get(x, y);
        let sea = self.sea_level_index();
        for z in 0..self.z_levels {
            let elevation = z as f64 / LEVELS_PER_KM;
            let material = if z < filled {
                Material::Land
            } else if z <= sea {
                Material::Water
            } else {
                Material::Air
            };
            let idx = self.index(x, y, z);
            self.cells[idx] = Cell {
                elevation,
                normalized_elevation: self.range.normalize(elevation),
                material,
            };
        }
    }

    /// Column elevations as last written.
    pub fn elevation_map(&self) -> Tilemap<f64> {
        self.columns.clone()
    }

    pub fn normalized_elevation_map(&self) -> Tilemap<f64> {
        self.columns.map(|&e| self.range.normalize(e))
    }

    /// Number of land levels per column.
    pub fn land_level_map(&self) -> Tilemap<usize> {
        self.land_levels.clone()
    }

    /// Material of the topmost level of each column.
    pub fn surface_material_map(&self) -> Tilemap<Material> {
        Tilemap::from_fn(self.width, self.height, |x, y| {
            if self.z_levels == 0 {
                return Material::Air;
            }
            let top = (*self.land_levels.get(x, y)).max(1) - 1;
            self.cells[self.index(x, y, top)].material
        })
    }
}

impl TerrainGrid for Grid3D {
    type Coord = (usize, usize, usize);

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn range(&self) -> VerticalRange {
        self.range
    }

    fn set_cell_elevation(&mut self, x: usize, y: usize, elevation: f64) -> Result<()> {
        Grid3D::set_cell_elevation(self, x, y, elevation)
    }

    fn coords(&self) -> Vec<(usize, usize, usize)> {
        let (height, z_levels) = (self.height, self.z_levels);
        (0..self.width)
            .flat_map(|x| (0..height).flat_map(move |y| (0..z_levels).map(move |z| (x, y, z))))
            .collect()
    }

    fn cell_at(&self, (x, y, z): (usize, usize, usize)) -> Result<Cell> {
        self.cell(x, y, z).copied()
    }

    /// Vertical link from below and horizontal link from `x - 1` only.
    fn visited_neighbors(&self, (x, y, z): (usize, usize, usize)) -> Vec<(usize, usize, usize)> {
        let mut result = Vec::with_capacity(2);
        if z > 0 {
            result.push((x, y, z - 1));
        }
        if x > 0 {
            result.push((x - 1, y, z));
        }
        result
    }

    fn node_count(&self) -> usize {
        self.cells.len()
    }
}
