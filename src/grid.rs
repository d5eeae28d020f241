//! Grid data model
//!
//! Per-cell state is a fixed-shape [`Cell`]. Elevation is the only independent field:
//! `normalized_elevation` and `material` are always re-derived from it together, through
//! a single write path, so the classification invariant cannot drift.

use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::tilemap::Tilemap;

/// Vertical levels per kilometer in the banded 3D variant (meter resolution).
pub const LEVELS_PER_KM: f64 = 1000.0;

/// Material classification of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Water,
    Land,
    Air,
}

/// State of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Signed elevation in kilometers
    pub elevation: f64,
    /// Elevation as a fraction of `max_elevation + max_depth`
    pub normalized_elevation: f64,
    pub material: Material,
}

/// The configured vertical extent, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerticalRange {
    /// Highest elevation above sea level (km)
    pub max_elevation: f64,
    /// Deepest point below sea level (km)
    pub max_depth: f64,
}

impl VerticalRange {
    pub fn new(max_elevation: f64, max_depth: f64) -> Result<Self> {
        let range = Self { max_elevation, max_depth };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_elevation.is_finite() || self.max_elevation < 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "max_elevation must be finite and >= 0, got {}",
                self.max_elevation
            )));
        }
        if !self.max_depth.is_finite() || self.max_depth < 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "max_depth must be finite and >= 0, got {}",
                self.max_depth
            )));
        }
        if self.total() <= 0.0 {
            return Err(TerrainError::InvalidConfig(
                "max_elevation + max_depth must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `max_elevation + max_depth` in kilometers.
    pub fn total(&self) -> f64 {
        self.max_elevation + self.max_depth
    }

    pub fn normalize(&self, elevation: f64) -> f64 {
        elevation / self.total()
    }

    pub fn normalized_sea_level(&self) -> f64 {
        self.max_depth / self.total()
    }

    /// Water strictly below `-normalized_sea_level`, land otherwise.
    pub fn classify(&self, normalized_elevation: f64) -> Material {
        if normalized_elevation < -self.normalized_sea_level() {
            Material::Water
        } else {
            Material::Land
        }
    }

    /// Build a cell with both derived fields computed from `elevation`.
    pub fn derive_cell(&self, elevation: f64) -> Cell {
        let normalized_elevation = self.normalize(elevation);
        Cell {
            elevation,
            normalized_elevation,
            material: self.classify(normalized_elevation),
        }
    }

    /// Number of meter-resolution levels spanning the range.
    pub fn z_levels(&self) -> usize {
        (self.total() * LEVELS_PER_KM).round() as usize
    }
}

/// Writable scalar fields of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellProperty {
    Elevation,
    NormalizedElevation,
}

impl FromStr for CellProperty {
    type Err = TerrainError;

    fn from_str(key: &str) -> Result<Self> {
        match key {
            "elevation" => Ok(CellProperty::Elevation),
            "normalized_elevation" => Ok(CellProperty::NormalizedElevation),
            other => Err(TerrainError::UnknownCellProperty(other.to_string())),
        }
    }
}

/// What the orchestrator needs from a grid variant to drive the pipeline.
pub trait TerrainGrid {
    type Coord: Copy + Eq + Hash + Debug;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn range(&self) -> VerticalRange;

    /// The single elevation-write path for column `(x, y)`.
    fn set_cell_elevation(&mut self, x: usize, y: usize, elevation: f64) -> Result<()>;

    /// Every coordinate, in the order the graph builder visits them.
    fn coords(&self) -> Vec<Self::Coord>;

    /// Copy of the attributes at `coord`.
    fn cell_at(&self, coord: Self::Coord) -> Result<Cell>;

    /// Neighbors of `coord` that precede it in visiting order and are linked into it.
    fn visited_neighbors(&self, coord: Self::Coord) -> Vec<Self::Coord>;

    fn node_count(&self) -> usize {
        self.coords().len()
    }
}

/// The authoritative 2D grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid2D {
    range: VerticalRange,
    cells: Tilemap<Cell>,
}

impl Grid2D {
    /// Allocate a grid of default cells (zero elevation, water).
    pub fn new(width: usize, height: usize, range: VerticalRange) -> Self {
        Self {
            range,
            cells: Tilemap::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn range(&self) -> VerticalRange {
        self.range
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if self.cells.in_bounds(x, y) {
            Ok(())
        } else {
            Err(TerrainError::out_of_range_2d(x, y, self.width(), self.height()))
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Result<&Cell> {
        self.check(x, y)?;
        Ok(self.cells.get(x, y))
    }

    pub fn cells(&self) -> &Tilemap<Cell> {
        &self.cells
    }

    /// Write `elevation` and re-derive the normalized elevation and material.
    pub fn set_cell_elevation(&mut self, x: usize, y: usize, elevation: f64) -> Result<()> {
        self.check(x, y)?;
        let cell = self.range.derive_cell(elevation);
        self.cells.set(x, y, cell);
        Ok(())
    }

    /// Generic write by field name; every key funnels into `set_cell_elevation`.
    pub fn set_cell_property(&mut self, x: usize, y: usize, key: &str, value: f64) -> Result<()> {
        match key.parse::<CellProperty>()? {
            CellProperty::Elevation => self.set_cell_elevation(x, y, value),
            CellProperty::NormalizedElevation => {
                self.set_cell_elevation(x, y, value * self.range.total())
            }
        }
    }

    pub fn cell_property(&self, x: usize, y: usize, key: &str) -> Result<f64> {
        let property = key.parse::<CellProperty>()?;
        let cell = self.cell(x, y)?;
        Ok(match property {
            CellProperty::Elevation => cell.elevation,
            CellProperty::NormalizedElevation => cell.normalized_elevation,
        })
    }

    pub fn elevation_map(&self) -> Tilemap<f64> {
        self.cells.map(|c| c.elevation)
    }

    pub fn normalized_elevation_map(&self) -> Tilemap<f64> {
        self.cells.map(|c| c.normalized_elevation)
    }

    pub fn material_map(&self) -> Tilemap<Material> {
        self.cells.map(|c| c.material)
    }

    /// Confirm every written cell matches what its elevation derives to.
    pub fn validate(&self) -> Result<()> {
        self.range.validate()?;
        if !self.cells.is_consistent() {
            return Err(TerrainError::MalformedStructuredInput(format!(
                "{} cells do not fill a {}x{} grid",
                self.cells.len(),
                self.width(),
                self.height()
            )));
        }
        for (x, y, cell) in self.cells.iter() {
            // never-written cells keep the allocation default
            if *cell == Cell::default() {
                continue;
            }
            let expected = self.range.derive_cell(cell.elevation);
            let normalized_ok = (expected.normalized_elevation - cell.normalized_elevation).abs()
                <= 1e-12 * expected.normalized_elevation.abs().max(1.0);
            if !normalized_ok || expected.material != cell.material {
                return Err(TerrainError::MalformedStructuredInput(format!(
                    "cell ({}, {}) does not match its elevation {}",
                    x, y, cell.elevation
                )));
            }
        }
        Ok(())
    }
}

impl TerrainGrid for Grid2D {
    type Coord = (usize, usize);

    fn width(&self) -> usize {
        Grid2D::width(self)
    }

    fn height(&self) -> usize {
        Grid2D::height(self)
    }

    fn range(&self) -> VerticalRange {
        self.range
    }

    fn set_cell_elevation(&mut self, x: usize, y: usize, elevation: f64) -> Result<()> {
        Grid2D::set_cell_elevation(self, x, y, elevation)
    }

    /// Column-major: `x` outer, `y` inner.
    fn coords(&self) -> Vec<(usize, usize)> {
        let (width, height) = self.size();
        (0..width).flat_map(|x| (0..height).map(move |y| (x, y))).collect()
    }

    fn cell_at(&self, (x, y): (usize, usize)) -> Result<Cell> {
        self.cell(x, y).copied()
    }

    /// The 8-neighbors already visited in column-major order.
    fn visited_neighbors(&self, (x, y): (usize, usize)) -> Vec<(usize, usize)> {
        self.cells
            .neighbors_8(x, y)
            .into_iter()
            .filter(|&(nx, ny)| nx < x || (nx == x && ny < y))
            .collect()
    }

    fn node_count(&self) -> usize {
        self.cells.len()
    }
}
