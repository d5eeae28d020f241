use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, TerrainError};
use crate::grid::VerticalRange;
use crate::noise_field::{CELLULAR_WEIGHT, COHERENT_WEIGHT};

/// Upper bound on cells (2D) or voxels (3D) a configuration may allocate.
pub const MAX_CELLS: usize = 1 << 26;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub grid: GridSettings,
    pub noise: NoiseSettings,
    pub erosion: ErosionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub width: usize,
    pub height: usize,
    /// Kilometers above sea level
    pub max_elevation: f64,
    /// Kilometers below sea level
    pub max_depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    pub scale: f64,
    pub regions: usize,
    pub coherent_weight: f64,
    pub cellular_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErosionSettings {
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grid: GridSettings::default(),
            noise: NoiseSettings::default(),
            erosion: ErosionSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: 5,
            height: 5,
            max_elevation: 10.0,
            max_depth: 5.0,
        }
    }
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            scale: 0.1,
            regions: 50,
            coherent_weight: COHERENT_WEIGHT,
            cellular_weight: CELLULAR_WEIGHT,
        }
    }
}

impl Default for ErosionSettings {
    fn default() -> Self {
        Self { iterations: 5 }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: GeneratorConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration with a specific size, range and seed; noise and erosion stay default.
    pub fn with_grid(width: usize, height: usize, max_elevation: f64, max_depth: f64, seed: u64) -> Self {
        Self {
            seed,
            grid: GridSettings {
                width,
                height,
                max_elevation,
                max_depth,
            },
            ..Self::default()
        }
    }

    pub fn vertical_range(&self) -> Result<VerticalRange> {
        VerticalRange::new(self.grid.max_elevation, self.grid.max_depth)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "grid dimensions must be non-zero, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }
        let cells = self.grid.width.checked_mul(self.grid.height);
        if !matches!(cells, Some(n) if n <= MAX_CELLS) {
            return Err(TerrainError::InvalidConfig(format!(
                "{}x{} grid exceeds {} cells",
                self.grid.width, self.grid.height, MAX_CELLS
            )));
        }
        self.vertical_range()?;
        if !self.noise.scale.is_finite() {
            return Err(TerrainError::InvalidConfig("noise scale must be finite".to_string()));
        }
        if self.noise.regions == 0 {
            return Err(TerrainError::InvalidConfig("noise regions must be at least 1".to_string()));
        }
        if !self.noise.coherent_weight.is_finite() || !self.noise.cellular_weight.is_finite() {
            return Err(TerrainError::InvalidConfig("blend weights must be finite".to_string()));
        }
        Ok(())
    }

    /// `validate` plus a bound on the banded grid's `width * height * z_levels`.
    pub fn validate_layered(&self) -> Result<()> {
        self.validate()?;
        let levels = self.vertical_range()?.z_levels();
        let voxels = self
            .grid
            .width
            .checked_mul(self.grid.height)
            .and_then(|n| n.checked_mul(levels));
        match voxels {
            Some(n) if n <= MAX_CELLS => Ok(()),
            _ => Err(TerrainError::InvalidConfig(format!(
                "{}x{} grid with {} levels exceeds {} voxels",
                self.grid.width, self.grid.height, levels, MAX_CELLS
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!((config.grid.width, config.grid.height), (5, 5));
        assert_eq!(config.noise.regions, 50);
        assert_eq!(config.erosion.iterations, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            seed = 7
            [grid]
            width = 16
            height = 8
            max_elevation = 4.0
            max_depth = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.grid.width, 16);
        assert_eq!(config.noise, NoiseSettings::default());
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string(&GeneratorConfig::default()).unwrap();
        assert!(toml_str.contains("max_elevation"));
        assert!(toml_str.contains("iterations"));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = GeneratorConfig::default();
        config.grid.width = 0;
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig(_))));

        let config = GeneratorConfig::with_grid(3, 3, 0.0, 0.0, 1);
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.noise.regions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_size_limits() {
        let config = GeneratorConfig::with_grid(usize::MAX, 2, 10.0, 5.0, 1);
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig(_))));
        let config = GeneratorConfig::with_grid(1 << 14, 1 << 14, 10.0, 5.0, 1);
        assert!(config.validate().is_err());

        // fine as a flat grid, a million levels per column when banded
        let config = GeneratorConfig::with_grid(64, 64, 1000.0, 0.0, 1);
        assert!(config.validate().is_ok());
        assert!(matches!(config.validate_layered(), Err(TerrainError::InvalidConfig(_))));
        assert!(GeneratorConfig::default().validate_layered().is_ok());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = GeneratorConfig::load("/nonexistent/terrain.toml").unwrap_err();
        assert!(matches!(err, TerrainError::Io(_)));
    }
}
