//! Pipeline coordination
//!
//! `MapOrchestrator` owns one grid and one graph and drives a generation run:
//! noise -> erosion -> rescale -> grid writes -> graph build. Each stage completes
//! before the next starts, so the graph never captures attributes from a half-written grid.

use std::fmt;

use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::erosion::ErosionPass;
use crate::error::{Result, TerrainError};
use crate::graph::TerrainGraph;
use crate::grid::{Grid2D, TerrainGrid};
use crate::grid3d::Grid3D;
use crate::noise_field::{self, CellularNoise, CoherentNoise, NoiseField};
use crate::seeds::TerrainSeeds;
use crate::telemetry::traced_stage;
use crate::tilemap::Tilemap;

/// A field whose maximum is at or below this cannot be rescaled.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Where a generation run currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Empty,
    HeightmapGenerated,
    GraphPopulated,
}

/// Owns the grid, the graph built from it, and the immutable seed.
pub struct MapOrchestrator<G: TerrainGrid = Grid2D> {
    config: GeneratorConfig,
    seeds: TerrainSeeds,
    grid: G,
    graph: TerrainGraph<G::Coord>,
    state: PipelineState,
}

impl MapOrchestrator<Grid2D> {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid2D::new(config.grid.width, config.grid.height, config.vertical_range()?);
        Self::with_grid(config, grid)
    }
}

impl MapOrchestrator<Grid3D> {
    pub fn new_3d(config: GeneratorConfig) -> Result<Self> {
        config.validate_layered()?;
        let grid = Grid3D::new(config.grid.width, config.grid.height, config.vertical_range()?);
        Self::with_grid(config, grid)
    }
}

impl<G: TerrainGrid> MapOrchestrator<G> {
    /// Wrap an existing grid. Its dimensions must match the configuration.
    pub fn with_grid(config: GeneratorConfig, grid: G) -> Result<Self> {
        config.validate()?;
        if (grid.width(), grid.height()) != (config.grid.width, config.grid.height) {
            return Err(TerrainError::InvalidConfig(format!(
                "grid is {}x{} but configuration asks for {}x{}",
                grid.width(),
                grid.height(),
                config.grid.width,
                config.grid.height
            )));
        }
        let seeds = TerrainSeeds::from_master(config.seed);
        info!(
            "Map orchestrator initialized: {}x{}, seed {}",
            config.grid.width, config.grid.height, config.seed
        );
        Ok(Self {
            config,
            seeds,
            grid,
            graph: TerrainGraph::new(),
            state: PipelineState::Empty,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seeds.master
    }

    pub fn seeds(&self) -> &TerrainSeeds {
        &self.seeds
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    /// Mutable grid access. Any populated graph is considered stale afterwards.
    pub fn grid_mut(&mut self) -> &mut G {
        if self.state == PipelineState::GraphPopulated {
            self.state = PipelineState::HeightmapGenerated;
        }
        &mut self.grid
    }

    pub fn graph(&self) -> &TerrainGraph<G::Coord> {
        &self.graph
    }

    /// Blend of coherent and cellular noise, before erosion.
    pub fn raw_field(&self) -> Tilemap<f64> {
        let (width, height) = (self.grid.width(), self.grid.height());
        let noise = &self.config.noise;

        let coherent = CoherentNoise::new(noise.scale, self.seeds.coherent_u32()).generate(width, height);
        let cellular = CellularNoise::new(noise.regions, self.seeds.cellular).generate(width, height);
        noise_field::blend(&coherent, &cellular, noise.coherent_weight, noise.cellular_weight)
    }

    pub fn erosion_pass(&self) -> ErosionPass {
        ErosionPass::new(self.config.erosion.iterations, self.seeds.erosion)
    }

    /// Synthesize, erode, rescale into the elevation range and write every cell.
    pub fn generate_heightmap(&mut self) -> Result<()> {
        let raw = traced_stage("noise synthesis", || Ok::<_, TerrainError>(self.raw_field()))?;
        let eroded = traced_stage("erosion", || {
            let (field, stats) = self.erosion_pass().apply_with_stats(&raw);
            debug!(
                "removed {:.4} total over {} rounds, {} cells at floor",
                stats.total_removed, stats.iterations, stats.cells_at_floor
            );
            Ok::<_, TerrainError>(field)
        })?;
        let total = self.grid.range().total();
        let elevations = traced_stage("rescale", || rescale_to_range(&eroded, total))?;

        let grid = &mut self.grid;
        traced_stage("grid write", || {
            for (x, y, &elevation) in elevations.iter() {
                grid.set_cell_elevation(x, y, elevation)?;
            }
            Ok::<_, TerrainError>(())
        })?;

        self.state = PipelineState::HeightmapGenerated;
        info!("Heightmap generation complete");
        Ok(())
    }

    /// Rebuild the graph from the grid's current cells.
    ///
    /// Every coordinate becomes a node carrying a copy of its cell, and each already-visited
    /// neighbor gets an edge into it. Before a heightmap exists this yields default nodes.
    pub fn initialize_graph(&mut self) -> Result<()> {
        if self.state == PipelineState::Empty {
            debug!("building graph before any heightmap; nodes carry default cells");
        }
        let grid = &self.grid;
        let graph = &mut self.graph;
        traced_stage("graph build", || {
            graph.clear();
            for coord in grid.coords() {
                graph.add_node(coord, grid.cell_at(coord)?);
                for source in grid.visited_neighbors(coord) {
                    graph.add_edge(source, coord, ());
                }
            }
            Ok::<_, TerrainError>(())
        })?;

        info!(
            "Graph populated: {} nodes, {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        );
        self.state = PipelineState::GraphPopulated;
        Ok(())
    }

    /// Full run: heightmap, then graph.
    pub fn generate(&mut self) -> Result<()> {
        info!("Generating terrain...");
        self.generate_heightmap()?;
        info!("Populating graph...");
        self.initialize_graph()
    }

    /// Re-copy node attributes from the grid without touching edges.
    pub fn resync_graph(&mut self) -> Result<()> {
        let grid = &self.grid;
        for (coord, cell) in self.graph.nodes_mut() {
            *cell = grid.cell_at(coord)?;
        }
        if !self.graph.is_empty() {
            self.state = PipelineState::GraphPopulated;
        }
        Ok(())
    }
}

impl<G: TerrainGrid> fmt::Display for MapOrchestrator<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.grid.range();
        writeln!(f, "MapOrchestrator:")?;
        writeln!(f, "  Grid Size: {}x{}", self.grid.width(), self.grid.height())?;
        writeln!(f, "  Max Elevation: {} km", range.max_elevation)?;
        writeln!(f, "  Max Depth: {} km", range.max_depth)?;
        writeln!(f, "  Seed: {}", self.seed())?;
        write!(f, "  State: {:?}", self.state)
    }
}

/// Scale a field so its maximum lands on `total`: `v * total / max(field)`.
pub fn rescale_to_range(field: &Tilemap<f64>, total: f64) -> Result<Tilemap<f64>> {
    let max = field.max_value().unwrap_or(0.0);
    if !max.is_finite() || max <= DEGENERATE_EPSILON {
        return Err(TerrainError::DegenerateNoiseField { max });
    }
    Ok(field.map(|&v| v * total / max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Material;

    fn example_config() -> GeneratorConfig {
        GeneratorConfig::with_grid(3, 3, 5.0, 1.0, 42)
    }

    #[test]
    fn test_end_to_end_three_by_three() {
        let mut map = MapOrchestrator::new(example_config()).unwrap();
        assert_eq!(map.state(), PipelineState::Empty);

        map.generate_heightmap().unwrap();
        assert_eq!(map.state(), PipelineState::HeightmapGenerated);
        assert!(map.grid().material_map().values().all(|&m| m == Material::Land));

        map.initialize_graph().unwrap();
        assert_eq!(map.state(), PipelineState::GraphPopulated);
        assert_eq!(map.graph().node_count(), 9);
        assert_eq!(map.graph().edge_count(), 20);
    }

    #[test]
    fn test_heightmap_is_deterministic() {
        let mut a = MapOrchestrator::new(GeneratorConfig::default()).unwrap();
        let mut b = MapOrchestrator::new(GeneratorConfig::default()).unwrap();
        a.generate_heightmap().unwrap();
        b.generate_heightmap().unwrap();
        assert_eq!(a.grid().elevation_map(), b.grid().elevation_map());
    }

    #[test]
    fn test_rescale_hits_total_at_maximum() {
        let mut map = MapOrchestrator::new(GeneratorConfig::default()).unwrap();
        map.generate_heightmap().unwrap();
        let max = map.grid().elevation_map().max_value().unwrap();
        assert!((max - 15.0).abs() < 1e-9);
        assert!(map.grid().elevation_map().values().all(|&e| e >= 0.0));
    }

    #[test]
    fn test_degenerate_field_is_rejected() {
        let flat = Tilemap::new_with(4, 4, 0.0);
        let err = rescale_to_range(&flat, 15.0).unwrap_err();
        assert!(matches!(err, TerrainError::DegenerateNoiseField { max } if max == 0.0));

        let ok = rescale_to_range(&Tilemap::new_with(2, 2, 0.5), 6.0).unwrap();
        assert!(ok.values().all(|&v| v == 6.0));
    }

    #[test]
    fn test_graph_before_heightmap_has_default_nodes() {
        let mut map = MapOrchestrator::new(example_config()).unwrap();
        map.initialize_graph().unwrap();
        assert_eq!(map.graph().node_count(), 9);
        for (_, cell) in map.graph().nodes() {
            assert_eq!(cell.elevation, 0.0);
            assert_eq!(cell.material, Material::Water);
        }
    }

    #[test]
    fn test_graph_rebuild_does_not_duplicate() {
        let mut map = MapOrchestrator::new(example_config()).unwrap();
        map.generate().unwrap();
        map.initialize_graph().unwrap();
        assert_eq!(map.graph().node_count(), 9);
        assert_eq!(map.graph().edge_count(), 20);
    }

    #[test]
    fn test_graph_nodes_are_snapshots_until_resync() {
        let mut map = MapOrchestrator::new(example_config()).unwrap();
        map.generate().unwrap();

        map.grid_mut().set_cell_elevation(1, 1, -5.5).unwrap();
        assert_eq!(map.state(), PipelineState::HeightmapGenerated);
        assert_ne!(map.graph().node((1, 1)).unwrap().elevation, -5.5);

        map.resync_graph().unwrap();
        let node = map.graph().node((1, 1)).unwrap();
        assert_eq!(node.elevation, -5.5);
        assert_eq!(node.material, Material::Water);
        assert_eq!(map.state(), PipelineState::GraphPopulated);
        assert_eq!(map.graph().edge_count(), 20);
    }

    #[test]
    fn test_neighbors_follow_visiting_order() {
        let mut map = MapOrchestrator::new(example_config()).unwrap();
        map.generate().unwrap();
        let mut from_origin = map.graph().neighbors((0, 0));
        from_origin.sort();
        assert_eq!(from_origin, vec![(0, 1), (1, 0), (1, 1)]);
        let mut into_center = map.graph().predecessors((1, 1));
        into_center.sort();
        assert_eq!(into_center, vec![(0, 0), (0, 1), (0, 2), (1, 0)]);
    }

    #[test]
    fn test_three_dimensional_pipeline() {
        let config = GeneratorConfig::with_grid(3, 2, 0.004, 0.002, 42);
        let mut map = MapOrchestrator::new_3d(config).unwrap();
        map.generate().unwrap();

        let levels = map.grid().z_levels();
        assert_eq!(levels, 6);
        assert_eq!(map.graph().node_count(), 3 * 2 * levels);
        // vertical links per column plus links from x - 1
        assert_eq!(map.graph().edge_count(), 3 * 2 * (levels - 1) + 2 * 2 * levels);

        // the highest column reaches the top level, give or take float rounding
        let tallest = map.grid().land_level_map().values().copied().max().unwrap();
        assert!(tallest + 1 >= levels && tallest <= levels);
    }

    #[test]
    fn test_degenerate_field_aborts_run() {
        // scale 0 samples Perlin at the origin everywhere; one region owns every cell
        let mut config = GeneratorConfig::with_grid(2, 2, 5.0, 1.0, 9);
        config.noise.scale = 0.0;
        config.noise.regions = 1;
        let mut map = MapOrchestrator::new(config).unwrap();
        assert!(map.raw_field().values().all(|&v| v == 0.0));

        let err = map.generate().unwrap_err();
        assert!(matches!(err, TerrainError::DegenerateNoiseField { .. }));
        assert_eq!(map.state(), PipelineState::Empty);
        assert_eq!(map.grid(), &Grid2D::new(2, 2, map.grid().range()));
        assert!(map.graph().is_empty());
    }

    #[test]
    fn test_oversized_layered_grid_rejected() {
        let config = GeneratorConfig::with_grid(64, 64, 1000.0, 0.0, 1);
        let err = MapOrchestrator::new_3d(config).err().unwrap();
        assert!(matches!(err, TerrainError::InvalidConfig(_)));
    }

    #[test]
    fn test_mismatched_grid_rejected() {
        let grid = Grid2D::new(4, 4, example_config().vertical_range().unwrap());
        assert!(MapOrchestrator::with_grid(example_config(), grid).is_err());
    }
}
