//! End-to-end generation runs through the public API.

use std::io::Write;

use terrain_generator::{
    GeneratorConfig, Grid2D, Material, MapOrchestrator, PipelineState, TerrainError, VerticalRange,
};

#[test]
fn test_three_by_three_run() {
    let config = GeneratorConfig::with_grid(3, 3, 5.0, 1.0, 42);
    let mut orchestrator = MapOrchestrator::new(config).unwrap();
    assert_eq!(orchestrator.state(), PipelineState::Empty);

    orchestrator.generate().unwrap();
    assert_eq!(orchestrator.state(), PipelineState::GraphPopulated);
    assert_eq!(orchestrator.graph().node_count(), 9);
    assert_eq!(orchestrator.graph().edge_count(), 20);

    let grid = orchestrator.grid();
    let total = grid.range().total();
    for (_, _, cell) in grid.cells().iter() {
        assert!(cell.elevation >= 0.0 && cell.elevation <= total + 1e-9);
        assert_eq!(cell.material, Material::Land);
        assert!((cell.normalized_elevation - cell.elevation / total).abs() < 1e-12);
    }
}

#[test]
fn test_same_seed_same_terrain() {
    let run = |seed| {
        let mut orchestrator = MapOrchestrator::new(GeneratorConfig::with_grid(16, 12, 8.0, 3.0, seed)).unwrap();
        orchestrator.generate().unwrap();
        orchestrator.grid().elevation_map()
    };
    assert_eq!(run(7), run(7));
    assert_ne!(run(7), run(8));
}

#[test]
fn test_manual_write_then_resync() {
    let mut orchestrator = MapOrchestrator::new(GeneratorConfig::with_grid(4, 4, 5.0, 1.0, 3)).unwrap();
    orchestrator.generate().unwrap();

    orchestrator.grid_mut().set_cell_elevation(2, 2, -0.9).unwrap();
    assert_eq!(orchestrator.state(), PipelineState::HeightmapGenerated);
    let stale = *orchestrator.graph().node((2, 2)).unwrap();
    assert_ne!(stale.elevation, -0.9);

    orchestrator.resync_graph().unwrap();
    let fresh = orchestrator.graph().node((2, 2)).unwrap();
    assert_eq!(fresh.elevation, -0.9);
    // -0.9 / 6 is above -1/6, so still land
    assert_eq!(fresh.material, Material::Land);
    assert_eq!(orchestrator.graph().edge_count(), 42);
}

#[test]
fn test_out_of_range_write_fails() {
    let mut grid = Grid2D::new(5, 5, VerticalRange::new(10.0, 5.0).unwrap());
    let err = grid.set_cell_elevation(5, 0, 1.0).unwrap_err();
    assert!(matches!(err, TerrainError::OutOfRangeCoordinate { x: 5, y: 0, .. }));
}

#[test]
fn test_layered_run() {
    let config = GeneratorConfig::with_grid(3, 2, 0.004, 0.002, 11);
    let mut orchestrator = MapOrchestrator::new_3d(config).unwrap();
    orchestrator.generate().unwrap();

    let levels = orchestrator.grid().z_levels();
    assert_eq!(levels, 6);
    assert_eq!(orchestrator.graph().node_count(), 3 * 2 * levels);
}

#[test]
fn test_config_file_drives_run() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
seed = 5

[grid]
width = 6
height = 4
max_elevation = 2.0
max_depth = 1.0

[erosion]
iterations = 2
"#
    )
    .unwrap();

    let config = GeneratorConfig::load(file.path()).unwrap();
    assert_eq!(config.noise.regions, 50);

    let mut orchestrator = MapOrchestrator::new(config).unwrap();
    orchestrator.generate().unwrap();
    assert_eq!(orchestrator.grid().size(), (6, 4));
    assert_eq!(orchestrator.seed(), 5);
}
