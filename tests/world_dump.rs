//! World dumps written to disk and read back.

use terrain_generator::maps::{MapVariant, WorldData};
use terrain_generator::{GeneratorConfig, MapOrchestrator, TerrainError};

fn generated() -> MapOrchestrator {
    let mut orchestrator = MapOrchestrator::new(GeneratorConfig::with_grid(8, 6, 10.0, 5.0, 1234)).unwrap();
    orchestrator.generate().unwrap();
    orchestrator
}

#[test]
fn test_dump_round_trip_preserves_terrain() {
    let orchestrator = generated();
    let world = WorldData::from_orchestrator(&orchestrator);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.json");
    world.to_json_file(&path).unwrap();
    let restored = WorldData::from_json_file(&path).unwrap();

    assert_eq!((restored.width(), restored.height()), (8, 6));
    assert_eq!(restored.seed(), Some(1234));
    assert_eq!(restored.meta_data["node_count"], 48);
    assert_eq!(restored.meta_data["edge_count"], orchestrator.graph().edge_count());

    let terrain = restored.terrain().unwrap();
    assert_eq!(terrain.elevation_map(), orchestrator.grid().elevation_map());
    assert_eq!(terrain.material_map(), orchestrator.grid().material_map());

    match restored.get_map("height") {
        Some(MapVariant::HeightMap(heights)) => {
            assert_eq!(heights.grid, orchestrator.grid().elevation_map());
            assert_eq!(heights.height_range, (-5.0, 10.0));
        }
        other => panic!("unexpected height map {:?}", other.map(MapVariant::kind)),
    }
}

#[test]
fn test_corrupt_dump_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"meta_data": {}, "maps": {"terrain": {"type": "TerrainMap"}}}"#).unwrap();

    let err = WorldData::from_json_file(&path).unwrap_err();
    assert!(matches!(err, TerrainError::MalformedStructuredInput(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = WorldData::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, TerrainError::Io(_)));
}
