use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::{Result, TerrainError};
use crate::grid::Grid2D;
use crate::orchestrator::MapOrchestrator;

use super::{HeightMap, MapVariant, TerrainMap};

/// Named maps plus free-form metadata, persisted as one JSON document.
#[derive(Clone, Debug, Default)]
pub struct WorldData {
    pub meta_data: Map<String, Value>,
    pub maps: BTreeMap<String, MapVariant>,
}

impl WorldData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> usize {
        self.meta_usize("width")
    }

    pub fn set_width(&mut self, width: usize) {
        self.meta_data.insert("width".to_string(), json!(width));
    }

    pub fn height(&self) -> usize {
        self.meta_usize("height")
    }

    pub fn set_height(&mut self, height: usize) {
        self.meta_data.insert("height".to_string(), json!(height));
    }

    pub fn seed(&self) -> Option<u64> {
        self.meta_data.get("seed").and_then(Value::as_u64)
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.meta_data.insert("seed".to_string(), json!(seed));
    }

    fn meta_usize(&self, key: &str) -> usize {
        self.meta_data
            .get(key)
            .and_then(Value::as_u64)
            .map_or(0, |v| v as usize)
    }

    pub fn add_map(&mut self, name: impl Into<String>, map: MapVariant) {
        self.maps.insert(name.into(), map);
    }

    pub fn get_map(&self, name: &str) -> Option<&MapVariant> {
        self.maps.get(name)
    }

    /// The terrain grid stored under `"terrain"`, if any.
    pub fn terrain(&self) -> Option<&Grid2D> {
        match self.get_map("terrain") {
            Some(MapVariant::TerrainMap(map)) => Some(&map.grid),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        let mut maps = Map::new();
        for (name, map) in &self.maps {
            maps.insert(name.clone(), map.to_structured_form()?);
        }
        Ok(json!({
            "meta_data": self.meta_data,
            "maps": maps,
        }))
    }

    pub fn from_value(data: &Value) -> Result<Self> {
        let meta_data = data
            .get("meta_data")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| TerrainError::MalformedStructuredInput("missing \"meta_data\" object".to_string()))?;
        let entries = data
            .get("maps")
            .and_then(Value::as_object)
            .ok_or_else(|| TerrainError::MalformedStructuredInput("missing \"maps\" object".to_string()))?;

        let mut maps = BTreeMap::new();
        for (name, value) in entries {
            maps.insert(name.clone(), MapVariant::from_structured_form(value)?);
        }
        Ok(Self { meta_data, maps })
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.to_value()?)?;
        fs::write(path.as_ref(), text)?;
        info!(path = %path.as_ref().display(), maps = self.maps.len(), "wrote world dump");
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        Self::from_value(&value)
    }

    /// Dump of a 2D run: the terrain grid, its raw elevations, and graph summary metadata.
    pub fn from_orchestrator(orchestrator: &MapOrchestrator<Grid2D>) -> Self {
        let grid = orchestrator.grid();
        let range = grid.range();

        let mut world = Self::new();
        world.set_width(grid.width());
        world.set_height(grid.height());
        world.set_seed(Some(orchestrator.seed()));
        world.meta_data.insert("max_elevation".to_string(), json!(range.max_elevation));
        world.meta_data.insert("max_depth".to_string(), json!(range.max_depth));
        world.meta_data.insert("node_count".to_string(), json!(orchestrator.graph().node_count()));
        world.meta_data.insert("edge_count".to_string(), json!(orchestrator.graph().edge_count()));

        let heights = HeightMap::from_tilemap(grid.elevation_map(), (-range.max_depth, range.max_elevation));
        world.add_map("height", MapVariant::HeightMap(heights));
        world.add_map("terrain", MapVariant::TerrainMap(TerrainMap::from_grid(grid.clone())));
        world
    }
}
