//! Map variants and their structured (JSON) form
//!
//! Every variant serializes to an object carrying a `"type"` discriminant. Deserialization
//! resolves the discriminant through a static table, so an unknown name is reported as
//! such instead of surfacing as a generic parse failure.

pub mod grid_map;
pub mod height_map;
pub mod precipitation_map;
pub mod terrain_map;
pub mod voronoi_map;
pub mod world_data;

pub use grid_map::GridMap;
pub use height_map::HeightMap;
pub use precipitation_map::PrecipitationMap;
pub use terrain_map::TerrainMap;
pub use voronoi_map::VoronoiMap;
pub use world_data::WorldData;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TerrainError};

/// Discriminant of every registered map type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapKind {
    GridMap,
    HeightMap,
    PrecipitationMap,
    VoronoiMap,
    TerrainMap,
}

const REGISTRY: &[(&str, MapKind)] = &[
    ("GridMap", MapKind::GridMap),
    ("HeightMap", MapKind::HeightMap),
    ("PrecipitationMap", MapKind::PrecipitationMap),
    ("VoronoiMap", MapKind::VoronoiMap),
    ("TerrainMap", MapKind::TerrainMap),
];

impl MapKind {
    pub fn all() -> impl Iterator<Item = MapKind> {
        REGISTRY.iter().map(|&(_, kind)| kind)
    }

    pub fn name(&self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    pub fn from_name(name: &str) -> Result<Self> {
        REGISTRY
            .iter()
            .find(|(registered, _)| *registered == name)
            .map(|&(_, kind)| kind)
            .ok_or_else(|| TerrainError::UnknownMapType(name.to_string()))
    }

    /// Factory producing an empty instance of this kind.
    pub fn create_default(&self) -> MapVariant {
        match self {
            MapKind::GridMap => MapVariant::GridMap(GridMap::default()),
            MapKind::HeightMap => MapVariant::HeightMap(HeightMap::default()),
            MapKind::PrecipitationMap => MapVariant::PrecipitationMap(PrecipitationMap::default()),
            MapKind::VoronoiMap => MapVariant::VoronoiMap(VoronoiMap::default()),
            MapKind::TerrainMap => MapVariant::TerrainMap(TerrainMap::default()),
        }
    }
}

/// Any registered map.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MapVariant {
    GridMap(GridMap),
    HeightMap(HeightMap),
    PrecipitationMap(PrecipitationMap),
    VoronoiMap(VoronoiMap),
    TerrainMap(TerrainMap),
}

impl MapVariant {
    pub fn kind(&self) -> MapKind {
        match self {
            MapVariant::GridMap(_) => MapKind::GridMap,
            MapVariant::HeightMap(_) => MapKind::HeightMap,
            MapVariant::PrecipitationMap(_) => MapKind::PrecipitationMap,
            MapVariant::VoronoiMap(_) => MapKind::VoronoiMap,
            MapVariant::TerrainMap(_) => MapKind::TerrainMap,
        }
    }

    pub fn to_structured_form(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_structured_form(data: &Value) -> Result<Self> {
        let name = data
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| TerrainError::MalformedStructuredInput("missing \"type\" key".to_string()))?;
        let kind = MapKind::from_name(name)?;

        let variant: MapVariant = serde_json::from_value(data.clone())
            .map_err(|e| TerrainError::MalformedStructuredInput(format!("{}: {}", name, e)))?;
        debug_assert_eq!(variant.kind(), kind);
        variant.validate()?;
        Ok(variant)
    }

    /// Cross-field checks serde cannot express.
    fn validate(&self) -> Result<()> {
        match self {
            MapVariant::GridMap(map) => map.validate(),
            MapVariant::HeightMap(map) => map.validate(),
            MapVariant::PrecipitationMap(map) => map.validate(),
            MapVariant::VoronoiMap(_) => Ok(()),
            MapVariant::TerrainMap(map) => map.grid.validate(),
        }
    }
}

/// `rows[y][x]` serialization for grid-valued map fields.
pub(crate) mod rows {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::tilemap::Tilemap;

    pub fn serialize<S: Serializer>(map: &Tilemap<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        map.to_rows().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tilemap<f64>, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        Tilemap::from_rows(rows).ok_or_else(|| serde::de::Error::custom("grid rows have different lengths"))
    }
}

/// Shared check that a rows-encoded grid agrees with the declared dimensions.
/// A grid with no rows carries no width, so only the height is compared then.
pub(crate) fn check_dimensions(name: &str, declared: (usize, usize), grid: (usize, usize)) -> Result<()> {
    let no_rows = declared.1 == 0 && grid.1 == 0;
    if declared == grid || no_rows {
        Ok(())
    } else {
        Err(TerrainError::MalformedStructuredInput(format!(
            "{} declares {}x{} but grid is {}x{}",
            name, declared.0, declared.1, grid.0, grid.1
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_lists_every_kind() {
        let names: Vec<&str> = MapKind::all().map(|k| k.name()).collect();
        assert_eq!(names, vec!["GridMap", "HeightMap", "PrecipitationMap", "VoronoiMap", "TerrainMap"]);
        for kind in MapKind::all() {
            assert_eq!(MapKind::from_name(kind.name()).unwrap(), kind);
            assert_eq!(kind.create_default().kind(), kind);
        }
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let err = MapVariant::from_structured_form(&json!({"type": "RainbowMap"})).unwrap_err();
        assert!(matches!(err, TerrainError::UnknownMapType(ref n) if n == "RainbowMap"));
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let err = MapVariant::from_structured_form(&json!({"width": 3})).unwrap_err();
        assert!(matches!(err, TerrainError::MalformedStructuredInput(_)));
    }

    #[test]
    fn test_missing_keys_are_malformed() {
        let err = MapVariant::from_structured_form(&json!({"type": "GridMap", "width": 2})).unwrap_err();
        assert!(matches!(err, TerrainError::MalformedStructuredInput(_)));
    }

    #[test]
    fn test_every_default_round_trips() {
        for kind in MapKind::all() {
            let value = kind.create_default().to_structured_form().unwrap();
            assert_eq!(value["type"], kind.name());
            let restored = MapVariant::from_structured_form(&value).unwrap();
            assert_eq!(restored.kind(), kind);
        }
    }
}
