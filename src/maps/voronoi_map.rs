use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::{NodeLinkData, TerrainGraph};

/// Free-form attributes attached to regions and boundaries.
pub type Attributes = Map<String, Value>;

/// Region adjacency: regions are nodes, shared boundaries are edges.
///
/// A boundary is undirected. It is stored once, in the direction it was first added.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "VoronoiDocument", from = "VoronoiDocument")]
pub struct VoronoiMap {
    graph: TerrainGraph<u64, Attributes, Attributes>,
}

#[derive(Serialize, Deserialize)]
struct VoronoiDocument {
    graph: NodeLinkData<u64, Attributes, Attributes>,
}

impl From<VoronoiMap> for VoronoiDocument {
    fn from(map: VoronoiMap) -> Self {
        Self {
            graph: map.graph.to_node_link(),
        }
    }
}

impl From<VoronoiDocument> for VoronoiMap {
    fn from(doc: VoronoiDocument) -> Self {
        Self {
            graph: TerrainGraph::from_node_link(doc.graph),
        }
    }
}

impl VoronoiMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region, replacing the attributes of an existing one.
    pub fn add_region(&mut self, region: u64, attributes: Attributes) {
        self.graph.add_node(region, attributes);
    }

    /// Add a boundary between two regions, creating missing regions with no attributes.
    pub fn add_boundary(&mut self, a: u64, b: u64, attributes: Attributes) {
        if self.graph.has_edge(b, a) {
            self.graph.add_edge(b, a, attributes);
        } else {
            self.graph.add_edge(a, b, attributes);
        }
    }

    pub fn has_boundary(&self, a: u64, b: u64) -> bool {
        self.graph.has_edge(a, b) || self.graph.has_edge(b, a)
    }

    pub fn boundary(&self, a: u64, b: u64) -> Option<&Attributes> {
        self.graph.edge(a, b).or_else(|| self.graph.edge(b, a))
    }

    pub fn get_data(&self, region: u64) -> Option<&Attributes> {
        self.graph.node(region)
    }

    pub fn region_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn boundary_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Regions sharing a boundary with `region`.
    pub fn adjacent_regions(&self, region: u64) -> Vec<u64> {
        let mut adjacent = self.graph.neighbors(region);
        adjacent.extend(self.graph.predecessors(region));
        adjacent.sort_unstable();
        adjacent.dedup();
        adjacent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::MapVariant;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => Attributes::new(),
        }
    }

    #[test]
    fn test_regions_and_boundaries() {
        let mut map = VoronoiMap::new();
        map.add_region(1, attrs(json!({"biome": "forest"})));
        map.add_region(2, attrs(json!({"biome": "desert"})));
        map.add_boundary(1, 2, attrs(json!({"length": 4.0})));

        assert!(map.has_boundary(2, 1));
        assert_eq!(map.get_data(1).unwrap()["biome"], "forest");
        assert!(map.get_data(9).is_none());

        map.add_boundary(2, 1, attrs(json!({"length": 5.0})));
        assert_eq!(map.boundary_count(), 1);
        assert_eq!(map.boundary(1, 2).unwrap()["length"], 5.0);
    }

    #[test]
    fn test_boundary_creates_missing_regions() {
        let mut map = VoronoiMap::new();
        map.add_boundary(3, 7, Attributes::new());
        assert_eq!(map.region_count(), 2);
        assert!(map.get_data(7).unwrap().is_empty());
        assert_eq!(map.adjacent_regions(7), vec![3]);
    }

    #[test]
    fn test_structured_form_round_trip() {
        let mut map = VoronoiMap::new();
        map.add_region(1, attrs(json!({"elevation": 0.4})));
        map.add_boundary(1, 2, attrs(json!({"river": true})));

        let value = MapVariant::VoronoiMap(map).to_structured_form().unwrap();
        assert_eq!(value["graph"]["directed"], true);

        match MapVariant::from_structured_form(&value).unwrap() {
            MapVariant::VoronoiMap(restored) => {
                assert_eq!(restored.region_count(), 2);
                assert_eq!(restored.boundary(2, 1).unwrap()["river"], true);
                assert_eq!(restored.get_data(1).unwrap()["elevation"], 0.4);
            }
            other => panic!("unexpected variant {:?}", other.kind()),
        }
    }
}
