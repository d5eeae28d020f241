//! Directed adjacency graph over grid coordinates
//!
//! Node attributes are copies taken when the node is added. The graph is a point-in-time
//! projection of the grid: later grid writes are not reflected until the owner explicitly
//! resyncs the nodes.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// Directed graph keyed by coordinate `C`, with node attributes `N` and edge attributes `E`.
#[derive(Clone, Debug)]
pub struct TerrainGraph<C, N = Cell, E = ()> {
    nodes: Vec<(C, N)>,
    index: HashMap<C, usize>,
    successors: Vec<Vec<(usize, E)>>,
    predecessors: Vec<Vec<usize>>,
    edge_count: usize,
}

impl<C, N, E> Default for TerrainGraph<C, N, E> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            edge_count: 0,
        }
    }
}

impl<C, N, E> TerrainGraph<C, N, E>
where
    C: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.successors.clear();
        self.predecessors.clear();
        self.edge_count = 0;
    }

    /// Insert a node, or overwrite the attributes of an existing one in place.
    pub fn add_node(&mut self, coord: C, attributes: N) {
        match self.index.get(&coord) {
            Some(&i) => self.nodes[i].1 = attributes,
            None => {
                self.index.insert(coord, self.nodes.len());
                self.nodes.push((coord, attributes));
                self.successors.push(Vec::new());
                self.predecessors.push(Vec::new());
            }
        }
    }

    pub fn has_node(&self, coord: C) -> bool {
        self.index.contains_key(&coord)
    }

    pub fn node(&self, coord: C) -> Option<&N> {
        self.index.get(&coord).map(|&i| &self.nodes[i].1)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (C, &N)> {
        self.nodes.iter().map(|(c, n)| (*c, n))
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (C, &mut N)> {
        self.nodes.iter_mut().map(|(c, n)| (*c, n))
    }

    /// Edges as `(source, target, attributes)`, grouped by source in node order.
    pub fn edges(&self) -> impl Iterator<Item = (C, C, &E)> {
        self.successors.iter().enumerate().flat_map(move |(s, targets)| {
            targets
                .iter()
                .map(move |(t, attrs)| (self.nodes[s].0, self.nodes[*t].0, attrs))
        })
    }

    pub fn has_edge(&self, source: C, target: C) -> bool {
        match (self.index.get(&source), self.index.get(&target)) {
            (Some(&s), Some(&t)) => self.successors[s].iter().any(|(n, _)| *n == t),
            _ => false,
        }
    }

    pub fn edge(&self, source: C, target: C) -> Option<&E> {
        let s = *self.index.get(&source)?;
        let t = *self.index.get(&target)?;
        self.successors[s].iter().find(|(n, _)| *n == t).map(|(_, e)| e)
    }

    /// Targets of edges leaving `coord`, in insertion order. Unknown nodes have none.
    pub fn neighbors(&self, coord: C) -> Vec<C> {
        match self.index.get(&coord) {
            Some(&i) => self.successors[i].iter().map(|(t, _)| self.nodes[*t].0).collect(),
            None => Vec::new(),
        }
    }

    /// Sources of edges entering `coord`.
    pub fn predecessors(&self, coord: C) -> Vec<C> {
        match self.index.get(&coord) {
            Some(&i) => self.predecessors[i].iter().map(|s| self.nodes[*s].0).collect(),
            None => Vec::new(),
        }
    }
}

impl<C, N, E> TerrainGraph<C, N, E>
where
    C: Copy + Eq + Hash,
    N: Default,
{
    fn ensure_node(&mut self, coord: C) -> usize {
        if let Some(&i) = self.index.get(&coord) {
            return i;
        }
        self.add_node(coord, N::default());
        self.nodes.len() - 1
    }

    /// Add a directed edge. Missing endpoints are created with default attributes;
    /// an existing edge keeps its position and takes the new attributes.
    pub fn add_edge(&mut self, source: C, target: C, attributes: E) {
        let s = self.ensure_node(source);
        let t = self.ensure_node(target);
        if let Some(existing) = self.successors[s].iter_mut().find(|(n, _)| *n == t) {
            existing.1 = attributes;
            return;
        }
        self.successors[s].push((t, attributes));
        self.predecessors[t].push(s);
        self.edge_count += 1;
    }
}

/// Serialized node entry of a node-link document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry<C, N> {
    pub id: C,
    pub attributes: N,
}

/// Serialized edge entry of a node-link document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry<C, E> {
    pub source: C,
    pub target: C,
    pub attributes: E,
}

/// Node-link document form of a graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkData<C, N, E> {
    pub directed: bool,
    pub nodes: Vec<NodeEntry<C, N>>,
    pub links: Vec<LinkEntry<C, E>>,
}

impl<C, N, E> TerrainGraph<C, N, E>
where
    C: Copy + Eq + Hash,
    N: Clone + Default,
    E: Clone,
{
    pub fn to_node_link(&self) -> NodeLinkData<C, N, E> {
        NodeLinkData {
            directed: true,
            nodes: self
                .nodes
                .iter()
                .map(|(id, n)| NodeEntry { id: *id, attributes: n.clone() })
                .collect(),
            links: self
                .edges()
                .map(|(source, target, e)| LinkEntry { source, target, attributes: e.clone() })
                .collect(),
        }
    }

    pub fn from_node_link(data: NodeLinkData<C, N, E>) -> Self {
        let mut graph = Self::new();
        for node in data.nodes {
            graph.add_node(node.id, node.attributes);
        }
        for link in data.links {
            graph.add_edge(link.source, link.target, link.attributes);
        }
        graph
    }
}
