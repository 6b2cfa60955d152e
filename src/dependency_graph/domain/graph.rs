use super::DependencyKind;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A package in the graph, identified by its full name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
}

impl GraphNode {
    /// Creates a node whose label is the name without its `@scope/` part
    pub fn new(id: &str) -> Self {
        let label = id
            .split_once('/')
            .map(|(_, rest)| rest)
            .filter(|rest| !rest.is_empty())
            .unwrap_or(id);
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Every relation observed between one ordered `(source, target)` pair,
/// before priority reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    pub types: BTreeSet<DependencyKind>,
    pub versions: BTreeMap<DependencyKind, String>,
}

impl RawEdge {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            types: BTreeSet::new(),
            versions: BTreeMap::new(),
        }
    }

    /// Records one relation; a repeated kind keeps the last version seen
    pub fn observe(&mut self, kind: DependencyKind, version_range: &str) {
        self.types.insert(kind);
        self.versions.insert(kind, version_range.to_string());
    }
}

/// A directed, reduced edge: one per `(source, target)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEdge {
    pub source: String,
    pub target: String,
    pub primary_type: DependencyKind,
    pub primary_version: String,
    /// All observed kinds, highest priority first
    pub all_types: Vec<DependencyKind>,
}

/// DependencyGraph aggregate: the nodes and reduced edges of one aggregation run
///
/// Nodes are ordered by id and edges by `(source, target)`, so two runs over
/// the same packages produce identical graphs whatever the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<ResolvedEdge>,
}

impl DependencyGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<ResolvedEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Edges leaving `id` (what the package depends on)
    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ResolvedEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.source == id)
    }

    /// Edges entering `id` (who uses the package)
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ResolvedEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.target == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges per primary type
    pub fn edge_count_by_type(&self) -> BTreeMap<DependencyKind, usize> {
        let mut counts = BTreeMap::new();
        for edge in &self.edges {
            *counts.entry(edge.primary_type).or_insert(0) += 1;
        }
        counts
    }
}
