use crate::dependency_graph::domain::{
    AggregatedDependencies, DependencyGraph, DependencyKind, GraphNode, RawEdge, Scope,
};
use crate::dependency_graph::policies::DependencyPriority;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One aggregation input: a package and its normalized dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependencies {
    pub name: String,
    pub info: AggregatedDependencies,
}

impl PackageDependencies {
    pub fn new(name: &str, info: AggregatedDependencies) -> Self {
        Self {
            name: name.to_string(),
            info,
        }
    }
}

/// GraphAggregator service building the scope's dependency graph
///
/// Only dependencies inside the tracked scope become nodes and edges; every
/// other dependency is ignored. Cycles are kept as independent directed edges.
pub struct GraphAggregator {
    scope: Scope,
}

impl GraphAggregator {
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Builds nodes and reduced edges for the given packages
    ///
    /// The accumulator is local to this call; concurrent runs share nothing.
    pub fn aggregate(&self, entries: &[PackageDependencies]) -> DependencyGraph {
        let mut accumulator = GraphAccumulator::default();

        for entry in entries {
            accumulator.ensure_node(&entry.name);

            for kind in DependencyKind::ALL {
                for (dependency, version_range) in entry.info.by_kind(kind) {
                    if !self.scope.contains(dependency) {
                        continue;
                    }
                    accumulator.ensure_node(dependency);
                    accumulator.record(&entry.name, dependency, kind, version_range);
                }
            }
        }

        accumulator.finish()
    }
}

/// Node and raw-edge state of one aggregation run
#[derive(Default)]
struct GraphAccumulator {
    nodes: BTreeMap<String, GraphNode>,
    raw_edges: BTreeMap<(String, String), RawEdge>,
}

impl GraphAccumulator {
    fn ensure_node(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            self.nodes.insert(id.to_string(), GraphNode::new(id));
        }
    }

    fn record(&mut self, source: &str, target: &str, kind: DependencyKind, version_range: &str) {
        self.raw_edges
            .entry((source.to_string(), target.to_string()))
            .or_insert_with(|| RawEdge::new(source, target))
            .observe(kind, version_range);
    }

    fn finish(self) -> DependencyGraph {
        let nodes = self.nodes.into_values().collect();
        let edges = self
            .raw_edges
            .into_values()
            .filter_map(DependencyPriority::resolve)
            .collect();
        DependencyGraph::new(nodes, edges)
    }
}
