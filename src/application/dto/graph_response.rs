use super::SkippedPackage;
use crate::dependency_graph::domain::DependencyGraph;

/// GraphResponse - result of the dependency graph use case
#[derive(Debug, Clone)]
pub struct GraphResponse {
    pub graph: DependencyGraph,
    /// Names returned by the scope search
    pub package_count: usize,
    /// Packages whose manifest could not be retrieved, sorted by name
    pub skipped: Vec<SkippedPackage>,
}

impl GraphResponse {
    pub fn new(graph: DependencyGraph, package_count: usize, skipped: Vec<SkippedPackage>) -> Self {
        Self {
            graph,
            package_count,
            skipped,
        }
    }
}
