use crate::dependency_graph::domain::{DependencyGraph, DownloadTrends};
use crate::shared::Result;

/// GraphFormatter port for rendering a dependency graph
///
/// Implementations hand the graph to an external renderer (JSON for the
/// force-directed view, Markdown for reading, DOT for Graphviz).
pub trait GraphFormatter {
    /// # Errors
    /// Returns an error if serialization fails
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String>;
}

/// TrendsFormatter port for rendering weekly download trends
pub trait TrendsFormatter {
    /// Renders the trends; every series is densified against the shared week axis
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format_trends(&self, trends: &DownloadTrends) -> Result<String>;
}
