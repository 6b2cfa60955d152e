use crate::dependency_graph::domain::{DependencyGraph, DependencyKind, DownloadTrends};
use crate::ports::outbound::{GraphFormatter, TrendsFormatter};
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct GraphDocument<'a> {
    nodes: Vec<NodeDocument<'a>>,
    edges: Vec<EdgeDocument<'a>>,
}

#[derive(Debug, Serialize)]
struct NodeDocument<'a> {
    id: &'a str,
    label: &'a str,
}

#[derive(Debug, Serialize)]
struct EdgeDocument<'a> {
    source: &'a str,
    target: &'a str,
    #[serde(rename = "type")]
    kind: DependencyKind,
    version: &'a str,
    #[serde(rename = "allTypes")]
    all_types: &'a [DependencyKind],
}

/// JsonFormatter adapter producing the documents consumed by the web views
///
/// - graph: `{ nodes: [{ id, label }], edges: [{ source, target, type, version, allTypes }] }`
/// - trends: `{ weeks: ["YYYY-MM-DD", ...], series: { name: [n, ...] } }`
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphFormatter for JsonFormatter {
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        let document = GraphDocument {
            nodes: graph
                .nodes()
                .iter()
                .map(|node| NodeDocument {
                    id: &node.id,
                    label: &node.label,
                })
                .collect(),
            edges: graph
                .edges()
                .iter()
                .map(|edge| EdgeDocument {
                    source: &edge.source,
                    target: &edge.target,
                    kind: edge.primary_type,
                    version: &edge.primary_version,
                    all_types: &edge.all_types,
                })
                .collect(),
        };

        serde_json::to_string_pretty(&document).map_err(Into::into)
    }
}

impl TrendsFormatter for JsonFormatter {
    fn format_trends(&self, trends: &DownloadTrends) -> Result<String> {
        serde_json::to_string_pretty(&trends.densify()).map_err(Into::into)
    }
}
