use crate::dependency_graph::domain::{
    DependencyGraph, DependencyKind, DownloadTrends, GraphNode, ResolvedEdge,
};
use crate::ports::outbound::{GraphFormatter, TrendsFormatter};
use crate::shared::Result;

/// Markdown table header for the package list
const PACKAGE_TABLE_HEADER: &str = "| Package | Name | Dependencies | Used by |\n";

/// Markdown table separator line for the package list
const PACKAGE_TABLE_SEPARATOR: &str = "|---------|------|--------------|---------|\n";

/// Markdown table header for the edge list
const EDGE_TABLE_HEADER: &str = "| Source | Target | Type | Version | All Types |\n";

/// Markdown table separator line for the edge list
const EDGE_TABLE_SEPARATOR: &str = "|--------|--------|------|---------|-----------|\n";

/// MarkdownFormatter adapter for human-readable graph and trends reports
///
/// This adapter implements both formatter ports. The graph report carries
/// the same per-package "Dependencies" / "Used by" breakdown the interactive
/// view shows on hover.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn label_of<'a>(graph: &'a DependencyGraph, id: &'a str) -> &'a str {
        graph.node(id).map(|node| node.label.as_str()).unwrap_or(id)
    }

    fn join_types(types: &[DependencyKind]) -> String {
        types
            .iter()
            .map(DependencyKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering graph sections
impl MarkdownFormatter {
    fn render_graph_summary(&self, output: &mut String, graph: &DependencyGraph) {
        output.push_str("# Dependency Graph\n\n");
        output.push_str("## Summary\n\n");
        output.push_str(&format!("- Packages: {}\n", graph.node_count()));
        output.push_str(&format!("- Dependencies: {}\n", graph.edge_count()));

        let by_type = graph.edge_count_by_type();
        for kind in DependencyKind::ALL {
            let count = by_type.get(&kind).copied().unwrap_or(0);
            output.push_str(&format!("  - {}: {}\n", kind, count));
        }
        output.push('\n');
    }

    fn render_packages(&self, output: &mut String, graph: &DependencyGraph) {
        output.push_str("## Packages\n\n");

        if graph.nodes().is_empty() {
            output.push_str("*No packages*\n\n");
            return;
        }

        output.push_str(PACKAGE_TABLE_HEADER);
        output.push_str(PACKAGE_TABLE_SEPARATOR);
        for node in graph.nodes() {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&node.id),
                Self::escape_markdown_table_cell(&node.label),
                graph.outgoing(&node.id).count(),
                graph.incoming(&node.id).count()
            ));
        }
        output.push('\n');
    }

    fn render_edges(&self, output: &mut String, graph: &DependencyGraph) {
        output.push_str("## Dependencies\n\n");

        if graph.edges().is_empty() {
            output.push_str("*No dependencies inside the scope*\n\n");
            return;
        }

        output.push_str(EDGE_TABLE_HEADER);
        output.push_str(EDGE_TABLE_SEPARATOR);
        for edge in graph.edges() {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&edge.source),
                Self::escape_markdown_table_cell(&edge.target),
                edge.primary_type,
                Self::escape_markdown_table_cell(&edge.primary_version),
                Self::join_types(&edge.all_types)
            ));
        }
        output.push('\n');
    }

    fn render_edge_line(output: &mut String, arrow: &str, label: &str, edge: &ResolvedEdge) {
        output.push_str(&format!(
            "- {} {} *({}: {})*\n",
            arrow, label, edge.primary_type, edge.primary_version
        ));
    }

    fn render_package_details(&self, output: &mut String, graph: &DependencyGraph) {
        output.push_str("## Package Details\n\n");

        for node in graph.nodes() {
            self.render_node_details(output, graph, node);
        }
    }

    fn render_node_details(&self, output: &mut String, graph: &DependencyGraph, node: &GraphNode) {
        output.push_str(&format!("### {}\n\n", node.id));

        let outgoing: Vec<&ResolvedEdge> = graph.outgoing(&node.id).collect();
        let incoming: Vec<&ResolvedEdge> = graph.incoming(&node.id).collect();

        if outgoing.is_empty() {
            output.push_str("*No dependencies*\n\n");
        } else {
            output.push_str(&format!("**Dependencies ({}):**\n\n", outgoing.len()));
            for edge in outgoing {
                Self::render_edge_line(output, "→", Self::label_of(graph, &edge.target), edge);
            }
            output.push('\n');
        }

        if !incoming.is_empty() {
            output.push_str(&format!("**Used by ({}):**\n\n", incoming.len()));
            for edge in incoming {
                Self::render_edge_line(output, "←", Self::label_of(graph, &edge.source), edge);
            }
            output.push('\n');
        }
    }
}

/// Helper methods for rendering trends sections
impl MarkdownFormatter {
    fn render_trends_table(&self, output: &mut String, trends: &DownloadTrends) {
        let dense = trends.densify();
        let names: Vec<&String> = dense.series.keys().collect();

        output.push_str("## Weekly Downloads\n\n");
        output.push_str("| Week |");
        for name in &names {
            output.push_str(&format!(" {} |", Self::escape_markdown_table_cell(name)));
        }
        output.push('\n');
        output.push_str("|------|");
        for _ in &names {
            output.push_str("---:|");
        }
        output.push('\n');

        for (index, week) in dense.weeks.iter().enumerate() {
            output.push_str(&format!("| {} |", week));
            for name in &names {
                let value = dense.series[*name].get(index).copied().unwrap_or(0);
                output.push_str(&format!(" {} |", value));
            }
            output.push('\n');
        }
        output.push('\n');
    }

    fn render_trends_totals(&self, output: &mut String, trends: &DownloadTrends) {
        output.push_str("## Totals\n\n");
        output.push_str("| Package | Downloads |\n");
        output.push_str("|---------|----------:|\n");
        for (name, weekly) in trends.series() {
            output.push_str(&format!(
                "| {} | {} |\n",
                Self::escape_markdown_table_cell(name),
                weekly.total()
            ));
        }
        output.push('\n');
    }
}

impl GraphFormatter for MarkdownFormatter {
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        let mut output = String::new();

        self.render_graph_summary(&mut output, graph);
        self.render_packages(&mut output, graph);
        self.render_edges(&mut output, graph);

        if !graph.nodes().is_empty() {
            self.render_package_details(&mut output, graph);
        }

        Ok(output)
    }
}

impl TrendsFormatter for MarkdownFormatter {
    fn format_trends(&self, trends: &DownloadTrends) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Download Trends\n\n");

        if trends.is_empty() {
            output.push_str("*No download data*\n");
            return Ok(output);
        }

        if let (Some(first), Some(last)) = (trends.weeks().first(), trends.weeks().last()) {
            output.push_str(&format!(
                "{} packages, {} weeks ({} to {})\n\n",
                trends.package_count(),
                trends.weeks().len(),
                first,
                last
            ));
        }

        self.render_trends_table(&mut output, trends);
        self.render_trends_totals(&mut output, trends);

        Ok(output)
    }
}
