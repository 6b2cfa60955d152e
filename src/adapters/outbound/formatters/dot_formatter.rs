use crate::dependency_graph::domain::DependencyGraph;
use crate::ports::outbound::GraphFormatter;
use crate::shared::Result;

/// Fill colour of graph nodes
const NODE_FILL: &str = "#2c3e50";

/// DotFormatter adapter rendering the graph as a Graphviz digraph
///
/// Nodes are labelled with their short name; edges are coloured by their
/// primary kind and labelled `type: version`.
pub struct DotFormatter;

impl DotFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Quotes a DOT identifier or label
    fn quote(text: &str) -> String {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

impl Default for DotFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphFormatter for DotFormatter {
    fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        let mut output = String::new();

        output.push_str("digraph dependencies {\n");
        output.push_str("    rankdir=LR;\n");
        output.push_str(&format!(
            "    node [shape=circle, style=filled, fillcolor=\"{}\", fontcolor=\"#ffffff\"];\n",
            NODE_FILL
        ));

        for node in graph.nodes() {
            output.push_str(&format!(
                "    {} [label={}, tooltip={}];\n",
                Self::quote(&node.id),
                Self::quote(&node.label),
                Self::quote(&node.id)
            ));
        }

        for edge in graph.edges() {
            let label = format!("{}: {}", edge.primary_type, edge.primary_version);
            output.push_str(&format!(
                "    {} -> {} [label={}, color=\"{}\", fontcolor=\"{}\"];\n",
                Self::quote(&edge.source),
                Self::quote(&edge.target),
                Self::quote(&label),
                edge.primary_type.color(),
                edge.primary_type.color()
            ));
        }

        output.push_str("}\n");
        Ok(output)
    }
}
