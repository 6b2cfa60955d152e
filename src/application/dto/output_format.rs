/// Output format enumeration for the rendered reports
///
/// This enum belongs in the application layer as both the CLI and the
/// formatter factory need to understand it. `Dot` only applies to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON documents for the web views (default)
    Json,
    /// Human-readable Markdown report
    Markdown,
    /// Graphviz DOT (graph only)
    Dot,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'json', 'markdown' or 'dot'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Dot => write!(f, "dot"),
        }
    }
}
