use crate::adapters::outbound::formatters::{DotFormatter, JsonFormatter, MarkdownFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::{GraphFormatter, TrendsFormatter};
use crate::shared::error::ScopeGraphError;
use crate::shared::Result;

/// Factory for creating report formatters
///
/// This factory encapsulates the creation logic for different formatter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a graph formatter for the specified output format
    ///
    /// # Examples
    /// ```
    /// use scope_graph::application::dto::OutputFormat;
    /// use scope_graph::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create_graph_formatter(OutputFormat::Dot);
    /// ```
    pub fn create_graph_formatter(format: OutputFormat) -> Box<dyn GraphFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
            OutputFormat::Dot => Box::new(DotFormatter::new()),
        }
    }

    /// Creates a trends formatter for the specified output format
    ///
    /// # Errors
    /// Returns `ScopeGraphError::UnsupportedFormat` for `Dot`
    pub fn create_trends_formatter(format: OutputFormat) -> Result<Box<dyn TrendsFormatter>> {
        match format {
            OutputFormat::Json => Ok(Box::new(JsonFormatter::new())),
            OutputFormat::Markdown => Ok(Box::new(MarkdownFormatter::new())),
            OutputFormat::Dot => Err(ScopeGraphError::UnsupportedFormat {
                message: "download trends cannot be rendered as DOT".to_string(),
                hint: "Use --format json or --format markdown for the downloads command"
                    .to_string(),
            }
            .into()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use scope_graph::application::dto::OutputFormat;
    /// use scope_graph::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Generating JSON output...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating JSON output...",
            OutputFormat::Markdown => "📝 Generating Markdown output...",
            OutputFormat::Dot => "📝 Generating Graphviz DOT output...",
        }
    }
}
