mod graph_aggregator;
mod manifest_normalizer;
mod week_bucketer;

pub use graph_aggregator::{GraphAggregator, PackageDependencies};
pub use manifest_normalizer::ManifestNormalizer;
pub use week_bucketer::WeekBucketer;
