pub mod aggregated_dependencies;
pub mod dependency_kind;
pub mod download_series;
pub mod graph;
pub mod package_manifest;
pub mod scope;

pub use aggregated_dependencies::AggregatedDependencies;
pub use dependency_kind::DependencyKind;
pub use download_series::{DailyDownloads, DenseTrends, DownloadRange, DownloadTrends, WeeklySeries};
pub use graph::{DependencyGraph, GraphNode, RawEdge, ResolvedEdge};
pub use package_manifest::{PackageManifest, PeerDependencyMeta};
pub use scope::Scope;
