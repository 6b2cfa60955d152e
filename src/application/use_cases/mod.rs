/// Use cases module containing application business logic orchestration
mod build_dependency_graph;
mod build_download_trends;

pub use build_dependency_graph::BuildDependencyGraphUseCase;
pub use build_download_trends::BuildDownloadTrendsUseCase;
