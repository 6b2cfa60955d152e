//! scope-graph - dependency graphs and download trends for an npm scope
//!
//! This library discovers every package published under one npm scope, builds
//! the directed graph of dependencies between those packages and aggregates
//! their daily download counts into weekly trends. It follows hexagonal
//! architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`dependency_graph`): Pure graph and trend models and services
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Registry client, cache stores, formatters, console
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use scope_graph::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Registry client behind a 24h cache kept in memory
//! let cache = TtlCache::new(Arc::new(MemoryKeyValueStore::new()), Arc::new(SystemClock::new()));
//! let registry = CachingPackageRegistry::new(NpmRegistryClient::new()?, cache);
//!
//! // Create use case
//! let use_case = BuildDependencyGraphUseCase::new(registry, StderrProgressReporter::new());
//!
//! // Execute
//! let request = GraphRequest::new(Scope::new("@wxn0brp")?, 10);
//! let response = use_case.execute(request).await?;
//!
//! // Format output
//! let output = JsonFormatter::new().format_graph(&response.graph)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod dependency_graph;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::cache::TtlCache;
    pub use crate::adapters::outbound::clock::SystemClock;
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::{DotFormatter, JsonFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::network::{CachingPackageRegistry, NpmRegistryClient};
    pub use crate::adapters::outbound::storage::{FileKeyValueStore, MemoryKeyValueStore};
    pub use crate::application::dto::{
        GraphRequest, GraphResponse, OutputFormat, TrendsRequest, TrendsResponse,
    };
    pub use crate::application::use_cases::{
        BuildDependencyGraphUseCase, BuildDownloadTrendsUseCase,
    };
    pub use crate::dependency_graph::domain::{
        DependencyGraph, DependencyKind, DownloadTrends, Scope,
    };
    pub use crate::dependency_graph::services::{GraphAggregator, WeekBucketer};
    pub use crate::ports::outbound::{
        Clock, GraphFormatter, KeyValueStore, OutputPresenter, PackageRegistry, ProgressReporter,
        TrendsFormatter,
    };
    pub use crate::shared::Result;
}
