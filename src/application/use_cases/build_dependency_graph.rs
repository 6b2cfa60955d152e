use crate::application::dto::{GraphRequest, GraphResponse, SkippedPackage};
use crate::dependency_graph::services::{GraphAggregator, PackageDependencies};
use crate::ports::outbound::{PackageRegistry, ProgressReporter};
use crate::shared::error::ScopeGraphError;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

/// BuildDependencyGraphUseCase - the scope's internal dependency graph
///
/// Lists every package of the scope, fetches their manifests with bounded
/// concurrency and aggregates the in-scope relations. A package whose
/// manifest cannot be retrieved is skipped and reported; the rest of the
/// graph is still built.
///
/// # Type Parameters
/// * `REG` - PackageRegistry implementation
/// * `PR` - ProgressReporter implementation
pub struct BuildDependencyGraphUseCase<REG, PR> {
    registry: REG,
    progress_reporter: PR,
}

impl<REG, PR> BuildDependencyGraphUseCase<REG, PR>
where
    REG: PackageRegistry,
    PR: ProgressReporter,
{
    pub fn new(registry: REG, progress_reporter: PR) -> Self {
        Self {
            registry,
            progress_reporter,
        }
    }

    /// Executes the use case
    ///
    /// # Errors
    /// - the scope search fails
    /// - `ScopeGraphError::NoPackagesFound` when the search returns nothing
    pub async fn execute(&self, request: GraphRequest) -> Result<GraphResponse> {
        self.progress_reporter.report(&format!(
            "🔍 Searching packages in scope {}...",
            request.scope
        ));

        let names = self.registry.search_packages(&request.scope).await?;
        if names.is_empty() {
            return Err(ScopeGraphError::NoPackagesFound {
                scope: request.scope.to_string(),
            }
            .into());
        }

        self.progress_reporter
            .report(&format!("✅ Found {} package(s)", names.len()));
        self.progress_reporter
            .report("📦 Fetching package manifests...");

        let (entries, skipped) = self
            .fetch_dependencies(&names, request.max_concurrency)
            .await;

        for package in &skipped {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Skipped {}: {}",
                package.name, package.reason
            ));
        }

        let graph = GraphAggregator::new(request.scope.clone()).aggregate(&entries);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            skipped = skipped.len(),
            "dependency graph built"
        );

        self.progress_reporter.report_completion(&format!(
            "✅ Dependency graph complete: {} package(s), {} dependencies, {} skipped",
            graph.node_count(),
            graph.edge_count(),
            skipped.len()
        ));

        Ok(GraphResponse::new(graph, names.len(), skipped))
    }

    /// Fetches normalized dependencies for every name
    ///
    /// Progress is reported from this task as results arrive, so the
    /// reporter never crosses a task boundary.
    async fn fetch_dependencies(
        &self,
        names: &[String],
        max_concurrency: usize,
    ) -> (Vec<PackageDependencies>, Vec<SkippedPackage>) {
        let total = names.len();
        let mut entries = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        let mut fetches = stream::iter(names.iter())
            .map(|name| async move {
                let result = self.registry.fetch_package_info(name).await;
                (name, result)
            })
            .buffer_unordered(max_concurrency.max(1));

        let mut done = 0;
        while let Some((name, result)) = fetches.next().await {
            done += 1;
            self.progress_reporter
                .report_progress(done, total, Some(name.as_str()));

            match result {
                Ok(info) => entries.push(PackageDependencies::new(name, info)),
                Err(e) => {
                    warn!(package = %name, error = %e, "skipping package");
                    skipped.push(SkippedPackage::new(name, e.to_string()));
                }
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        skipped.sort_by(|a, b| a.name.cmp(&b.name));
        (entries, skipped)
    }
}
