use crate::dependency_graph::domain::{
    AggregatedDependencies, DownloadRange, PackageManifest, Scope,
};
use crate::dependency_graph::services::ManifestNormalizer;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// PackageRegistry port for reading package data of the tracked scope
///
/// This port abstracts the npm registry and its downloads API.
///
/// # Async Support
/// All methods are async so that per-package requests can be fanned out.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Lists the names of all packages published under `scope`
    ///
    /// # Errors
    /// Returns an error if the search request fails or cannot be parsed
    async fn search_packages(&self, scope: &Scope) -> Result<Vec<String>>;

    /// Fetches the latest published manifest of a package
    ///
    /// # Errors
    /// - `ScopeGraphError::FetchError` on a non-success status or network failure
    /// - `ScopeGraphError::ParseError` when the body is not a valid manifest
    async fn fetch_manifest(&self, package_name: &str) -> Result<PackageManifest>;

    /// Fetches the daily download counts of a package for `start..=end`
    ///
    /// A non-success status is not an error: it yields an empty range
    /// (`downloads: None`).
    ///
    /// # Errors
    /// Returns an error on network failure or a malformed body
    async fn fetch_daily_downloads(
        &self,
        package_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DownloadRange>;

    /// Fetches the manifest and normalizes it into dependency buckets
    async fn fetch_package_info(&self, package_name: &str) -> Result<AggregatedDependencies> {
        let manifest = self.fetch_manifest(package_name).await?;
        Ok(ManifestNormalizer::normalize(manifest))
    }
}
