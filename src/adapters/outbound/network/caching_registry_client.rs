use crate::adapters::outbound::cache::TtlCache;
use crate::dependency_graph::domain::{DownloadRange, PackageManifest, Scope};
use crate::ports::outbound::PackageRegistry;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// CachingPackageRegistry wraps a PackageRegistry and memoizes its answers
///
/// This adapter implements the decorator pattern over any PackageRegistry.
/// Results are kept in a [`TtlCache`], so they outlive the process when the
/// cache is backed by a file store.
///
/// Cache keys (below the cache prefix):
/// - `search/{scope}`
/// - `manifest/{package}`
/// - `downloads/{package}/{start}:{end}`
///
/// Failed fetches are never cached.
pub struct CachingPackageRegistry<R: PackageRegistry> {
    inner: R,
    cache: TtlCache,
}

impl<R: PackageRegistry> CachingPackageRegistry<R> {
    pub fn new(inner: R, cache: TtlCache) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn search_key(scope: &Scope) -> String {
        format!("search/{}", scope)
    }

    fn manifest_key(package_name: &str) -> String {
        format!("manifest/{}", package_name)
    }

    fn downloads_key(package_name: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!("downloads/{}/{}:{}", package_name, start, end)
    }
}

#[async_trait]
impl<R: PackageRegistry> PackageRegistry for CachingPackageRegistry<R> {
    async fn search_packages(&self, scope: &Scope) -> Result<Vec<String>> {
        self.cache
            .get_or_compute(&Self::search_key(scope), || self.inner.search_packages(scope))
            .await
    }

    async fn fetch_manifest(&self, package_name: &str) -> Result<PackageManifest> {
        self.cache
            .get_or_compute(&Self::manifest_key(package_name), || {
                self.inner.fetch_manifest(package_name)
            })
            .await
    }

    async fn fetch_daily_downloads(
        &self,
        package_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DownloadRange> {
        self.cache
            .get_or_compute(&Self::downloads_key(package_name, start, end), || {
                self.inner.fetch_daily_downloads(package_name, start, end)
            })
            .await
    }
}
