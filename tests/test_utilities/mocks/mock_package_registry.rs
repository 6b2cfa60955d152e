use async_trait::async_trait;
use chrono::NaiveDate;
use scope_graph::dependency_graph::domain::{DailyDownloads, DownloadRange, PackageManifest};
use scope_graph::prelude::*;
use scope_graph::shared::error::ScopeGraphError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory PackageRegistry with canned manifests and download series
///
/// Unknown manifests fail with a 404 `FetchError`; unknown download series
/// yield an empty range, as the downloads API does.
#[derive(Default, Clone)]
pub struct MockPackageRegistry {
    names: Vec<String>,
    manifests: BTreeMap<String, PackageManifest>,
    downloads: BTreeMap<String, Vec<DailyDownloads>>,
    manifest_calls: Arc<AtomicUsize>,
}

impl MockPackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package to the search result without a manifest
    pub fn with_listed(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub fn with_manifest(mut self, manifest: PackageManifest) -> Self {
        let name = manifest.name.clone().unwrap_or_default();
        self.names.push(name.clone());
        self.manifests.insert(name, manifest);
        self
    }

    pub fn with_downloads(mut self, name: &str, points: Vec<(NaiveDate, u64)>) -> Self {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
        self.downloads.insert(
            name.to_string(),
            points
                .into_iter()
                .map(|(day, downloads)| DailyDownloads::new(day, downloads))
                .collect(),
        );
        self
    }

    pub fn manifest_calls(&self) -> usize {
        self.manifest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageRegistry for MockPackageRegistry {
    async fn search_packages(&self, scope: &Scope) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .names
            .iter()
            .filter(|n| scope.contains(n))
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn fetch_manifest(&self, package_name: &str) -> Result<PackageManifest> {
        self.manifest_calls.fetch_add(1, Ordering::SeqCst);
        self.manifests.get(package_name).cloned().ok_or_else(|| {
            ScopeGraphError::FetchError {
                package: package_name.to_string(),
                what: "package info".to_string(),
                details: "HTTP error! status: 404".to_string(),
            }
            .into()
        })
    }

    async fn fetch_daily_downloads(
        &self,
        package_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DownloadRange> {
        Ok(match self.downloads.get(package_name) {
            Some(points) => DownloadRange::new(
                package_name,
                points
                    .iter()
                    .filter(|p| p.day >= start && p.day <= end)
                    .copied()
                    .collect(),
            ),
            None => DownloadRange::empty(),
        })
    }
}
