use crate::dependency_graph::domain::{DownloadRange, PackageManifest, Scope};
use crate::ports::outbound::PackageRegistry;
use crate::shared::error::ScopeGraphError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const DEFAULT_DOWNLOADS_URL: &str = "https://api.npmjs.org";

/// Upper bound of the registry search page
const SEARCH_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    objects: Vec<SearchObject>,
}

#[derive(Debug, Deserialize)]
struct SearchObject {
    package: SearchPackage,
}

#[derive(Debug, Deserialize)]
struct SearchPackage {
    name: String,
}

/// NpmRegistryClient adapter for the npm registry and downloads API
///
/// This adapter implements the PackageRegistry port over HTTP.
///
/// # Async Support
/// Uses the async reqwest client so that the use cases can fan requests out
/// with bounded concurrency.
pub struct NpmRegistryClient {
    client: reqwest::Client,
    registry_url: String,
    downloads_url: String,
    max_retries: u32,
}

impl NpmRegistryClient {
    /// Creates a client against the public npm endpoints
    pub fn new() -> Result<Self> {
        Self::with_urls(DEFAULT_REGISTRY_URL, DEFAULT_DOWNLOADS_URL)
    }

    /// Creates a client against custom registry and downloads base URLs
    pub fn with_urls(registry_url: &str, downloads_url: &str) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("scope-graph/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            registry_url: registry_url.trim_end_matches('/').to_string(),
            downloads_url: downloads_url.trim_end_matches('/').to_string(),
            max_retries: 3,
        })
    }

    /// Validates a package name before it is placed in a URL
    ///
    /// Accepts `name` and `@scope/name`; rejects anything that could escape
    /// the intended path.
    fn validate_package_name(package_name: &str) -> Result<()> {
        if package_name.is_empty() {
            anyhow::bail!("Security: Package name is empty");
        }

        if package_name.contains('\\') || package_name.contains("..") {
            anyhow::bail!(
                "Security: Package name \"{}\" contains path traversal characters",
                package_name
            );
        }

        if package_name.contains('#') || package_name.contains('?') {
            anyhow::bail!(
                "Security: Package name \"{}\" contains URL-unsafe characters",
                package_name
            );
        }

        let slashes = package_name.matches('/').count();
        let scoped = package_name.starts_with('@');
        if (scoped && slashes != 1) || (!scoped && slashes != 0) {
            anyhow::bail!(
                "Security: Package name \"{}\" has an invalid path structure",
                package_name
            );
        }

        Ok(())
    }

    fn search_url(&self, scope: &Scope) -> String {
        format!(
            "{}/-/v1/search?text={}&size={}",
            self.registry_url,
            urlencoding::encode(scope.as_str()),
            SEARCH_PAGE_SIZE
        )
    }

    fn manifest_url(&self, package_name: &str) -> String {
        // The registry expects the scope separator escaped, as the npm CLI sends it
        format!(
            "{}/{}/latest",
            self.registry_url,
            package_name.replacen('/', "%2f", 1)
        )
    }

    fn downloads_url(&self, package_name: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/downloads/range/{}:{}/{}",
            self.downloads_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            urlencoding::encode(package_name)
        )
    }

    /// Keeps the in-scope names of a search body, sorted and de-duplicated
    fn parse_search(scope: &Scope, body: &str) -> Result<Vec<String>> {
        let response: SearchResponse =
            serde_json::from_str(body).map_err(|e| ScopeGraphError::ParseError {
                package: scope.to_string(),
                details: e.to_string(),
            })?;

        let mut names: Vec<String> = response
            .objects
            .into_iter()
            .map(|object| object.package.name)
            .filter(|name| scope.contains(name))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn parse_manifest(package_name: &str, body: &str) -> Result<PackageManifest> {
        serde_json::from_str(body).map_err(|e| {
            ScopeGraphError::ParseError {
                package: package_name.to_string(),
                details: e.to_string(),
            }
            .into()
        })
    }

    fn parse_downloads(package_name: &str, body: &str) -> Result<DownloadRange> {
        serde_json::from_str(body).map_err(|e| {
            ScopeGraphError::ParseError {
                package: package_name.to_string(),
                details: e.to_string(),
            }
            .into()
        })
    }

    /// GETs `url` and returns the status and body
    /// Manifest from a response: non-success is a FetchError, a bad body a ParseError
    fn manifest_from(package_name: &str, status: StatusCode, body: &str) -> Result<PackageManifest> {
        if !status.is_success() {
            return Err(ScopeGraphError::FetchError {
                package: package_name.to_string(),
                what: "package info".to_string(),
                details: format!("HTTP error! status: {}", status),
            }
            .into());
        }
        Self::parse_manifest(package_name, body)
    }

    /// Download range from a response; non-success yields an empty range
    fn downloads_from(package_name: &str, status: StatusCode, body: &str) -> Result<DownloadRange> {
        if !status.is_success() {
            debug!(package = package_name, %status, "no download data");
            return Ok(DownloadRange::empty());
        }
        Self::parse_downloads(package_name, body)
    }

    /// Whether asking again could change the outcome of a failed manifest fetch
    fn is_retryable(error: &anyhow::Error) -> bool {
        !matches!(
            error.downcast_ref::<ScopeGraphError>(),
            Some(ScopeGraphError::ParseError { .. })
        )
    }

    async fn get_text(
        &self,
        url: &str,
        package: &str,
        what: &str,
    ) -> Result<(reqwest::StatusCode, String)> {
        debug!(url, "GET");
        let fetch_error = |details: String| ScopeGraphError::FetchError {
            package: package.to_string(),
            what: what.to_string(),
            details,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        Ok((status, body))
    }

    async fn fetch_manifest_once(&self, package_name: &str) -> Result<PackageManifest> {
        let (status, body) = self
            .get_text(&self.manifest_url(package_name), package_name, "package info")
            .await?;

        Self::manifest_from(package_name, status, &body)
    }

    /// Fetches a manifest, retrying transport and status failures
    ///
    /// A malformed body is returned immediately; asking again would not help.
    async fn fetch_manifest_with_retry(&self, package_name: &str) -> Result<PackageManifest> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.fetch_manifest_once(package_name).await {
                Ok(manifest) => return Ok(manifest),
                Err(e) => {
                    if !Self::is_retryable(&e) {
                        return Err(e);
                    }
                    debug!(package = package_name, attempt, error = %e, "manifest fetch failed");
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * u64::from(attempt))).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            anyhow::anyhow!("No attempt was made to fetch \"{}\"", package_name)
        }))
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistryClient {
    async fn search_packages(&self, scope: &Scope) -> Result<Vec<String>> {
        let (status, body) = self
            .get_text(&self.search_url(scope), scope.as_str(), "package search")
            .await?;

        if !status.is_success() {
            return Err(ScopeGraphError::FetchError {
                package: scope.to_string(),
                what: "package search".to_string(),
                details: format!("HTTP error! status: {}", status),
            }
            .into());
        }

        Self::parse_search(scope, &body)
    }

    async fn fetch_manifest(&self, package_name: &str) -> Result<PackageManifest> {
        Self::validate_package_name(package_name)?;
        self.fetch_manifest_with_retry(package_name).await
    }

    async fn fetch_daily_downloads(
        &self,
        package_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DownloadRange> {
        Self::validate_package_name(package_name)?;

        let (status, body) = self
            .get_text(
                &self.downloads_url(package_name, start, end),
                package_name,
                "downloads",
            )
            .await?;

        Self::downloads_from(package_name, status, &body)
    }
}
