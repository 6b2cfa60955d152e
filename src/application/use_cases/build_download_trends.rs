use crate::application::dto::{SkippedPackage, TrendsRequest, TrendsResponse};
use crate::dependency_graph::domain::{DailyDownloads, DownloadTrends, Scope};
use crate::dependency_graph::services::WeekBucketer;
use crate::ports::outbound::{Clock, PackageRegistry, ProgressReporter};
use crate::shared::error::ScopeGraphError;
use crate::shared::Result;
use chrono::{Duration, NaiveDate};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// BuildDownloadTrendsUseCase - weekly download totals of the scope's packages
///
/// The window ends today (per the injected clock) and starts `days` earlier.
/// Packages without download data are skipped; the remaining daily series
/// are bucketed into Monday-based weeks on a shared axis.
///
/// # Type Parameters
/// * `REG` - PackageRegistry implementation
/// * `PR` - ProgressReporter implementation
/// * `C` - Clock implementation
pub struct BuildDownloadTrendsUseCase<REG, PR, C> {
    registry: REG,
    progress_reporter: PR,
    clock: C,
}

impl<REG, PR, C> BuildDownloadTrendsUseCase<REG, PR, C>
where
    REG: PackageRegistry,
    PR: ProgressReporter,
    C: Clock,
{
    pub fn new(registry: REG, progress_reporter: PR, clock: C) -> Self {
        Self {
            registry,
            progress_reporter,
            clock,
        }
    }

    /// Executes the use case
    ///
    /// # Errors
    /// - the scope search fails
    /// - `ScopeGraphError::InvalidConfig` when `days` reaches past the calendar
    /// - `ScopeGraphError::NoPackagesFound` when the search returns nothing
    pub async fn execute(&self, request: TrendsRequest) -> Result<TrendsResponse> {
        let (start, end) = self.date_range(request.days)?;

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

        self.progress_reporter.report(&format!(
            "📈 Fetching daily downloads of {} package(s) from {} to {}...",
            names.len(),
            start,
            end
        ));

        let (daily, skipped) = self
            .fetch_daily(&names, start, end, request.max_concurrency)
            .await;

        for package in &skipped {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Skipped {}: {}",
                package.name, package.reason
            ));
        }

        let trends = WeekBucketer::bucket(&daily);
        let (trends, unmatched_selection) =
            self.apply_selection(trends, &request.scope, &request.selected_packages);

        info!(
            packages = trends.package_count(),
            weeks = trends.weeks().len(),
            skipped = skipped.len(),
            "download trends built"
        );
        self.progress_reporter.report_completion(&format!(
            "✅ Download trends complete: {} package(s) over {} week(s), {} skipped",
            trends.package_count(),
            trends.weeks().len(),
            skipped.len()
        ));

        Ok(TrendsResponse {
            trends,
            start,
            end,
            skipped,
            unmatched_selection,
        })
    }

    /// `[today - days, today]`
    fn date_range(&self, days: u32) -> Result<(NaiveDate, NaiveDate)> {
        let end = self.clock.today();
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| ScopeGraphError::InvalidConfig {
                message: format!("a window of {} days starts before the earliest date", days),
                hint: "Use a smaller --days value (the default is 60).".to_string(),
            })?;
        Ok((start, end))
    }

    /// Fetches the daily series of every name
    ///
    /// A response without a `downloads` array is a partial-data skip.
    async fn fetch_daily(
        &self,
        names: &[String],
        start: NaiveDate,
        end: NaiveDate,
        max_concurrency: usize,
    ) -> (BTreeMap<String, Vec<DailyDownloads>>, Vec<SkippedPackage>) {
        let total = names.len();
        let mut daily = BTreeMap::new();
        let mut skipped = Vec::new();

        let mut fetches = stream::iter(names.iter())
            .map(|name| async move {
                let result = self.registry.fetch_daily_downloads(name, start, end).await;
                (name, result)
            })
            .buffer_unordered(max_concurrency.max(1));

        let mut done = 0;
        while let Some((name, result)) = fetches.next().await {
            done += 1;
            self.progress_reporter
                .report_progress(done, total, Some(name.as_str()));

            let outcome = result.and_then(|range| {
                range.downloads.ok_or_else(|| {
                    ScopeGraphError::PartialDataError {
                        package: name.clone(),
                        details: "response has no downloads array".to_string(),
                    }
                    .into()
                })
            });

            match outcome {
                Ok(points) => {
                    daily.insert(name.clone(), points);
                }
                Err(e) => {
                    warn!(package = %name, error = %e, "skipping package");
                    skipped.push(SkippedPackage::new(name, e.to_string()));
                }
            }
        }

        skipped.sort_by(|a, b| a.name.cmp(&b.name));
        (daily, skipped)
    }

    /// Restricts the trends to the selected packages, keeping the week axis
    ///
    /// Returns the selection and the names that matched nothing. An empty
    /// selection keeps everything.
    fn apply_selection(
        &self,
        trends: DownloadTrends,
        scope: &Scope,
        selected: &[String],
    ) -> (DownloadTrends, Vec<String>) {
        if selected.is_empty() {
            return (trends, Vec::new());
        }

        // A scoped name from another scope can never match
        let (foreign, local): (Vec<&String>, Vec<&String>) = selected
            .iter()
            .partition(|name| name.starts_with('@') && !scope.contains(name));

        for name in &foreign {
            warn!(package = %name, scope = %scope, "selected package is outside the scope");
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Selected package '{}' is not in scope {} and was ignored.",
                name, scope
            ));
        }

        let qualified: Vec<String> = local.iter().map(|name| scope.qualify(name)).collect();

        let missing: Vec<String> = local
            .iter()
            .zip(&qualified)
            .filter(|(_, full)| !trends.series().contains_key(full.as_str()))
            .map(|(short, _)| short.to_string())
            .collect();

        for name in &missing {
            warn!(package = %name, "selected package has no download data");
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Selected package '{}' did not match any package with download data.",
                name
            ));
        }

        let unmatched = foreign
            .into_iter()
            .cloned()
            .chain(missing)
            .collect();
        (trends.select(&qualified), unmatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_graph::domain::{DownloadRange, PackageManifest};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Mutex;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn clock() -> FixedClock {
        // Wednesday
        FixedClock(Utc.with_ymd_and_hms(2025, 1, 22, 8, 30, 0).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct MockRegistry {
        series: BTreeMap<String, DownloadRange>,
        requested_ranges: Mutex<Vec<(NaiveDate, NaiveDate)>>,
    }

    impl MockRegistry {
        fn new(series: Vec<(&str, DownloadRange)>) -> Self {
            Self {
                series: series
                    .into_iter()
                    .map(|(name, range)| (name.to_string(), range))
                    .collect(),
                requested_ranges: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PackageRegistry for MockRegistry {
        async fn search_packages(&self, _scope: &Scope) -> Result<Vec<String>> {
            Ok(self.series.keys().cloned().collect())
        }

        async fn fetch_manifest(&self, _package_name: &str) -> Result<PackageManifest> {
            Ok(PackageManifest::default())
        }

        async fn fetch_daily_downloads(
            &self,
            package_name: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<DownloadRange> {
            self.requested_ranges.lock().unwrap().push((start, end));
            match self.series.get(package_name) {
                Some(range) => Ok(range.clone()),
                None => anyhow::bail!("unexpected package {}", package_name),
            }
        }
    }

    struct SilentReporter;

    #[derive(Default)]
    struct RecordingReporter {
        errors: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, _message: &str) {}
        fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
        fn report_error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
        fn report_completion(&self, _message: &str) {}
    }

    impl ProgressReporter for SilentReporter {
        fn report(&self, _message: &str) {}
        fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
        fn report_error(&self, _message: &str) {}
        fn report_completion(&self, _message: &str) {}
    }

    fn points(values: &[(NaiveDate, u64)]) -> Vec<DailyDownloads> {
        values
            .iter()
            .map(|(day, n)| DailyDownloads::new(*day, *n))
            .collect()
    }

    fn request(days: u32, selected: &[&str]) -> TrendsRequest {
        TrendsRequest::new(
            Scope::new("@s").unwrap(),
            days,
            3,
            selected.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_range_ends_today() {
        let registry = MockRegistry::new(vec![(
            "@s/a",
            DownloadRange::new("@s/a", points(&[(date(2025, 1, 20), 1)])),
        )]);
        let use_case = BuildDownloadTrendsUseCase::new(registry, SilentReporter, clock());

        let response = use_case.execute(request(60, &[])).await.unwrap();

        assert_eq!(response.end, date(2025, 1, 22));
        assert_eq!(response.start, date(2024, 11, 23));
        assert_eq!(
            use_case.registry.requested_ranges.lock().unwrap()[0],
            (date(2024, 11, 23), date(2025, 1, 22))
        );
    }

    #[tokio::test]
    async fn test_buckets_weekly_on_shared_axis() {
        let registry = MockRegistry::new(vec![
            (
                "@s/a",
                DownloadRange::new(
                    "@s/a",
                    points(&[(date(2025, 1, 7), 10), (date(2025, 1, 8), 5), (date(2025, 1, 21), 30)]),
                ),
            ),
            (
                "@s/b",
                DownloadRange::new("@s/b", points(&[(date(2025, 1, 15), 5)])),
            ),
        ]);
        let use_case = BuildDownloadTrendsUseCase::new(registry, SilentReporter, clock());

        let response = use_case.execute(request(21, &[])).await.unwrap();
        let dense = response.trends.densify();

        assert_eq!(dense.weeks, vec!["2025-01-06", "2025-01-13", "2025-01-20"]);
        assert_eq!(dense.series["@s/a"], vec![15, 0, 30]);
        assert_eq!(dense.series["@s/b"], vec![0, 5, 0]);
    }

    #[tokio::test]
    async fn test_missing_downloads_array_is_skipped() {
        let registry = MockRegistry::new(vec![
            ("@s/gone", DownloadRange::empty()),
            (
                "@s/ok",
                DownloadRange::new("@s/ok", points(&[(date(2025, 1, 20), 2)])),
            ),
        ]);
        let use_case = BuildDownloadTrendsUseCase::new(registry, SilentReporter, clock());

        let response = use_case.execute(request(7, &[])).await.unwrap();

        assert_eq!(response.skipped.len(), 1);
        assert_eq!(response.skipped[0].name, "@s/gone");
        assert!(response.skipped[0].reason.contains("no downloads array"));
        assert_eq!(response.trends.package_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_series_is_excluded_not_skipped() {
        let registry = MockRegistry::new(vec![
            ("@s/new", DownloadRange::new("@s/new", vec![])),
            (
                "@s/old",
                DownloadRange::new("@s/old", points(&[(date(2025, 1, 20), 2)])),
            ),
        ]);
        let use_case = BuildDownloadTrendsUseCase::new(registry, SilentReporter, clock());

        let response = use_case.execute(request(7, &[])).await.unwrap();

        assert!(response.skipped.is_empty());
        assert_eq!(response.trends.package_names().collect::<Vec<_>>(), vec!["@s/old"]);
    }

    #[tokio::test]
    async fn test_selection_keeps_axis_and_reports_unmatched() {
        let registry = MockRegistry::new(vec![
            (
                "@s/a",
                DownloadRange::new("@s/a", points(&[(date(2025, 1, 6), 1)])),
            ),
            (
                "@s/b",
                DownloadRange::new("@s/b", points(&[(date(2025, 1, 20), 2)])),
            ),
        ]);
        let use_case = BuildDownloadTrendsUseCase::new(registry, SilentReporter, clock());

        let response = use_case
            .execute(request(30, &["b", "missing"]))
            .await
            .unwrap();

        assert_eq!(response.trends.package_names().collect::<Vec<_>>(), vec!["@s/b"]);
        assert_eq!(response.trends.weeks().len(), 2);
        assert_eq!(response.unmatched_selection, vec!["missing"]);
    }

    #[tokio::test]
    async fn test_empty_search_is_an_error() {
        let registry = MockRegistry::new(vec![]);
        let use_case = BuildDownloadTrendsUseCase::new(registry, SilentReporter, clock());

        let err = use_case.execute(request(60, &[])).await.unwrap_err();
        assert!(err.to_string().contains("No packages found"));
    }

    #[tokio::test]
    async fn test_window_past_calendar_start_is_an_error() {
        let registry = MockRegistry::new(vec![(
            "@s/a",
            DownloadRange::new("@s/a", points(&[(date(2025, 1, 20), 1)])),
        )]);
        let use_case = BuildDownloadTrendsUseCase::new(registry, SilentReporter, clock());

        let err = use_case.execute(request(u32::MAX, &[])).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScopeGraphError>(),
            Some(ScopeGraphError::InvalidConfig { .. })
        ));
        assert!(use_case.registry.requested_ranges.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_selection_from_other_scope_is_reported() {
        let registry = MockRegistry::new(vec![(
            "@s/a",
            DownloadRange::new("@s/a", points(&[(date(2025, 1, 20), 1)])),
        )]);
        let reporter = RecordingReporter::default();
        let use_case = BuildDownloadTrendsUseCase::new(registry, reporter, clock());

        let response = use_case
            .execute(request(30, &["@other/x", "@s/a"]))
            .await
            .unwrap();

        assert_eq!(response.trends.package_names().collect::<Vec<_>>(), vec!["@s/a"]);
        assert_eq!(response.unmatched_selection, vec!["@other/x"]);
        let errors = use_case.progress_reporter.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'@other/x' is not in scope @s"));
        assert!(!errors[0].contains("@s/@other"));
    }
}
