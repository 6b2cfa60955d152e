use super::SkippedPackage;
use crate::dependency_graph::domain::DownloadTrends;
use chrono::NaiveDate;

/// TrendsResponse - result of the download trends use case
#[derive(Debug, Clone)]
pub struct TrendsResponse {
    pub trends: DownloadTrends,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Packages without usable download data, sorted by name
    pub skipped: Vec<SkippedPackage>,
    /// Selected names that matched no package
    pub unmatched_selection: Vec<String>,
}
