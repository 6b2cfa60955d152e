use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One point of the registry's daily download series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDownloads {
    pub day: NaiveDate,
    pub downloads: u64,
}

impl DailyDownloads {
    pub fn new(day: NaiveDate, downloads: u64) -> Self {
        Self { day, downloads }
    }
}

/// Body of the downloads range endpoint
///
/// The registry answers a failed lookup with an object that has no
/// `downloads` array, which is represented as `downloads: None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<Vec<DailyDownloads>>,
}

impl DownloadRange {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(package: &str, downloads: Vec<DailyDownloads>) -> Self {
        Self {
            package: Some(package.to_string()),
            downloads: Some(downloads),
        }
    }
}

/// Sparse weekly totals for one package, keyed by week start (Monday)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySeries(BTreeMap<NaiveDate, u64>);

impl WeeklySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, week_start: NaiveDate, downloads: u64) {
        *self.0.entry(week_start).or_insert(0) += downloads;
    }

    pub fn get(&self, week_start: NaiveDate) -> Option<u64> {
        self.0.get(&week_start).copied()
    }

    pub fn weeks(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Materializes one value per entry of `weeks`, 0 where no data exists
    pub fn dense(&self, weeks: &[NaiveDate]) -> Vec<u64> {
        weeks
            .iter()
            .map(|week| self.get(*week).unwrap_or(0))
            .collect()
    }
}

/// Weekly download series for a set of packages over a shared week axis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadTrends {
    weeks: Vec<NaiveDate>,
    series: BTreeMap<String, WeeklySeries>,
}

impl DownloadTrends {
    /// `weeks` must be the sorted union of the week keys of `series`
    pub fn new(weeks: Vec<NaiveDate>, series: BTreeMap<String, WeeklySeries>) -> Self {
        Self { weeks, series }
    }

    pub fn weeks(&self) -> &[NaiveDate] {
        &self.weeks
    }

    pub fn series(&self) -> &BTreeMap<String, WeeklySeries> {
        &self.series
    }

    pub fn package_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    pub fn package_count(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn dense_series(&self, package_name: &str) -> Option<Vec<u64>> {
        self.series
            .get(package_name)
            .map(|weekly| weekly.dense(&self.weeks))
    }

    /// Keeps only the listed packages; the week axis is left untouched so the
    /// selection stays comparable with the full chart
    pub fn select(&self, package_names: &[String]) -> DownloadTrends {
        let series = self
            .series
            .iter()
            .filter(|(name, _)| package_names.iter().any(|wanted| wanted == *name))
            .map(|(name, weekly)| (name.clone(), weekly.clone()))
            .collect();
        DownloadTrends::new(self.weeks.clone(), series)
    }

    /// Dense view handed to renderers: every series has `weeks.len()` values
    pub fn densify(&self) -> DenseTrends {
        DenseTrends {
            weeks: self
                .weeks
                .iter()
                .map(|week| week.format("%Y-%m-%d").to_string())
                .collect(),
            series: self
                .series
                .iter()
                .map(|(name, weekly)| (name.clone(), weekly.dense(&self.weeks)))
                .collect(),
        }
    }
}

/// Output contract of the bucketer: `{weeks: [...], series: {name: [...]}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DenseTrends {
    pub weeks: Vec<String>,
    pub series: BTreeMap<String, Vec<u64>>,
}
