use crate::dependency_graph::domain::{DailyDownloads, DownloadTrends, WeeklySeries};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// WeekBucketer service: daily download series to weekly series on a shared axis
///
/// Weeks start on Monday. A package without any daily point is left out of
/// the result entirely and contributes nothing to the week axis.
pub struct WeekBucketer;

impl WeekBucketer {
    /// Monday of the week containing `day` (a Monday maps to itself)
    pub fn week_start(day: NaiveDate) -> NaiveDate {
        let offset = day.weekday().num_days_from_monday();
        day - Duration::days(i64::from(offset))
    }

    /// Sums one package's daily points into week buckets
    pub fn bucket_package(points: &[DailyDownloads]) -> WeeklySeries {
        let mut weekly = WeeklySeries::new();
        for point in points {
            weekly.add(Self::week_start(point.day), point.downloads);
        }
        weekly
    }

    /// Buckets every package and builds the sorted union of their weeks
    pub fn bucket(per_package_daily: &BTreeMap<String, Vec<DailyDownloads>>) -> DownloadTrends {
        let mut all_weeks = BTreeSet::new();
        let mut series = BTreeMap::new();

        for (package_name, points) in per_package_daily {
            if points.is_empty() {
                continue;
            }
            let weekly = Self::bucket_package(points);
            all_weeks.extend(weekly.weeks());
            series.insert(package_name.clone(), weekly);
        }

        DownloadTrends::new(all_weeks.into_iter().collect(), series)
    }
}
