use chrono::{DateTime, NaiveDate, Utc};

/// Clock port: the single source of "now" for cache expiry and date ranges
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC calendar day
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
