use chrono::{DateTime, TimeZone, Utc};
use scope_graph::prelude::*;

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        Self(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
