use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};

/// Inclusive range of calendar days a shopping list is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanWindow {
    #[serde(with = "crate::dates")]
    pub start: Date,
    #[serde(with = "crate::dates")]
    pub end: Date,
}

impl PlanWindow {
    /// Today through the next Sunday. A Sunday is its own end.
    pub fn containing(now: OffsetDateTime) -> Self {
        let start = now.date();
        let to_sunday = 6 - now.weekday().number_days_from_monday();
        Self {
            start,
            end: start + Duration::days(i64::from(to_sunday)),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }
}
