use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::MatchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    Month,
    LastMonth,
    AllTime,
}

pub const ALL_PERIODS: [Period; 4] = [
    Period::Week,
    Period::Month,
    Period::LastMonth,
    Period::AllTime,
];

/// Half-open `[start, end)` time range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

impl Period {
    pub fn key(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::LastMonth => "last_month",
            Period::AllTime => "all_time",
        }
    }

    /// Window relative to `now`; `None` means unbounded
    pub fn window(&self, now: NaiveDateTime) -> Option<Window> {
        let today = now.date();
        let (start, end) = match self {
            Period::Week => {
                let start = week_start(today);
                (start, start + Days::new(7))
            }
            Period::Month => {
                let start = month_start(today);
                (start, start + Months::new(1))
            }
            Period::LastMonth => {
                let end = month_start(today);
                (end - Months::new(1), end)
            }
            Period::AllTime => return None,
        };

        Some(Window {
            start: start.and_time(chrono::NaiveTime::MIN),
            end: end.and_time(chrono::NaiveTime::MIN),
        })
    }

    /// Records of `records` that fall into this period, order preserved
    pub fn filter<'r>(
        &self,
        records: &'r [MatchRecord],
        now: NaiveDateTime,
    ) -> Vec<&'r MatchRecord> {
        let window = self.window(now);
        records
            .iter()
            .filter(|r| window.is_none_or(|w| w.contains(r.timestamp)))
            .collect()
    }

    /// Human title used in report headings
    pub fn title(&self, now: NaiveDateTime) -> String {
        match self {
            Period::Week => "This Week's".to_string(),
            Period::Month => "This Month's".to_string(),
            Period::LastMonth => {
                let start = month_start(now.date()) - Months::new(1);
                start.format("%B %Y").to_string()
            }
            Period::AllTime => "All-Time".to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.weekday().num_days_from_monday() as u64)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
