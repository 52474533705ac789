use anyhow::Context;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Default feed window length, in days past the start date.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Inclusive date range requested from the NEO feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> anyhow::Result<Self> {
        anyhow::ensure!(
            end >= start,
            "end_date {end} must not precede start_date {start}"
        );
        Ok(Self { start, end })
    }

    pub fn starting_at(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(DEFAULT_WINDOW_DAYS),
        }
    }

    /// Today through today + 7 days, in the given clock's time zone.
    pub fn default_at<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        Self::starting_at(now.date_naive())
    }

    pub fn default_local() -> Self {
        Self::default_at(Local::now())
    }

    /// Builds a window from optional `YYYY-MM-DD` bounds. A missing start
    /// means today (local); a missing end means start + 7 days.
    pub fn resolve(start: Option<&str>, end: Option<&str>) -> anyhow::Result<Self> {
        let start = match start.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => parse_date(s)?,
            None => Local::now().date_naive(),
        };
        match end.map(str::trim).filter(|s| !s.is_empty()) {
            Some(e) => Self::new(start, parse_date(e)?),
            None => Ok(Self::starting_at(start)),
        }
    }

    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start_param(), self.end_param())
    }
}

pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {s}"))
}
