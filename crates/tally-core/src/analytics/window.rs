//! Time-window resolution
//!
//! Turns a period token (`week`, `month`, `year`, `custom`) into a concrete
//! inclusive date range plus the granularity used to bucket it. Named periods
//! are anchored to the `now` passed in, so windows are recomputed per request.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format accepted for explicit range bounds
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Requested analytics period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The 7 most recent days, today included
    Week,
    /// Month to date
    #[default]
    Month,
    /// Year to date
    Year,
    /// Explicit inclusive start/end dates
    Custom,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::Custom => "custom",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "custom" => Ok(Self::Custom),
            _ => Err(Error::InvalidRange(format!(
                "Unknown period: {}. Available: week, month, year, custom",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit a window is partitioned into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// One bucket per day, labelled by weekday
    DayOfWeek,
    /// One bucket per day, labelled by day of month
    DayOfMonth,
    /// One bucket per calendar month
    Month,
    /// One bucket per day, labelled with the full date
    Day,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayOfWeek => "day-of-week",
            Self::DayOfMonth => "day-of-month",
            Self::Month => "month",
            Self::Day => "day",
        }
    }
}

/// A resolved, inclusive date range with its bucketing granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

impl TimeWindow {
    /// Build a window, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Result<Self> {
        let window = Self {
            start,
            end,
            granularity,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(Error::InvalidRange(format!(
                "start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Whether a timestamp falls inside `[start 00:00, end + 1 day 00:00)`
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let date = at.date();
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Resolve a period into a concrete window.
///
/// `explicit_start`/`explicit_end` are only read for [`Period::Custom`], where
/// both are required and must parse as `YYYY-MM-DD` with `start <= end`.
pub fn resolve(
    period: Period,
    now: NaiveDateTime,
    explicit_start: Option<&str>,
    explicit_end: Option<&str>,
) -> Result<TimeWindow> {
    let today = now.date();

    match period {
        // Clamped at the earliest representable date
        Period::Week => Ok(TimeWindow {
            start: today
                .checked_sub_days(Days::new(6))
                .unwrap_or(NaiveDate::MIN),
            end: today,
            granularity: Granularity::DayOfWeek,
        }),
        Period::Month => Ok(TimeWindow {
            start: today.with_day(1).unwrap_or(today),
            end: today,
            granularity: Granularity::DayOfMonth,
        }),
        Period::Year => Ok(TimeWindow {
            start: today.with_ordinal(1).unwrap_or(today),
            end: today,
            granularity: Granularity::Month,
        }),
        Period::Custom => {
            let start = parse_bound("start", explicit_start)?;
            let end = parse_bound("end", explicit_end)?;
            TimeWindow::new(start, end, Granularity::Day)
        }
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<NaiveDate> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::InvalidRange(format!("custom period requires a {} date", name)))?;

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::InvalidRange(format!(
            "Invalid {} date '{}' (use YYYY-MM-DD)",
            name, value
        ))
    })
}
