//! Trend aggregation
//!
//! Groups timestamped records into one bucket per granularity unit of a
//! window. Every unit gets a bucket, including those no record falls into,
//! so downstream regression sees a gap-free series.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::record::EventRecord;
use super::window::{Granularity, TimeWindow};
use crate::error::Result;

/// One time slot of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
}

/// Chronologically ordered buckets covering a whole window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub window: TimeWindow,
    pub buckets: Vec<Bucket>,
}

impl Series {
    /// Bucket counts as a numeric series for forecasting
    pub fn values(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.count as f64).collect()
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Aggregate records into a complete, chronologically ordered series.
///
/// Buckets are half-open `[start, next_start)`, so a record exactly on a
/// boundary lands in the later bucket. Records outside the window are
/// ignored and input order does not matter.
pub fn aggregate<R: EventRecord>(records: &[R], window: &TimeWindow) -> Result<Series> {
    window.validate()?;

    let starts = bucket_starts(window);
    let mut counts = vec![0u64; starts.len()];

    for record in records {
        let at = record.occurred_at();
        if !window.contains(at) {
            continue;
        }
        // `contains` guarantees at least the first start is <= the record date
        let idx = starts.partition_point(|s| *s <= at.date()) - 1;
        counts[idx] += 1;
    }

    let multi_year = window.start.year() != window.end.year();
    let buckets = starts
        .iter()
        .zip(counts)
        .map(|(start, count)| Bucket {
            label: label_for(*start, window.granularity, multi_year),
            count,
        })
        .collect();

    Ok(Series {
        window: *window,
        buckets,
    })
}

/// First day of every bucket in the window, ascending
fn bucket_starts(window: &TimeWindow) -> Vec<NaiveDate> {
    match window.granularity {
        Granularity::DayOfWeek | Granularity::DayOfMonth | Granularity::Day => {
            window.start.iter_days().take(window.days() as usize).collect()
        }
        Granularity::Month => {
            let mut starts = vec![window.start];
            let mut cursor = first_of_next_month(window.start);
            while let Some(month) = cursor.filter(|m| *m <= window.end) {
                starts.push(month);
                cursor = first_of_next_month(month);
            }
            starts
        }
    }
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    // 32 days past the 1st always lands in the following month
    let next = first + Duration::days(32);
    next.with_day(1)
}

fn label_for(start: NaiveDate, granularity: Granularity, multi_year: bool) -> String {
    let fmt = match granularity {
        Granularity::DayOfWeek => "%a",
        Granularity::DayOfMonth => "%-d %b",
        Granularity::Day => "%-d %b %Y",
        Granularity::Month if multi_year => "%b %Y",
        Granularity::Month => "%b",
    };
    start.format(fmt).to_string()
}
