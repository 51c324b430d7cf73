//! KPI summaries over record collections

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::record::EventRecord;

/// What to compute over a record collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiSpec {
    /// Number of records
    Count,
    /// Mean of each listed numeric field
    Average(Vec<String>),
    /// The `n` most frequent values of a categorical field
    TopN { field: String, n: usize },
}

/// Mean of one numeric field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAverage {
    pub field: String,
    pub average: f64,
    /// How many records carried the field
    pub samples: usize,
}

/// Occurrence count of one category value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub name: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiResult {
    Count(u64),
    Averages(Vec<FieldAverage>),
    TopN(Vec<GroupCount>),
}

/// Compute a KPI.
///
/// Fields missing from every record are not an error: averages come back as
/// `0` and top-N as an empty list.
pub fn summarize<R: EventRecord>(records: &[R], spec: &KpiSpec) -> KpiResult {
    match spec {
        KpiSpec::Count => KpiResult::Count(records.len() as u64),
        KpiSpec::Average(fields) => KpiResult::Averages(
            fields
                .iter()
                .map(|field| average_field(records, field))
                .collect(),
        ),
        KpiSpec::TopN { field, n } => KpiResult::TopN(top_n(records, field, *n)),
    }
}

/// Mean of `field` over the records that have it; `0` when none do
pub fn average_field<R: EventRecord>(records: &[R], field: &str) -> FieldAverage {
    let (sum, samples) = records
        .iter()
        .filter_map(|r| r.numeric(field))
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    FieldAverage {
        field: field.to_string(),
        average: if samples > 0 { sum / samples as f64 } else { 0.0 },
        samples,
    }
}

/// Every category of `field` with its count, highest first.
///
/// Ties keep the order in which groups were first seen.
pub fn group_counts<R: EventRecord>(records: &[R], field: &str) -> Vec<GroupCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupCount> = Vec::new();

    for record in records {
        let Some(value) = record.category(field) else {
            continue;
        };
        match index.get(value.as_ref()) {
            Some(&i) => groups[i].total += 1,
            None => {
                index.insert(value.to_string(), groups.len());
                groups.push(GroupCount {
                    name: value.into_owned(),
                    total: 1,
                });
            }
        }
    }

    // sort_by is stable, so first-seen order survives among equal counts
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

/// The `n` largest groups of `field`
pub fn top_n<R: EventRecord>(records: &[R], field: &str, n: usize) -> Vec<GroupCount> {
    let mut groups = group_counts(records, field);
    groups.truncate(n);
    groups
}
