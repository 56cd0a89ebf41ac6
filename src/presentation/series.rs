use serde::Serialize;

use crate::{core::aggregation::Aggregate, domain::BucketKey};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    pub key: BucketKey,
    /// Short axis label: day of month for daily keys, month abbreviation otherwise.
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    fn new(key: BucketKey, value: f64) -> Self {
        Self {
            label: axis_label(&key),
            key,
            value,
        }
    }
}

fn axis_label(key: &BucketKey) -> String {
    match key {
        BucketKey::Day(date) => date.format("%-d").to_string(),
        BucketKey::Month(month) => month.first_day().format("%b").to_string(),
    }
}

/// Raw bucket totals, one point per aggregate, in the order given.
pub fn time_series(aggregates: &[Aggregate]) -> Vec<SeriesPoint> {
    aggregates
        .iter()
        .map(|aggregate| SeriesPoint::new(aggregate.key, aggregate.total))
        .collect()
}

/// One source's contribution per bucket; buckets without it read zero.
pub fn source_series(aggregates: &[Aggregate], source_id: &str) -> Vec<SeriesPoint> {
    aggregates
        .iter()
        .map(|aggregate| {
            let value = aggregate.by_source.get(source_id).copied().unwrap_or(0.0);
            SeriesPoint::new(aggregate.key, value)
        })
        .collect()
}

/// Running total across the buckets, for month-to-date style charts.
///
/// Given a report's full bucket list, the last point equals the report's
/// `summary.raw_total`.
pub fn cumulative_series(aggregates: &[Aggregate]) -> Vec<SeriesPoint> {
    let mut running = 0.0;
    aggregates
        .iter()
        .map(|aggregate| {
            running += aggregate.total;
            SeriesPoint::new(aggregate.key, running)
        })
        .collect()
}
