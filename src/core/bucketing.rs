//! Groups raw records into calendar buckets.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    calendar::CalendarConfig,
    domain::{BucketKey, Granularity, IncomeRecord, Period},
};

use super::anomaly::{Anomaly, MalformedReason, Outcome};

/// Records grouped by bucket key, in chronological key order.
///
/// Records inside a bucket are ordered by `(created_at, id)` so that sums
/// over a bucket do not depend on the order the store returned them in.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets {
    granularity: Granularity,
    buckets: BTreeMap<BucketKey, Vec<IncomeRecord>>,
}

impl Buckets {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            buckets: BTreeMap::new(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn get(&self, key: &BucketKey) -> Option<&[IncomeRecord]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, &[IncomeRecord])> {
        self.buckets
            .iter()
            .map(|(key, records)| (key, records.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &BucketKey> {
        self.buckets.keys()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    fn insert(&mut self, key: BucketKey, record: IncomeRecord) {
        self.buckets.entry(key).or_default().push(record);
    }

    fn sort_members(&mut self) {
        for records in self.buckets.values_mut() {
            records.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
    }
}

/// Checks a record's amount and date, returning its calendar date.
pub fn admit(record: &IncomeRecord, calendar: &CalendarConfig) -> Result<NaiveDate, Anomaly> {
    if !record.amount.is_finite() || record.amount < 0.0 {
        return Err(Anomaly::MalformedRecord {
            record_id: record.id.clone(),
            reason: MalformedReason::InvalidAmount {
                amount: record.amount,
            },
        });
    }
    calendar
        .local_date(&record.created_at)
        .map_err(|err| Anomaly::MalformedRecord {
            record_id: record.id.clone(),
            reason: MalformedReason::UnreadableDate { raw: err.raw },
        })
}

/// Buckets every admissible record by `granularity`.
pub fn bucket_records(
    records: &[IncomeRecord],
    granularity: Granularity,
    calendar: &CalendarConfig,
) -> Outcome<Buckets> {
    bucket_filtered(records, granularity, calendar, |_| true)
}

/// Buckets records into the buckets of `period` (days of a month, months of a year).
///
/// A record whose calendar date lands outside the period is reported as
/// [`Anomaly::OutsidePeriod`] instead of being added to a foreign bucket.
pub fn bucket_period(
    records: &[IncomeRecord],
    period: &Period,
    calendar: &CalendarConfig,
) -> Outcome<Buckets> {
    bucket_filtered(records, period.bucket_granularity(), calendar, |date| {
        period.contains(date)
    })
}

fn bucket_filtered(
    records: &[IncomeRecord],
    granularity: Granularity,
    calendar: &CalendarConfig,
    in_scope: impl Fn(NaiveDate) -> bool,
) -> Outcome<Buckets> {
    let mut buckets = Buckets::new(granularity);
    let mut anomalies = Vec::new();
    for record in records {
        match admit(record, calendar) {
            Ok(date) if in_scope(date) => {
                buckets.insert(BucketKey::for_date(date, granularity), record.clone());
            }
            Ok(date) => anomalies.push(Anomaly::OutsidePeriod {
                record_id: record.id.clone(),
                date,
            }),
            Err(anomaly) => anomalies.push(anomaly),
        }
    }
    buckets.sort_members();
    if !anomalies.is_empty() {
        tracing::warn!(
            skipped = anomalies.len(),
            bucketed = buckets.record_count(),
            "records excluded while bucketing"
        );
    }
    Outcome::from_parts(buckets, anomalies)
}
