//! Reduces bucketed records into totals, per-source totals and period figures.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::Serialize;

use crate::domain::{BucketKey, IncomeRecord, Period, SourceCatalog};

use super::{
    anomaly::{Anomaly, Outcome},
    bucketing::Buckets,
};

/// Number of sources shown by summary views.
pub const DEFAULT_TOP_SOURCES: usize = 5;

/// Totals for one bucket.
///
/// `total` is the raw total and always includes every admitted record.
/// `display_total` only covers sources the catalog resolves, and
/// `total == display_total + unresolved_total`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Aggregate {
    pub key: BucketKey,
    pub total: f64,
    pub display_total: f64,
    pub unresolved_total: f64,
    pub by_source: BTreeMap<String, f64>,
    /// Input entries folded into the bucket (records, or pre-aggregated rows).
    pub entry_count: usize,
}

impl Aggregate {
    pub fn empty(key: BucketKey) -> Self {
        Self {
            key,
            total: 0.0,
            display_total: 0.0,
            unresolved_total: 0.0,
            by_source: BTreeMap::new(),
            entry_count: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.total > 0.0
    }

    /// Folds one amount into the bucket, reporting it when its source is unknown.
    pub fn absorb(
        &mut self,
        entry_id: &str,
        source_id: &str,
        amount: f64,
        catalog: &SourceCatalog,
    ) -> Option<Anomaly> {
        self.entry_count += 1;
        let anomaly = if catalog.contains(source_id) {
            *self.by_source.entry(source_id.to_string()).or_insert(0.0) += amount;
            None
        } else {
            self.unresolved_total += amount;
            Some(Anomaly::UnresolvedSource {
                record_id: entry_id.to_string(),
                source_id: source_id.to_string(),
                amount,
            })
        };
        self.refresh_totals();
        anomaly
    }

    fn refresh_totals(&mut self) {
        self.display_total = self.by_source.values().sum();
        self.total = self.display_total + self.unresolved_total;
    }
}

/// Aggregates the records of a single bucket.
pub fn aggregate_bucket(
    key: BucketKey,
    records: &[IncomeRecord],
    catalog: &SourceCatalog,
) -> (Aggregate, Vec<Anomaly>) {
    let mut aggregate = Aggregate::empty(key);
    let anomalies = records
        .iter()
        .filter_map(|record| {
            aggregate.absorb(&record.id, &record.source_id, record.amount, catalog)
        })
        .collect();
    (aggregate, anomalies)
}

/// Aggregates every non-empty bucket, in key order.
pub fn aggregate_buckets(buckets: &Buckets, catalog: &SourceCatalog) -> Outcome<Vec<Aggregate>> {
    let mut anomalies = Vec::new();
    let aggregates = buckets
        .iter()
        .map(|(key, records)| {
            let (aggregate, found) = aggregate_bucket(*key, records, catalog);
            anomalies.extend(found);
            aggregate
        })
        .collect();
    Outcome::from_parts(aggregates, anomalies)
}

/// Aggregates a period densely: one aggregate per bucket of the period, empty ones included.
pub fn aggregate_period(
    buckets: &Buckets,
    period: &Period,
    catalog: &SourceCatalog,
) -> Outcome<Vec<Aggregate>> {
    let mut anomalies = Vec::new();
    let aggregates = period
        .bucket_keys()
        .into_iter()
        .map(|key| match buckets.get(&key) {
            Some(records) => {
                let (aggregate, found) = aggregate_bucket(key, records, catalog);
                anomalies.extend(found);
                aggregate
            }
            None => Aggregate::empty(key),
        })
        .collect();
    Outcome::from_parts(aggregates, anomalies)
}

/// How many ranked sources a view wants.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TopN {
    Limit(usize),
    All,
}

impl TopN {
    pub fn summary() -> Self {
        TopN::Limit(DEFAULT_TOP_SOURCES)
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self::summary()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceTotal {
    pub source_id: String,
    pub total: f64,
}

/// Ranks sources by total descending, ties broken by ascending source id.
pub fn rank_sources(totals: &BTreeMap<String, f64>, limit: TopN) -> Vec<SourceTotal> {
    let mut ranked: Vec<SourceTotal> = totals
        .iter()
        .map(|(source_id, total)| SourceTotal {
            source_id: source_id.clone(),
            total: *total,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.source_id.cmp(&b.source_id))
    });
    if let TopN::Limit(count) = limit {
        ranked.truncate(count);
    }
    ranked
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BestBucket {
    pub key: BucketKey,
    pub total: f64,
}

/// The bucket with the highest total; the earliest key wins ties.
///
/// Returns `None` when no bucket has a positive total.
pub fn best_bucket(aggregates: &[Aggregate]) -> Option<BestBucket> {
    let mut ordered: Vec<&Aggregate> = aggregates.iter().filter(|a| a.is_active()).collect();
    ordered.sort_by_key(|aggregate| aggregate.key);
    ordered.into_iter().fold(None, |best, aggregate| match best {
        Some(current) if current.total >= aggregate.total => Some(current),
        _ => Some(BestBucket {
            key: aggregate.key,
            total: aggregate.total,
        }),
    })
}

/// Whole-period figures derived from a set of bucket aggregates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodSummary {
    pub raw_total: f64,
    pub display_total: f64,
    pub unresolved_total: f64,
    pub by_source: BTreeMap<String, f64>,
    pub entry_count: usize,
    pub bucket_count: usize,
    pub active_buckets: usize,
    /// Sum of totals divided by the number of buckets with income.
    pub average_per_active_bucket: Option<f64>,
    pub best_bucket: Option<BestBucket>,
}

impl PeriodSummary {
    pub fn from_aggregates(aggregates: &[Aggregate]) -> Self {
        let mut ordered: Vec<&Aggregate> = aggregates.iter().collect();
        ordered.sort_by_key(|aggregate| aggregate.key);

        let mut by_source: BTreeMap<String, f64> = BTreeMap::new();
        let mut raw_total = 0.0;
        let mut unresolved_total = 0.0;
        let mut entry_count = 0;
        let mut active_buckets = 0;
        for aggregate in &ordered {
            raw_total += aggregate.total;
            unresolved_total += aggregate.unresolved_total;
            entry_count += aggregate.entry_count;
            if aggregate.is_active() {
                active_buckets += 1;
            }
            for (source_id, amount) in &aggregate.by_source {
                *by_source.entry(source_id.clone()).or_insert(0.0) += amount;
            }
        }
        let display_total = by_source.values().sum();
        let average_per_active_bucket = if active_buckets > 0 {
            Some(raw_total / active_buckets as f64)
        } else {
            None
        };

        Self {
            raw_total,
            display_total,
            unresolved_total,
            by_source,
            entry_count,
            bucket_count: aggregates.len(),
            active_buckets,
            average_per_active_bucket,
            best_bucket: best_bucket(aggregates),
        }
    }

    pub fn top_sources(&self, limit: TopN) -> Vec<SourceTotal> {
        rank_sources(&self.by_source, limit)
    }

    pub fn source_total(&self, source_id: &str) -> Option<f64> {
        self.by_source.get(source_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthPeriod, Source};
    use chrono::NaiveDate;

    fn catalog() -> SourceCatalog {
        SourceCatalog::new(vec![
            Source::new("salary", "Salary"),
            Source::new("freelance", "Freelance"),
            Source::new("dividends", "Dividends"),
        ])
    }

    fn day(d: u32) -> BucketKey {
        BucketKey::Day(NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
    }

    fn aggregate_with(key: BucketKey, entries: &[(&str, f64)]) -> Aggregate {
        let catalog = catalog();
        let mut aggregate = Aggregate::empty(key);
        for (idx, (source, amount)) in entries.iter().enumerate() {
            aggregate.absorb(&format!("r{idx}"), source, *amount, &catalog);
        }
        aggregate
    }

    #[test]
    fn raw_total_includes_unresolved_sources() {
        let records = vec![
            IncomeRecord::new("a", 100.0, "2024-03-01", "salary"),
            IncomeRecord::new("b", 25.0, "2024-03-01", "mystery"),
        ];
        let (aggregate, anomalies) = aggregate_bucket(day(1), &records, &catalog());
        assert_eq!(aggregate.total, 125.0);
        assert_eq!(aggregate.display_total, 100.0);
        assert_eq!(aggregate.unresolved_total, 25.0);
        assert!(!aggregate.by_source.contains_key("mystery"));
        assert_eq!(anomalies.len(), 1);
    }

    #[test]
    fn ranking_breaks_ties_by_source_id() {
        let mut totals = BTreeMap::new();
        totals.insert("salary".to_string(), 50.0);
        totals.insert("dividends".to_string(), 50.0);
        totals.insert("freelance".to_string(), 80.0);
        let ranked = rank_sources(&totals, TopN::All);
        let ids: Vec<_> = ranked.iter().map(|s| s.source_id.as_str()).collect();
        assert_eq!(ids, vec!["freelance", "dividends", "salary"]);
        assert_eq!(rank_sources(&totals, TopN::Limit(1)).len(), 1);
    }

    #[test]
    fn best_bucket_prefers_earliest_on_tie() {
        let aggregates = vec![
            aggregate_with(day(9), &[("salary", 300.0)]),
            aggregate_with(day(4), &[("salary", 300.0)]),
            aggregate_with(day(2), &[("salary", 100.0)]),
        ];
        let best = best_bucket(&aggregates).unwrap();
        assert_eq!(best.key, day(4));
        assert_eq!(best.total, 300.0);
    }

    #[test]
    fn best_bucket_is_none_without_income() {
        assert_eq!(best_bucket(&[Aggregate::empty(day(1))]), None);
    }

    #[test]
    fn average_divides_by_active_buckets_only() {
        let aggregates = vec![
            aggregate_with(day(1), &[("salary", 90.0)]),
            Aggregate::empty(day(2)),
            aggregate_with(day(3), &[("freelance", 30.0)]),
        ];
        let summary = PeriodSummary::from_aggregates(&aggregates);
        assert_eq!(summary.active_buckets, 2);
        assert_eq!(summary.bucket_count, 3);
        assert_eq!(summary.average_per_active_bucket, Some(60.0));
    }

    #[test]
    fn dense_period_aggregation_covers_every_day() {
        let month = Period::Month(MonthPeriod::new(2023, 2).unwrap());
        let empty = Buckets::new(month.bucket_granularity());
        let aggregates = aggregate_period(&empty, &month, &catalog());
        assert_eq!(aggregates.value().len(), 28);
        assert!(aggregates.value().iter().all(|a| a.total == 0.0));
    }
}
