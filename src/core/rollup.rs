//! Yearly rollups that accept either raw records or store-side monthly sums.

use crate::{
    calendar::CalendarConfig,
    domain::{
        BucketKey, MonthPeriod, MonthlySourceTotal, Period, SourceCatalog, YearPeriod,
        YearlyRecords,
    },
};

use super::{
    aggregation::{aggregate_period, Aggregate},
    anomaly::{Anomaly, MalformedReason, Outcome},
    bucketing::bucket_period,
};

/// Twelve monthly aggregates for `year`, whichever shape the store returned.
pub fn monthly_aggregates(
    year: YearPeriod,
    input: &YearlyRecords,
    catalog: &SourceCatalog,
    calendar: &CalendarConfig,
) -> Outcome<Vec<Aggregate>> {
    let period = Period::Year(year);
    match input {
        YearlyRecords::Raw(records) => bucket_period(records, &period, calendar)
            .and_then(|buckets| aggregate_period(&buckets, &period, catalog)),
        YearlyRecords::PreAggregated(rows) => fold_monthly_rows(year, rows, catalog),
    }
}

fn fold_monthly_rows(
    year: YearPeriod,
    rows: &[MonthlySourceTotal],
    catalog: &SourceCatalog,
) -> Outcome<Vec<Aggregate>> {
    let mut aggregates: Vec<Aggregate> = year
        .months()
        .into_iter()
        .map(|month| Aggregate::empty(BucketKey::Month(month)))
        .collect();
    let mut anomalies = Vec::new();

    let mut ordered: Vec<&MonthlySourceTotal> = rows.iter().collect();
    ordered.sort_by(|a, b| {
        a.month
            .cmp(&b.month)
            .then_with(|| a.source_id.cmp(&b.source_id))
    });

    for row in ordered {
        let entry_id = format!("{}-{:02}/{}", year, row.month, row.source_id);
        if MonthPeriod::new(year.year(), row.month).is_err() {
            anomalies.push(Anomaly::MalformedRecord {
                record_id: entry_id,
                reason: MalformedReason::InvalidMonth { month: row.month },
            });
            continue;
        }
        if !row.total.is_finite() || row.total < 0.0 {
            anomalies.push(Anomaly::MalformedRecord {
                record_id: entry_id,
                reason: MalformedReason::InvalidAmount { amount: row.total },
            });
            continue;
        }
        let slot = (row.month - 1) as usize;
        let unresolved = aggregates[slot].absorb(&entry_id, &row.source_id, row.total, catalog);
        anomalies.extend(unresolved);
    }

    if !anomalies.is_empty() {
        tracing::warn!(
            year = year.year(),
            anomalies = anomalies.len(),
            "pre-aggregated rows needed attention"
        );
    }
    Outcome::from_parts(aggregates, anomalies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IncomeRecord, Source};

    fn catalog() -> SourceCatalog {
        SourceCatalog::new(vec![
            Source::new("salary", "Salary"),
            Source::new("rent", "Rental income"),
        ])
    }

    fn year() -> YearPeriod {
        YearPeriod::new(2024).unwrap()
    }

    #[test]
    fn raw_and_pre_aggregated_inputs_agree() {
        let raw = YearlyRecords::Raw(vec![
            IncomeRecord::new("a", 1000.0, "2024-01-15", "salary"),
            IncomeRecord::new("b", 500.0, "2024-01-20", "salary"),
            IncomeRecord::new("c", 750.0, "2024-03-01", "rent"),
        ]);
        let summed = YearlyRecords::PreAggregated(vec![
            MonthlySourceTotal {
                month: 3,
                source_id: "rent".into(),
                total: 750.0,
            },
            MonthlySourceTotal {
                month: 1,
                source_id: "salary".into(),
                total: 1500.0,
            },
        ]);
        let calendar = CalendarConfig::utc();
        let from_raw = monthly_aggregates(year(), &raw, &catalog(), &calendar).into_value();
        let from_rows = monthly_aggregates(year(), &summed, &catalog(), &calendar).into_value();
        assert_eq!(from_raw.len(), 12);
        let totals = |aggregates: &[Aggregate]| -> Vec<(String, f64)> {
            aggregates
                .iter()
                .map(|a| (a.key.to_string(), a.total))
                .collect()
        };
        assert_eq!(totals(&from_raw), totals(&from_rows));
        assert_eq!(from_raw[0].by_source, from_rows[0].by_source);
    }

    #[test]
    fn invalid_rows_are_reported() {
        let rows = YearlyRecords::PreAggregated(vec![
            MonthlySourceTotal {
                month: 13,
                source_id: "salary".into(),
                total: 10.0,
            },
            MonthlySourceTotal {
                month: 2,
                source_id: "unknown".into(),
                total: 10.0,
            },
        ]);
        let outcome = monthly_aggregates(year(), &rows, &catalog(), &CalendarConfig::utc());
        assert_eq!(outcome.anomalies().len(), 2);
        assert_eq!(outcome.value()[1].total, 10.0);
        assert_eq!(outcome.value()[1].display_total, 0.0);
    }
}
