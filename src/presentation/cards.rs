use serde::Serialize;

use crate::{
    core::{
        aggregation::BestBucket,
        services::PeriodReport,
        trend::{PeriodComparison, Projection},
    },
    domain::Period,
};

/// Headline figures for a period, read from a single report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsCard {
    pub period: Period,
    pub total: f64,
    pub best: Option<BestBucket>,
    /// Total over buckets that had income; what the calendar view shows.
    pub average_per_active_bucket: Option<f64>,
    /// Total over elapsed calendar days; what the projection is built on.
    pub average_per_elapsed_day: Option<f64>,
    pub projection: Option<Projection>,
    pub comparison: PeriodComparison,
    pub delta_label: String,
    pub skipped_records: usize,
    pub unresolved_amount: f64,
}

pub fn stats_card(report: &dyn PeriodReport) -> StatsCard {
    let summary = report.summary();
    let projection = report.projection().copied();
    let comparison = *report.comparison();
    StatsCard {
        period: report.period(),
        total: summary.raw_total,
        best: summary.best_bucket,
        average_per_active_bucket: summary.average_per_active_bucket,
        average_per_elapsed_day: projection.map(|projection| projection.average_per_day),
        projection,
        delta_label: describe_delta(&comparison),
        comparison,
        skipped_records: report.anomalies().skipped_records(),
        unresolved_amount: report.anomalies().unresolved_amount,
    }
}

/// Signed percentage change, or `"no prior data"` when nothing can be compared.
pub fn describe_delta(comparison: &PeriodComparison) -> String {
    match comparison.delta_percentage {
        Some(percentage) => format!("{percentage:+.1}%"),
        None => String::from("no prior data"),
    }
}
