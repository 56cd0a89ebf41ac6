pub mod aggregation;
pub mod anomaly;
pub mod bucketing;
pub mod refresh;
pub mod rollup;
pub mod services;
pub mod trend;

pub use aggregation::{
    aggregate_bucket, aggregate_buckets, aggregate_period, best_bucket, rank_sources, Aggregate,
    BestBucket, PeriodSummary, SourceTotal, TopN, DEFAULT_TOP_SOURCES,
};
pub use anomaly::{Anomaly, AnomalyReport, MalformedReason, Outcome};
pub use bucketing::{admit, bucket_period, bucket_records, Buckets};
pub use refresh::{RefreshOutcome, ReportRefresh, RequestTicket};
pub use rollup::monthly_aggregates;
pub use services::{MonthlyReport, PeriodReport, ReportOptions, ReportService, YearlyReport};
pub use trend::{days_elapsed, PeriodComparison, Projection};
