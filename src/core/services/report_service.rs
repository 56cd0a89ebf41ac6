use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    calendar::CalendarConfig,
    core::{
        aggregation::{aggregate_period, Aggregate, PeriodSummary, SourceTotal, TopN},
        anomaly::{AnomalyReport, Outcome},
        bucketing::bucket_period,
        rollup::monthly_aggregates,
        trend::{PeriodComparison, Projection},
    },
    domain::{IncomeRecord, MonthPeriod, Period, SourceCatalog, YearPeriod, YearlyRecords},
    storage::RecordStore,
};

use crate::errors::Result;

/// Inputs every report needs besides the records themselves.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub calendar: CalendarConfig,
    pub top_sources: TopN,
    /// Date the projection is computed for.
    pub today: NaiveDate,
}

impl ReportOptions {
    pub fn new(calendar: CalendarConfig, today: NaiveDate) -> Self {
        Self {
            calendar,
            top_sources: TopN::summary(),
            today,
        }
    }

    pub fn with_top_sources(mut self, top_sources: TopN) -> Self {
        self.top_sources = top_sources;
        self
    }
}

/// Figures shared by monthly and yearly reports, so views can be written once.
pub trait PeriodReport {
    fn period(&self) -> Period;
    fn buckets(&self) -> &[Aggregate];
    fn summary(&self) -> &PeriodSummary;
    fn top_sources(&self) -> &[SourceTotal];
    fn comparison(&self) -> &PeriodComparison;
    fn projection(&self) -> Option<&Projection>;
    fn anomalies(&self) -> &AnomalyReport;
}

/// Everything the month views show, derived from one fetch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyReport {
    pub month: MonthPeriod,
    /// One aggregate per calendar day of the month, empty days included.
    pub daily: Vec<Aggregate>,
    pub summary: PeriodSummary,
    pub top_sources: Vec<SourceTotal>,
    /// Against the previous calendar month.
    pub comparison: PeriodComparison,
    pub projection: Option<Projection>,
    pub anomalies: AnomalyReport,
}

/// Everything the year views show, derived from one fetch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearlyReport {
    pub year: YearPeriod,
    /// Twelve monthly aggregates, empty months included.
    pub monthly: Vec<Aggregate>,
    pub summary: PeriodSummary,
    pub top_sources: Vec<SourceTotal>,
    /// Against the previous calendar year.
    pub comparison: PeriodComparison,
    pub projection: Option<Projection>,
    pub anomalies: AnomalyReport,
}

impl PeriodReport for MonthlyReport {
    fn period(&self) -> Period {
        Period::Month(self.month)
    }

    fn buckets(&self) -> &[Aggregate] {
        &self.daily
    }

    fn summary(&self) -> &PeriodSummary {
        &self.summary
    }

    fn top_sources(&self) -> &[SourceTotal] {
        &self.top_sources
    }

    fn comparison(&self) -> &PeriodComparison {
        &self.comparison
    }

    fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    fn anomalies(&self) -> &AnomalyReport {
        &self.anomalies
    }
}

impl PeriodReport for YearlyReport {
    fn period(&self) -> Period {
        Period::Year(self.year)
    }

    fn buckets(&self) -> &[Aggregate] {
        &self.monthly
    }

    fn summary(&self) -> &PeriodSummary {
        &self.summary
    }

    fn top_sources(&self) -> &[SourceTotal] {
        &self.top_sources
    }

    fn comparison(&self) -> &PeriodComparison {
        &self.comparison
    }

    fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    fn anomalies(&self) -> &AnomalyReport {
        &self.anomalies
    }
}

pub struct ReportService;

impl ReportService {
    /// Fetches a month and the month before it, then builds the monthly report.
    pub fn monthly(
        store: &dyn RecordStore,
        catalog: &SourceCatalog,
        month: MonthPeriod,
        options: &ReportOptions,
    ) -> Result<Outcome<MonthlyReport>> {
        let calendar = &options.calendar;
        let records = store.fetch_by_month(month, calendar)?;
        let previous = store.fetch_by_month(month.previous(), calendar)?;
        tracing::info!(
            %month,
            records = records.len(),
            previous_records = previous.len(),
            "building monthly report"
        );
        Ok(Self::build_monthly(month, &records, &previous, catalog, options))
    }

    /// Fetches a year and the year before it, then builds the yearly report.
    pub fn yearly(
        store: &dyn RecordStore,
        catalog: &SourceCatalog,
        year: YearPeriod,
        options: &ReportOptions,
    ) -> Result<Outcome<YearlyReport>> {
        let calendar = &options.calendar;
        let records = store.fetch_by_year(year, calendar)?;
        let previous = store.fetch_by_year(year.previous(), calendar)?;
        tracing::info!(
            %year,
            entries = records.len(),
            previous_entries = previous.len(),
            "building yearly report"
        );
        Ok(Self::build_yearly(year, &records, &previous, catalog, options))
    }

    /// Builds a monthly report from already fetched records.
    pub fn build_monthly(
        month: MonthPeriod,
        records: &[IncomeRecord],
        previous_records: &[IncomeRecord],
        catalog: &SourceCatalog,
        options: &ReportOptions,
    ) -> Outcome<MonthlyReport> {
        let period = Period::Month(month);
        // Problems in the comparison month do not belong to this report.
        let previous_total = Self::month_daily(month.previous(), previous_records, catalog, options)
            .map(|daily| PeriodSummary::from_aggregates(&daily).raw_total)
            .into_value();

        let (daily, anomalies) = Self::month_daily(month, records, catalog, options).into_parts();
        let summary = PeriodSummary::from_aggregates(&daily);
        let report = MonthlyReport {
            month,
            top_sources: summary.top_sources(options.top_sources),
            comparison: PeriodComparison::between(summary.raw_total, previous_total),
            projection: Projection::for_period(summary.raw_total, &period, options.today),
            daily,
            summary,
            anomalies: AnomalyReport::from_anomalies(&anomalies),
        };
        Outcome::from_parts(report, anomalies)
    }

    /// Builds a yearly report from already fetched yearly input.
    pub fn build_yearly(
        year: YearPeriod,
        input: &YearlyRecords,
        previous_input: &YearlyRecords,
        catalog: &SourceCatalog,
        options: &ReportOptions,
    ) -> Outcome<YearlyReport> {
        let period = Period::Year(year);
        let previous_total =
            monthly_aggregates(year.previous(), previous_input, catalog, &options.calendar)
                .map(|monthly| PeriodSummary::from_aggregates(&monthly).raw_total)
                .into_value();

        let (monthly, anomalies) =
            monthly_aggregates(year, input, catalog, &options.calendar).into_parts();
        let summary = PeriodSummary::from_aggregates(&monthly);
        let report = YearlyReport {
            year,
            top_sources: summary.top_sources(options.top_sources),
            comparison: PeriodComparison::between(summary.raw_total, previous_total),
            projection: Projection::for_period(summary.raw_total, &period, options.today),
            monthly,
            summary,
            anomalies: AnomalyReport::from_anomalies(&anomalies),
        };
        Outcome::from_parts(report, anomalies)
    }

    /// Full, unbounded source ranking of a report's period.
    pub fn source_breakdown(report: &dyn PeriodReport) -> Vec<SourceTotal> {
        report.summary().top_sources(TopN::All)
    }

    fn month_daily(
        month: MonthPeriod,
        records: &[IncomeRecord],
        catalog: &SourceCatalog,
        options: &ReportOptions,
    ) -> Outcome<Vec<Aggregate>> {
        let period = Period::Month(month);
        bucket_period(records, &period, &options.calendar)
            .and_then(|buckets| aggregate_period(&buckets, &period, catalog))
    }
}
