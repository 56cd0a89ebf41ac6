pub mod json_backend;
pub mod memory;

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::{
    calendar::CalendarConfig,
    domain::{
        IncomeRecord, MonthPeriod, MonthlySourceTotal, NewIncomeRecord, Period, RecordPatch,
        YearPeriod, YearlyRecords,
    },
};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// Remote record store the dashboard reads income from.
///
/// Fetches answer in the caller's calendar: a month or year holds the records
/// whose date, read in `calendar`, falls inside it. Pre-aggregated yearly
/// answers are summed in that same calendar. The reporting engine only calls
/// the fetch methods; insert, update and delete belong to the surrounding
/// editing UI.
pub trait RecordStore {
    fn fetch_by_month(
        &self,
        month: MonthPeriod,
        calendar: &CalendarConfig,
    ) -> Result<Vec<IncomeRecord>>;
    fn fetch_by_year(&self, year: YearPeriod, calendar: &CalendarConfig) -> Result<YearlyRecords>;
    fn insert(&mut self, record: NewIncomeRecord) -> Result<IncomeRecord>;
    fn update(&mut self, id: &str, patch: RecordPatch) -> Result<IncomeRecord>;
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Whether a raw timestamp falls in `[start, end)`, compared as ISO text.
///
/// Mirrors a `gte`/`lt` filter on a timestamp column: no parsing happens
/// here.
pub(crate) fn in_text_range(created_at: &str, start: NaiveDate, end: NaiveDate) -> bool {
    let value = created_at.trim();
    let lower = start.format("%Y-%m-%d").to_string();
    let upper = end.format("%Y-%m-%d").to_string();
    value >= lower.as_str() && value < upper.as_str()
}

/// Records of `period` as read in `calendar`.
///
/// The text query is widened by a day on each side, since an offset of less
/// than a day can move a timestamp across the period edge, and then narrowed
/// to the records whose calendar date lies in the period. A record whose date
/// cannot be read is returned only by the period its text falls in, so the
/// engine reports it exactly once.
pub(crate) fn period_slice(
    records: &[IncomeRecord],
    period: &Period,
    calendar: &CalendarConfig,
) -> Vec<IncomeRecord> {
    let start = period.first_day();
    let end = period
        .last_day()
        .checked_add_days(Days::new(1))
        .unwrap_or_else(|| period.last_day());
    let query_start = start.checked_sub_days(Days::new(1)).unwrap_or(start);
    let query_end = end.checked_add_days(Days::new(1)).unwrap_or(end);
    records
        .iter()
        .filter(|record| in_text_range(&record.created_at, query_start, query_end))
        .filter(|record| match calendar.local_date(&record.created_at) {
            Ok(date) => period.contains(date),
            Err(_) => in_text_range(&record.created_at, start, end),
        })
        .cloned()
        .collect()
}

pub(crate) fn month_slice(
    records: &[IncomeRecord],
    month: MonthPeriod,
    calendar: &CalendarConfig,
) -> Vec<IncomeRecord> {
    period_slice(records, &Period::Month(month), calendar)
}

pub(crate) fn year_slice(
    records: &[IncomeRecord],
    year: YearPeriod,
    calendar: &CalendarConfig,
) -> Vec<IncomeRecord> {
    period_slice(records, &Period::Year(year), calendar)
}

/// Sums a year's records per month and source the way a server-side view would.
///
/// Months are taken in `calendar`, the same calendar raw records are bucketed
/// in. Rows whose timestamp cannot be read are left out, matching a database
/// that only stores valid timestamps.
pub(crate) fn pre_aggregate(
    records: &[IncomeRecord],
    year: YearPeriod,
    calendar: &CalendarConfig,
) -> Vec<MonthlySourceTotal> {
    let mut sums: BTreeMap<(u32, String), f64> = BTreeMap::new();
    for record in year_slice(records, year, calendar) {
        match calendar.local_date(&record.created_at) {
            Ok(date) => {
                let month = MonthPeriod::containing(date).month();
                *sums.entry((month, record.source_id.clone())).or_insert(0.0) += record.amount;
            }
            Err(_) => {
                tracing::warn!(record = %record.id, "skipping unreadable record in yearly sum")
            }
        }
    }
    sums.into_iter()
        .map(|((month, source_id), total)| MonthlySourceTotal {
            month,
            source_id,
            total,
        })
        .collect()
}

pub use json_backend::JsonRecordStore;
pub use memory::{InMemoryRecordStore, YearlyMode};
