#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use income_core::{
    calendar::CalendarConfig,
    config::ConfigManager,
    core::services::ReportOptions,
    domain::{IncomeRecord, Source, SourceCatalog},
    storage::json_backend::{save_catalog_to_path, save_records_to_path},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Isolated config manager plus the base directory it lives in.
pub fn setup_test_env() -> (PathBuf, ConfigManager) {
    let base = temp_base();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (base, config_manager)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn record(id: &str, amount: f64, created_at: &str, source_id: &str) -> IncomeRecord {
    IncomeRecord::new(id, amount, created_at, source_id)
}

pub fn catalog() -> SourceCatalog {
    SourceCatalog::new(vec![
        Source::new("salary", "Salary").with_logo("logos/salary.svg"),
        Source::new("freelance", "Freelance"),
        Source::new("dividends", "Dividends"),
        Source::new("tips", "Tips"),
    ])
}

pub fn options(today: NaiveDate) -> ReportOptions {
    ReportOptions::new(CalendarConfig::utc(), today)
}

/// Report options in a calendar `minutes` ahead of UTC (negative for behind).
pub fn offset_options(today: NaiveDate, minutes: i32) -> ReportOptions {
    let calendar = CalendarConfig::with_offset_minutes(minutes).expect("valid test offset");
    ReportOptions::new(calendar, today)
}

/// Records within an hour or so of a month or year edge, which change
/// month, or year, depending on the calendar offset.
pub fn boundary_records() -> Vec<IncomeRecord> {
    vec![
        record("edge-march", 80.0, "2024-03-31T23:30:00Z", "salary"),
        record("edge-new-year", 40.0, "2023-12-31T23:30:00Z", "tips"),
        record("edge-year-end", 60.0, "2024-12-31T23:45:00Z", "freelance"),
        record("edge-june", 25.0, "2024-06-01T00:15:00+00:00", "salary"),
        record("edge-brt", 10.0, "2024-08-31T22:00:00-03:00", "tips"),
        record("edge-ist", 15.0, "2024-10-31T20:00:00Z", "dividends"),
    ]
}

/// A year of income spread over sources, including one unknown source.
pub fn sample_year() -> Vec<IncomeRecord> {
    let mut records = Vec::new();
    for month in 1..=12u32 {
        records.push(record(
            &format!("salary-{month}"),
            3000.0,
            &format!("2024-{month:02}-05T09:00:00Z"),
            "salary",
        ));
        records.push(record(
            &format!("freelance-{month}"),
            250.5 * month as f64,
            &format!("2024-{month:02}-18"),
            "freelance",
        ));
    }
    records.push(record("div-q1", 120.25, "2024-03-29 16:00:00", "dividends"));
    records.push(record("gift", 75.0, "2024-03-12", "gifts"));
    records
}

/// Writes records and the catalog under `base`, returning both paths.
pub fn write_fixture(base: &std::path::Path, records: &[IncomeRecord]) -> (PathBuf, PathBuf) {
    let records_path = base.join("records.json");
    let catalog_path = base.join("sources.json");
    save_records_to_path(records, &records_path).expect("write records fixture");
    save_catalog_to_path(&catalog(), &catalog_path).expect("write catalog fixture");
    (records_path, catalog_path)
}
