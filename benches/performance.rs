use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use income_core::{
    calendar::CalendarConfig,
    core::{
        aggregation::aggregate_period,
        bucketing::bucket_period,
        services::{ReportOptions, ReportService},
    },
    domain::{IncomeRecord, MonthPeriod, Period, Source, SourceCatalog, YearPeriod, YearlyRecords},
    storage::json_backend::{load_records_from_path, save_records_to_path},
};
use tempfile::tempdir;

const SOURCES: [&str; 6] = ["salary", "freelance", "dividends", "rent", "tips", "unknown"];

fn build_sample_records(count: usize) -> Vec<IncomeRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let date = start + Duration::days((idx % 366) as i64);
            IncomeRecord::new(
                format!("rec-{idx}"),
                10.0 + (idx % 250) as f64 * 0.5,
                format!("{}T{:02}:15:00Z", date, idx % 24),
                SOURCES[idx % SOURCES.len()],
            )
        })
        .collect()
}

fn catalog() -> SourceCatalog {
    SOURCES[..5]
        .iter()
        .map(|id| Source::new(*id, id.to_uppercase()))
        .collect()
}

fn bench_aggregation(c: &mut Criterion) {
    let records = build_sample_records(black_box(50_000));
    let catalog = catalog();
    let calendar = CalendarConfig::utc();
    let year = Period::Year(YearPeriod::new(2024).unwrap());

    c.bench_function("bucket_and_aggregate_year_50k", |b| {
        b.iter(|| {
            let buckets = bucket_period(&records, &year, &calendar).into_value();
            black_box(aggregate_period(&buckets, &year, &catalog));
        })
    });

    let options = ReportOptions::new(calendar, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    let input = YearlyRecords::Raw(records.clone());
    let previous = YearlyRecords::Raw(Vec::new());
    c.bench_function("yearly_report_50k", |b| {
        b.iter(|| {
            let report = ReportService::build_yearly(
                YearPeriod::new(2024).unwrap(),
                &input,
                &previous,
                &catalog,
                &options,
            );
            black_box(report);
        })
    });

    let june = MonthPeriod::new(2024, 6).unwrap();
    c.bench_function("monthly_report_50k", |b| {
        b.iter(|| {
            let report = ReportService::build_monthly(june, &records, &[], &catalog, &options);
            black_box(report);
        })
    });
}

fn bench_record_io(c: &mut Criterion) {
    let records = build_sample_records(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("records.json");

    c.bench_function("records_save_10k", |b| {
        b.iter(|| {
            save_records_to_path(&records, &file_path).expect("save records");
        })
    });

    save_records_to_path(&records, &file_path).expect("seed");

    c.bench_function("records_load_10k", |b| {
        b.iter(|| {
            let loaded = load_records_from_path(&file_path).expect("load records");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_aggregation, bench_record_io);
criterion_main!(benches);
