mod common;

use common::{
    boundary_records, date, offset_options, options, record, sample_year, setup_test_env,
    temp_base, write_fixture,
};
use income_core::{
    calendar::CalendarConfig,
    config::{Config, ConfigError},
    core::services::ReportService,
    domain::{MonthPeriod, NewIncomeRecord, RecordPatch, YearPeriod, YearlyRecords},
    storage::{
        json_backend::{load_catalog_from_path, load_records_from_path},
        JsonRecordStore, RecordStore, StoreError, YearlyMode,
    },
};

#[test]
fn json_store_round_trips_crud_operations() {
    let base = temp_base();
    let mut store = JsonRecordStore::new(base.join("records.json"));
    let created = store
        .insert(NewIncomeRecord {
            amount: 420.0,
            created_at: "2024-05-02T12:00:00Z".into(),
            source_id: "freelance".into(),
        })
        .expect("insert");
    assert!(!created.id.is_empty());

    let updated = store
        .update(
            &created.id,
            RecordPatch {
                amount: Some(450.0),
                source_id: Some("salary".into()),
                ..RecordPatch::default()
            },
        )
        .expect("update");
    assert_eq!(updated.amount, 450.0);
    assert_eq!(updated.created_at, "2024-05-02T12:00:00Z");

    let may = store
        .fetch_by_month(MonthPeriod::new(2024, 5).unwrap(), &CalendarConfig::utc())
        .expect("fetch");
    assert_eq!(may, vec![updated.clone()]);

    store.delete(&created.id).expect("delete");
    assert!(matches!(
        store.delete(&created.id),
        Err(StoreError::NotFound(_))
    ));
    assert!(load_records_from_path(store.path()).unwrap().is_empty());
}

#[test]
fn json_store_feeds_reports_like_memory_store() {
    let base = temp_base();
    let (records_path, catalog_path) = write_fixture(&base, &sample_year());
    let store = JsonRecordStore::new(records_path).with_yearly_mode(YearlyMode::PreAggregated);
    let catalog = load_catalog_from_path(&catalog_path).expect("catalog");
    assert_eq!(catalog.len(), 4);

    let year = YearPeriod::new(2024).unwrap();
    assert!(matches!(
        store.fetch_by_year(year, &CalendarConfig::utc()).unwrap(),
        YearlyRecords::PreAggregated(ref rows) if !rows.is_empty()
    ));
    let report = ReportService::yearly(&store, &catalog, year, &options(date(2024, 12, 31)))
        .expect("yearly report");
    assert!(!report.is_complete());
    let report = report.into_value();
    assert_eq!(report.anomalies.unresolved_source_ids, vec!["gifts".to_string()]);
    assert_eq!(report.top_sources[0].source_id, "salary");
    assert_eq!(report.summary.source_total("salary"), Some(36000.0));
}

#[test]
fn month_fetch_uses_half_open_text_range() {
    let base = temp_base();
    let (records_path, _) = write_fixture(
        &base,
        &[
            record("in", 1.0, "2024-02-29T23:59:59Z", "salary"),
            record("out", 1.0, "2024-03-01T00:00:00Z", "salary"),
            record("bad", 1.0, "2024-02-3x", "salary"),
        ],
    );
    let store = JsonRecordStore::new(records_path);
    let ids: Vec<String> = store
        .fetch_by_month(MonthPeriod::new(2024, 2).unwrap(), &CalendarConfig::utc())
        .unwrap()
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec!["in".to_string(), "bad".to_string()]);
}

#[test]
fn json_store_answers_in_the_report_calendar() {
    let base = temp_base();
    let mut records = sample_year();
    records.extend(boundary_records());
    let (records_path, catalog_path) = write_fixture(&base, &records);
    let catalog = load_catalog_from_path(&catalog_path).expect("catalog");
    let raw_store = JsonRecordStore::new(records_path);
    let summed_store = raw_store.clone().with_yearly_mode(YearlyMode::PreAggregated);
    let year = YearPeriod::new(2024).unwrap();

    for minutes in [60, -180] {
        let opts = offset_options(date(2025, 1, 1), minutes);
        let raw = ReportService::yearly(&raw_store, &catalog, year, &opts)
            .expect("raw yearly")
            .into_value();
        let summed = ReportService::yearly(&summed_store, &catalog, year, &opts)
            .expect("pre-aggregated yearly")
            .into_value();
        assert_eq!(raw.anomalies.outside_period, 0);

        for (slot, month) in year.months().into_iter().enumerate() {
            let monthly = ReportService::monthly(&raw_store, &catalog, month, &opts)
                .expect("monthly")
                .into_value();
            assert_eq!(monthly.anomalies.outside_period, 0, "offset {minutes}, {month}");
            assert_eq!(monthly.summary.raw_total, raw.monthly[slot].total);
            assert_eq!(raw.monthly[slot].total, summed.monthly[slot].total);
        }
    }

    // 23:30 UTC on March 31 is already April one hour east of UTC.
    let east = offset_options(date(2025, 1, 1), 60);
    let april = raw_store
        .fetch_by_month(MonthPeriod::new(2024, 4).unwrap(), &east.calendar)
        .unwrap();
    assert!(april.iter().any(|record| record.id == "edge-march"));
    let march = raw_store
        .fetch_by_month(MonthPeriod::new(2024, 3).unwrap(), &east.calendar)
        .unwrap();
    assert!(march.iter().all(|record| record.id != "edge-march"));
}

#[test]
fn corrupt_records_file_is_a_fetch_error() {
    let base = temp_base();
    let path = base.join("records.json");
    std::fs::write(&path, "{ not json").unwrap();
    let result = JsonRecordStore::new(path)
        .fetch_by_month(MonthPeriod::new(2024, 1).unwrap(), &CalendarConfig::utc());
    assert!(matches!(result, Err(StoreError::Serde(_))));
}

#[test]
fn config_manager_persists_settings() {
    let (base, manager) = setup_test_env();
    let config = Config {
        currency: "EUR".into(),
        locale: "de-DE".into(),
        utc_offset_minutes: 60,
        top_sources: 3,
        records_path: Some(base.join("records.json")),
        ..Config::default()
    };
    manager.save(&config).expect("save config");
    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.locale_config().decimal_separator, ',');
    assert_eq!(loaded.currency_code().as_str(), "EUR");
}

#[test]
fn invalid_config_is_rejected_on_load() {
    let (_, manager) = setup_test_env();
    std::fs::write(
        manager.path(),
        r#"{"locale":"en-US","currency":"USD","top_sources":0}"#,
    )
    .unwrap();
    assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));
}
