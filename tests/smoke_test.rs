mod common;

use chrono::Weekday;
use common::{catalog, date, options, sample_year};
use income_core::{
    core::{aggregation::TopN, services::ReportService},
    domain::MonthPeriod,
    init,
    presentation::{calendar_grid, cumulative_series, ranked_sources, stats_card, time_series},
    storage::InMemoryRecordStore,
};

#[test]
fn month_dashboard_smoke() {
    init();

    let store = InMemoryRecordStore::new(sample_year());
    let month = MonthPeriod::new(2024, 3).unwrap();
    let report = ReportService::monthly(&store, &catalog(), month, &options(date(2024, 3, 15)))
        .expect("monthly report")
        .into_value();

    let series = time_series(&report.daily);
    assert_eq!(series.len(), 31);
    assert_eq!(
        cumulative_series(&report.daily).last().map(|point| point.value),
        Some(report.summary.raw_total)
    );

    let grid = calendar_grid(&report, Weekday::Sun);
    assert_eq!(grid.days().count(), 31);

    let ranked = ranked_sources(&report, &catalog(), TopN::Limit(2));
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].display_name, "Salary");

    let card = stats_card(&report);
    assert_eq!(card.total, report.summary.raw_total);
    assert_eq!(card.comparison.previous_total, 3000.0 + 250.5 * 2.0);
    assert!(card.projection.is_some());
}
