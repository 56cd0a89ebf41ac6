//! Line-oriented text layouts for the report views.

use crate::{
    core::{aggregation::Aggregate, anomaly::AnomalyReport},
    domain::{BucketKey, Granularity},
    presentation::{CalendarCell, CalendarGrid, RankedSource, StatsCard},
};

use super::output::Formatter;

const CELL_WIDTH: usize = 9;

/// Names of a card's bucket and of its period, e.g. `("day", "month")`.
fn unit_labels(card: &StatsCard) -> (&'static str, &'static str) {
    match card.period.bucket_granularity() {
        Granularity::Day => ("day", "month"),
        Granularity::Month => ("month", "year"),
    }
}

fn key_label(key: &BucketKey) -> String {
    match key {
        BucketKey::Day(date) => date.format("%a %d %b").to_string(),
        BucketKey::Month(month) => month.first_day().format("%B").to_string(),
    }
}

pub fn headline(card: &StatsCard, fmt: &Formatter) -> Vec<String> {
    let (unit, period) = unit_labels(card);
    let optional = |value: Option<f64>| {
        value
            .map(|value| fmt.amount(value))
            .unwrap_or_else(|| "n/a".to_string())
    };

    let mut lines = vec![format!(
        "Total: {} ({} vs previous {period})",
        fmt.highlight(fmt.amount(card.total)),
        fmt.delta(&card.comparison),
    )];
    lines.push(match &card.best {
        Some(best) => format!(
            "Best {unit}: {} ({})",
            key_label(&best.key),
            fmt.amount(best.total)
        ),
        None => format!("Best {unit}: none"),
    });
    lines.push(format!(
        "Average per active {unit}: {}",
        optional(card.average_per_active_bucket)
    ));
    lines.push(format!(
        "Average per elapsed day: {}",
        optional(card.average_per_elapsed_day)
    ));
    lines.push(match &card.projection {
        Some(projection) => format!(
            "Projected: {} ({} of {} days elapsed)",
            fmt.amount(projection.projected_total),
            projection.days_elapsed,
            projection.days_in_period
        ),
        None => "Projected: not available yet".to_string(),
    });
    lines
}

/// Week rows with the best day marked by `*`.
pub fn calendar_lines(grid: &CalendarGrid, fmt: &Formatter) -> Vec<String> {
    let header: String = grid
        .weekdays()
        .iter()
        .map(|day| format!("{:>width$}", &day.to_string()[..2], width = CELL_WIDTH))
        .collect();

    let mut lines = vec![header];
    for week in &grid.weeks {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                CalendarCell::Empty => " ".repeat(CELL_WIDTH),
                CalendarCell::Day {
                    date,
                    total,
                    is_best,
                } => {
                    let amount = if *total > 0.0 {
                        fmt.compact(*total)
                    } else {
                        "-".to_string()
                    };
                    let marker = if *is_best { "*" } else { " " };
                    format!("{:>2}{:>6}{}", date.format("%-d"), amount, marker)
                }
            })
            .collect();
        lines.push(row.trim_end().to_string());
    }
    lines
}

pub fn ranking_lines(
    ranked: &[RankedSource],
    uncategorized: f64,
    fmt: &Formatter,
) -> Vec<String> {
    if ranked.is_empty() && uncategorized <= 0.0 {
        return vec!["No income recorded.".to_string()];
    }
    let mut lines: Vec<String> = ranked
        .iter()
        .map(|entry| {
            format!(
                "{:>2}. {:<24} {:>14} {:>6.1}%",
                entry.rank,
                entry.display_name,
                fmt.amount(entry.total),
                entry.share_of_display_total
            )
        })
        .collect();
    if uncategorized > 0.0 {
        lines.push(format!("    {:<24} {:>14}", "Uncategorized", fmt.amount(uncategorized)));
    }
    lines
}

/// One line per month of a yearly report, best month marked by `*`.
pub fn month_lines(
    monthly: &[Aggregate],
    best: Option<BucketKey>,
    fmt: &Formatter,
) -> Vec<String> {
    monthly
        .iter()
        .map(|aggregate| {
            let marker = if Some(aggregate.key) == best { " *" } else { "" };
            format!(
                "{:<10} {:>14}{}",
                key_label(&aggregate.key),
                fmt.amount(aggregate.total),
                marker
            )
        })
        .collect()
}

pub fn anomaly_lines(report: &AnomalyReport, fmt: &Formatter) -> Vec<String> {
    let mut lines = Vec::new();
    if report.malformed > 0 {
        lines.push(format!(
            "{} record(s) skipped: unreadable date or amount",
            report.malformed
        ));
    }
    if report.outside_period > 0 {
        lines.push(format!(
            "{} record(s) skipped: date falls outside the period in this calendar",
            report.outside_period
        ));
    }
    if report.unresolved > 0 {
        lines.push(format!(
            "{} record(s) from unknown sources ({}) counted in the total only: {}",
            report.unresolved,
            report.unresolved_source_ids.join(", "),
            fmt.amount(report.unresolved_amount)
        ));
    }
    lines
}
