use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::{
    core::services::MonthlyReport,
    domain::{BucketKey, MonthPeriod},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalendarCell {
    /// Padding before the first or after the last day of the month.
    Empty,
    Day {
        date: NaiveDate,
        total: f64,
        is_best: bool,
    },
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarCell::Day { date, .. } => Some(*date),
            CalendarCell::Empty => None,
        }
    }
}

/// A month laid out in week rows, starting on a configurable weekday.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarGrid {
    pub month: MonthPeriod,
    pub first_weekday: Weekday,
    pub weeks: Vec<[CalendarCell; 7]>,
}

impl CalendarGrid {
    /// Column headers matching the grid's week layout.
    pub fn weekdays(&self) -> [Weekday; 7] {
        weekday_order(self.first_weekday)
    }

    pub fn days(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks
            .iter()
            .flat_map(|week| week.iter())
            .filter(|cell| matches!(cell, CalendarCell::Day { .. }))
    }
}

/// The seven weekdays starting from `first`.
pub fn weekday_order(first: Weekday) -> [Weekday; 7] {
    let mut day = first;
    std::array::from_fn(|_| {
        let current = day;
        day = day.succ();
        current
    })
}

/// Lays out a monthly report's daily totals as a calendar.
///
/// The highlighted day is the report's best day, so the grid and the stats
/// card always agree.
pub fn calendar_grid(report: &MonthlyReport, first_weekday: Weekday) -> CalendarGrid {
    let totals: HashMap<BucketKey, f64> = report
        .daily
        .iter()
        .map(|aggregate| (aggregate.key, aggregate.total))
        .collect();
    let best = report.summary.best_bucket.map(|best| best.key);

    let month = report.month;
    let lead = (7 + month.first_day().weekday().num_days_from_monday()
        - first_weekday.num_days_from_monday())
        % 7;

    let mut cells: Vec<CalendarCell> = vec![CalendarCell::Empty; lead as usize];
    cells.extend(month.dates().map(|date| {
        let key = BucketKey::Day(date);
        CalendarCell::Day {
            date,
            total: totals.get(&key).copied().unwrap_or(0.0),
            is_best: best == Some(key),
        }
    }));
    while cells.len() % 7 != 0 {
        cells.push(CalendarCell::Empty);
    }

    let weeks = cells
        .chunks(7)
        .map(|week| std::array::from_fn(|slot| week[slot].clone()))
        .collect();

    CalendarGrid {
        month,
        first_weekday,
        weeks,
    }
}
