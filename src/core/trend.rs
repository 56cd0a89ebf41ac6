//! Period-over-period comparison and full-period projection.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Period;

/// Change of a period total against the adjacent earlier period.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PeriodComparison {
    pub current_total: f64,
    pub previous_total: f64,
    pub delta_absolute: f64,
    /// `None` when both totals are zero: there is no prior data to compare with.
    pub delta_percentage: Option<f64>,
}

impl PeriodComparison {
    /// Compares two totals.
    ///
    /// A positive previous total gives the usual relative change. With no
    /// previous income, any current income counts as a full `100%` gain and
    /// zero against zero has no percentage at all.
    pub fn between(current_total: f64, previous_total: f64) -> Self {
        let delta_percentage = if previous_total > 0.0 {
            Some((current_total - previous_total) / previous_total * 100.0)
        } else if current_total > 0.0 {
            Some(100.0)
        } else {
            None
        };
        Self {
            current_total,
            previous_total,
            delta_absolute: current_total - previous_total,
            delta_percentage,
        }
    }

    pub fn has_prior_data(&self) -> bool {
        self.delta_percentage.is_some()
    }
}

/// Extrapolation of a partial period to its full calendar length.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Projection {
    pub days_elapsed: u32,
    pub days_in_period: u32,
    /// Current total divided by elapsed calendar days, zero-income days included.
    pub average_per_day: f64,
    pub projected_total: f64,
}

impl Projection {
    /// Returns `None` (projection unavailable) until at least one day has elapsed.
    pub fn estimate(current_total: f64, days_elapsed: i64, days_in_period: u32) -> Option<Self> {
        if days_elapsed <= 0 {
            return None;
        }
        let elapsed = u32::try_from(days_elapsed).unwrap_or(u32::MAX);
        let average_per_day = current_total / elapsed as f64;
        let remaining = days_in_period.saturating_sub(elapsed);
        Some(Self {
            days_elapsed: elapsed,
            days_in_period,
            average_per_day,
            projected_total: current_total + average_per_day * remaining as f64,
        })
    }

    /// Projects `period` as seen on `today`.
    pub fn for_period(current_total: f64, period: &Period, today: NaiveDate) -> Option<Self> {
        Self::estimate(
            current_total,
            i64::from(days_elapsed(period, today)),
            period.days(),
        )
    }
}

/// Calendar days of `period` that have started by `today`, `today` included.
pub fn days_elapsed(period: &Period, today: NaiveDate) -> u32 {
    if today < period.first_day() {
        0
    } else if today > period.last_day() {
        period.days()
    } else {
        u32::try_from((today - period.first_day()).num_days() + 1).unwrap_or(period.days())
    }
}
