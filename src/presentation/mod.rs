//! View-ready shapes derived from reports.
//!
//! Everything here reorders, relabels or pads figures that the reports
//! already hold; no function in this module sums records.

pub mod calendar_grid;
pub mod cards;
pub mod ranking;
pub mod series;

pub use calendar_grid::{calendar_grid, weekday_order, CalendarCell, CalendarGrid};
pub use cards::{describe_delta, stats_card, StatsCard};
pub use ranking::{ranked_sources, RankedSource};
pub use series::{cumulative_series, source_series, time_series, SeriesPoint};
