use serde::Serialize;

use crate::{
    core::{aggregation::TopN, services::PeriodReport},
    domain::{Displayable, SourceCatalog},
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedSource {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub source_id: String,
    pub display_name: String,
    pub logo_ref: Option<String>,
    pub total: f64,
    /// Percentage of the period's display total, `0.0` when that total is zero.
    pub share_of_display_total: f64,
}

/// Ranks the report's sources and joins them with catalog metadata.
///
/// Ordering comes from the report's own ranking: total descending, ties by
/// ascending source id.
pub fn ranked_sources(
    report: &dyn PeriodReport,
    catalog: &SourceCatalog,
    limit: TopN,
) -> Vec<RankedSource> {
    let display_total = report.summary().display_total;
    report
        .summary()
        .top_sources(limit)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let source = catalog.resolve(&entry.source_id);
            let share = if display_total > 0.0 {
                entry.total / display_total * 100.0
            } else {
                0.0
            };
            RankedSource {
                rank: index + 1,
                display_name: source
                    .map(Displayable::display_label)
                    .unwrap_or_else(|| entry.source_id.clone()),
                logo_ref: source.and_then(|source| source.logo_ref.clone()),
                source_id: entry.source_id,
                total: entry.total,
                share_of_display_total: share,
            }
        })
        .collect()
}
