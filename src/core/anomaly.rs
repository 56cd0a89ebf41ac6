//! Per-record anomalies and the partial-result wrapper that carries them.
//!
//! Aggregation never fails as a whole because of one bad record: anomalies
//! are collected next to the figures so callers can flag them.

use chrono::NaiveDate;
use serde::Serialize;

/// Why a record could not be admitted into bucketing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MalformedReason {
    UnreadableDate { raw: String },
    InvalidAmount { amount: f64 },
    InvalidMonth { month: u32 },
}

/// Something about a record that the figures had to work around.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// Excluded from every figure and counted as a skipped record.
    MalformedRecord {
        record_id: String,
        #[serde(flatten)]
        reason: MalformedReason,
    },
    /// Counted in raw totals, absent from per-source breakdowns.
    UnresolvedSource {
        record_id: String,
        source_id: String,
        amount: f64,
    },
    /// The record's calendar date is outside the requested period.
    OutsidePeriod { record_id: String, date: NaiveDate },
}

impl Anomaly {
    pub fn record_id(&self) -> &str {
        match self {
            Anomaly::MalformedRecord { record_id, .. }
            | Anomaly::UnresolvedSource { record_id, .. }
            | Anomaly::OutsidePeriod { record_id, .. } => record_id,
        }
    }

    /// Whether the record was left out of the period's figures altogether.
    pub fn is_skipped(&self) -> bool {
        !matches!(self, Anomaly::UnresolvedSource { .. })
    }
}

/// A result that is either complete or carries the anomalies met on the way.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Outcome<T> {
    Complete(T),
    Partial(T, Vec<Anomaly>),
}

impl<T> Outcome<T> {
    pub fn from_parts(value: T, anomalies: Vec<Anomaly>) -> Self {
        if anomalies.is_empty() {
            Outcome::Complete(value)
        } else {
            Outcome::Partial(value, anomalies)
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Complete(value) | Outcome::Partial(value, _) => value,
        }
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        match self {
            Outcome::Complete(_) => &[],
            Outcome::Partial(_, anomalies) => anomalies,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete(_))
    }

    pub fn into_parts(self) -> (T, Vec<Anomaly>) {
        match self {
            Outcome::Complete(value) => (value, Vec::new()),
            Outcome::Partial(value, anomalies) => (value, anomalies),
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        let (value, anomalies) = self.into_parts();
        Outcome::from_parts(f(value), anomalies)
    }

    /// Chains a second step, keeping the anomalies of both in order.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        let (value, mut anomalies) = self.into_parts();
        let (next, more) = f(value).into_parts();
        anomalies.extend(more);
        Outcome::from_parts(next, anomalies)
    }
}

/// Counts of anomalies suitable for a status line.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AnomalyReport {
    pub malformed: usize,
    pub outside_period: usize,
    pub unresolved: usize,
    /// Amount that is in raw totals but in no source breakdown.
    pub unresolved_amount: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_source_ids: Vec<String>,
}

impl AnomalyReport {
    pub fn from_anomalies(anomalies: &[Anomaly]) -> Self {
        let mut report = Self::default();
        for anomaly in anomalies {
            match anomaly {
                Anomaly::MalformedRecord { .. } => report.malformed += 1,
                Anomaly::OutsidePeriod { .. } => report.outside_period += 1,
                Anomaly::UnresolvedSource {
                    source_id, amount, ..
                } => {
                    report.unresolved += 1;
                    report.unresolved_amount += amount;
                    if !report.unresolved_source_ids.contains(source_id) {
                        report.unresolved_source_ids.push(source_id.clone());
                    }
                }
            }
        }
        report.unresolved_source_ids.sort();
        report
    }

    pub fn skipped_records(&self) -> usize {
        self.malformed + self.outside_period
    }

    pub fn is_clean(&self) -> bool {
        self.skipped_records() == 0 && self.unresolved == 0
    }
}
