//! Raw income records as the record store hands them over.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Identifiable;

/// A single dated, source-tagged income entry. Never mutated by the engine.
///
/// `created_at` keeps the store's raw timestamp text so a record with an
/// unreadable date can be reported on its own instead of failing the batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeRecord {
    pub id: String,
    pub amount: f64,
    pub created_at: String,
    pub source_id: String,
}

impl IncomeRecord {
    pub fn new(
        id: impl Into<String>,
        amount: f64,
        created_at: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            created_at: created_at.into(),
            source_id: source_id.into(),
        }
    }

    /// Applies a patch, returning the updated copy.
    pub fn patched(&self, patch: &RecordPatch) -> Self {
        let mut updated = self.clone();
        if let Some(amount) = patch.amount {
            updated.amount = amount;
        }
        if let Some(created_at) = &patch.created_at {
            updated.created_at = created_at.clone();
        }
        if let Some(source_id) = &patch.source_id {
            updated.source_id = source_id.clone();
        }
        updated
    }
}

impl Identifiable for IncomeRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for inserting a record; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewIncomeRecord {
    pub amount: f64,
    pub created_at: String,
    pub source_id: String,
}

impl NewIncomeRecord {
    pub fn into_record(self) -> IncomeRecord {
        IncomeRecord {
            id: Uuid::new_v4().to_string(),
            amount: self.amount,
            created_at: self.created_at,
            source_id: self.source_id,
        }
    }
}

/// Partial update for an existing record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl RecordPatch {
    pub fn has_effect(&self) -> bool {
        self.amount.is_some() || self.created_at.is_some() || self.source_id.is_some()
    }
}

/// One pre-aggregated row of a yearly fetch: the total of a source in a month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySourceTotal {
    pub month: u32,
    pub source_id: String,
    pub total: f64,
}

/// What a yearly fetch returns: raw records, or rows the store already summed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum YearlyRecords {
    Raw(Vec<IncomeRecord>),
    PreAggregated(Vec<MonthlySourceTotal>),
}

impl YearlyRecords {
    pub fn len(&self) -> usize {
        match self {
            YearlyRecords::Raw(records) => records.len(),
            YearlyRecords::PreAggregated(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_present_fields() {
        let record = IncomeRecord::new("r1", 10.0, "2024-01-02", "salary");
        let patch = RecordPatch {
            amount: Some(12.5),
            ..RecordPatch::default()
        };
        let updated = record.patched(&patch);
        assert_eq!(updated.amount, 12.5);
        assert_eq!(updated.created_at, "2024-01-02");
        assert_eq!(updated.source_id, "salary");
        assert!(patch.has_effect());
        assert!(!RecordPatch::default().has_effect());
    }

    #[test]
    fn inserted_records_get_fresh_ids() {
        let draft = NewIncomeRecord {
            amount: 1.0,
            created_at: "2024-01-01".into(),
            source_id: "tips".into(),
        };
        let a = draft.clone().into_record();
        let b = draft.into_record();
        assert_ne!(a.id, b.id);
    }
}
