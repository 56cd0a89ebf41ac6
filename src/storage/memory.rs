use crate::{
    calendar::CalendarConfig,
    domain::{
        Identifiable, IncomeRecord, MonthPeriod, NewIncomeRecord, RecordPatch, YearPeriod,
        YearlyRecords,
    },
};

use super::{month_slice, pre_aggregate, year_slice, RecordStore, Result, StoreError};

/// Shape in which a store answers yearly fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearlyMode {
    #[default]
    Raw,
    PreAggregated,
}

/// Record store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Vec<IncomeRecord>,
    yearly_mode: YearlyMode,
}

impl InMemoryRecordStore {
    pub fn new(records: Vec<IncomeRecord>) -> Self {
        Self {
            records,
            yearly_mode: YearlyMode::Raw,
        }
    }

    pub fn with_yearly_mode(mut self, mode: YearlyMode) -> Self {
        self.yearly_mode = mode;
        self
    }

    pub fn records(&self) -> &[IncomeRecord] {
        &self.records
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn fetch_by_month(
        &self,
        month: MonthPeriod,
        calendar: &CalendarConfig,
    ) -> Result<Vec<IncomeRecord>> {
        Ok(month_slice(&self.records, month, calendar))
    }

    fn fetch_by_year(&self, year: YearPeriod, calendar: &CalendarConfig) -> Result<YearlyRecords> {
        Ok(match self.yearly_mode {
            YearlyMode::Raw => YearlyRecords::Raw(year_slice(&self.records, year, calendar)),
            YearlyMode::PreAggregated => {
                YearlyRecords::PreAggregated(pre_aggregate(&self.records, year, calendar))
            }
        })
    }

    fn insert(&mut self, record: NewIncomeRecord) -> Result<IncomeRecord> {
        let record = record.into_record();
        self.records.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, id: &str, patch: RecordPatch) -> Result<IncomeRecord> {
        let slot = self.position(id)?;
        let updated = self.records[slot].patched(&patch);
        self.records[slot] = updated.clone();
        Ok(updated)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let slot = self.position(id)?;
        self.records.remove(slot);
        Ok(())
    }
}
