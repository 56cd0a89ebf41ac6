use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    calendar::CalendarConfig,
    domain::{
        Identifiable, IncomeRecord, MonthPeriod, NewIncomeRecord, RecordPatch, Source,
        SourceCatalog, YearPeriod, YearlyRecords,
    },
};

use super::{
    memory::YearlyMode, month_slice, pre_aggregate, year_slice, RecordStore, Result, StoreError,
};

const TMP_SUFFIX: &str = "tmp";

/// Record store backed by a JSON array of records on disk.
///
/// Every call reads the file afresh; nothing is cached between fetches.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
    yearly_mode: YearlyMode,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            yearly_mode: YearlyMode::Raw,
        }
    }

    pub fn with_yearly_mode(mut self, mode: YearlyMode) -> Self {
        self.yearly_mode = mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<IncomeRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        load_records_from_path(&self.path)
    }

    fn modify<T>(&self, change: impl FnOnce(&mut Vec<IncomeRecord>) -> Result<T>) -> Result<T> {
        let mut records = self.load()?;
        let value = change(&mut records)?;
        save_records_to_path(&records, &self.path)?;
        Ok(value)
    }
}

impl RecordStore for JsonRecordStore {
    fn fetch_by_month(
        &self,
        month: MonthPeriod,
        calendar: &CalendarConfig,
    ) -> Result<Vec<IncomeRecord>> {
        let records = self.load()?;
        tracing::debug!(
            path = %self.path.display(),
            %month,
            "fetching month from json store"
        );
        Ok(month_slice(&records, month, calendar))
    }

    fn fetch_by_year(&self, year: YearPeriod, calendar: &CalendarConfig) -> Result<YearlyRecords> {
        let records = self.load()?;
        Ok(match self.yearly_mode {
            YearlyMode::Raw => YearlyRecords::Raw(year_slice(&records, year, calendar)),
            YearlyMode::PreAggregated => {
                YearlyRecords::PreAggregated(pre_aggregate(&records, year, calendar))
            }
        })
    }

    fn insert(&mut self, record: NewIncomeRecord) -> Result<IncomeRecord> {
        self.modify(|records| {
            let record = record.into_record();
            records.push(record.clone());
            Ok(record)
        })
    }

    fn update(&mut self, id: &str, patch: RecordPatch) -> Result<IncomeRecord> {
        self.modify(|records| {
            let slot = records
                .iter_mut()
                .find(|record| record.id() == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            *slot = slot.patched(&patch);
            Ok(slot.clone())
        })
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.modify(|records| {
            let before = records.len();
            records.retain(|record| record.id() != id);
            if records.len() == before {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Ok(())
        })
    }
}

/// Writes records to disk atomically by staging to a temporary file.
pub fn save_records_to_path(records: &[IncomeRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    write_atomic(path, &json)
}

pub fn load_records_from_path(path: &Path) -> Result<Vec<IncomeRecord>> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Loads a source catalog stored as a JSON array of sources.
pub fn load_catalog_from_path(path: &Path) -> Result<SourceCatalog> {
    let data = fs::read_to_string(path)?;
    let sources: Vec<Source> = serde_json::from_str(&data)?;
    Ok(SourceCatalog::new(sources))
}

pub fn save_catalog_to_path(catalog: &SourceCatalog, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog.sources())?;
    write_atomic(path, &json)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
