pub mod common;
pub mod period;
pub mod record;
pub mod source;

pub use common::{Displayable, Identifiable};
pub use period::{BucketKey, Granularity, MonthPeriod, Period, PeriodError, YearPeriod};
pub use record::{IncomeRecord, MonthlySourceTotal, NewIncomeRecord, RecordPatch, YearlyRecords};
pub use source::{Source, SourceCatalog};
