//! Calendar periods and the bucket keys records are grouped under.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors that can occur when constructing or parsing periods.
pub enum PeriodError {
    InvalidMonth(u32),
    YearOutOfRange(i32),
    Unparseable(String),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::InvalidMonth(month) => write!(f, "month {month} is not in 1..=12"),
            PeriodError::YearOutOfRange(year) => write!(f, "year {year} is out of range"),
            PeriodError::Unparseable(raw) => write!(f, "cannot parse period `{raw}`"),
        }
    }
}

impl std::error::Error for PeriodError {}

/// Granularity of the buckets records are grouped into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
}

/// A single calendar month. Rendered and parsed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MonthPeriod {
    year: i32,
    month: u32,
}

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        // The last day must exist too, otherwise `last_day` could not be built.
        if NaiveDate::from_ymd_opt(year, month, 1).is_none()
            || NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)).is_none()
        {
            return Err(PeriodError::YearOutOfRange(year));
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        self.day(1).expect("month period holds a valid year and month")
    }

    pub fn last_day(&self) -> NaiveDate {
        self.day(self.days())
            .expect("month period holds a valid year and month")
    }

    /// Returns the calendar date for `day` inside this month, if it exists.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Actual number of days in the month (28 to 31).
    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days()).filter_map(move |day| self.day(day))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.first_day() - Duration::days(1))
    }

    pub fn next(&self) -> Self {
        Self::containing(self.last_day() + Duration::days(1))
    }

    pub fn year_period(&self) -> YearPeriod {
        YearPeriod { year: self.year }
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthPeriod {
    type Err = PeriodError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (year, month) = trimmed
            .split_once('-')
            .ok_or_else(|| PeriodError::Unparseable(trimmed.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| PeriodError::Unparseable(trimmed.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodError::Unparseable(trimmed.to_string()))?;
        Self::new(year, month)
    }
}

impl From<MonthPeriod> for String {
    fn from(value: MonthPeriod) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for MonthPeriod {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub struct YearPeriod {
    year: i32,
}

impl YearPeriod {
    pub fn new(year: i32) -> Result<Self, PeriodError> {
        MonthPeriod::new(year, 1)?;
        MonthPeriod::new(year, 12)?;
        Ok(Self { year })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self { year: date.year() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        self.months()[0].first_day()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.months()[11].last_day()
    }

    /// 365 or 366 depending on the year.
    pub fn days(&self) -> u32 {
        self.months().iter().map(MonthPeriod::days).sum()
    }

    /// The twelve months of the year in calendar order.
    pub fn months(&self) -> Vec<MonthPeriod> {
        (1..=12)
            .map(|month| MonthPeriod {
                year: self.year,
                month,
            })
            .collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year
    }

    pub fn previous(&self) -> Self {
        Self {
            year: self.year - 1,
        }
    }

    pub fn next(&self) -> Self {
        Self {
            year: self.year + 1,
        }
    }
}

impl fmt::Display for YearPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)
    }
}

impl From<YearPeriod> for i32 {
    fn from(value: YearPeriod) -> Self {
        value.year
    }
}

impl TryFrom<i32> for YearPeriod {
    type Error = PeriodError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A reporting period: one month (bucketed by day) or one year (bucketed by month).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Period {
    Month(MonthPeriod),
    Year(YearPeriod),
}

impl Period {
    pub fn first_day(&self) -> NaiveDate {
        match self {
            Period::Month(month) => month.first_day(),
            Period::Year(year) => year.first_day(),
        }
    }

    pub fn last_day(&self) -> NaiveDate {
        match self {
            Period::Month(month) => month.last_day(),
            Period::Year(year) => year.last_day(),
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            Period::Month(month) => month.days(),
            Period::Year(year) => year.days(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Period::Month(month) => month.contains(date),
            Period::Year(year) => year.contains(date),
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Period::Month(month) => Period::Month(month.previous()),
            Period::Year(year) => Period::Year(year.previous()),
        }
    }

    /// Granularity of the buckets that make up this period.
    pub fn bucket_granularity(&self) -> Granularity {
        match self {
            Period::Month(_) => Granularity::Day,
            Period::Year(_) => Granularity::Month,
        }
    }

    /// Every bucket key of the period in chronological order, including empty ones.
    pub fn bucket_keys(&self) -> Vec<BucketKey> {
        match self {
            Period::Month(month) => month.dates().map(BucketKey::Day).collect(),
            Period::Year(year) => year.months().into_iter().map(BucketKey::Month).collect(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month(month) => month.fmt(f),
            Period::Year(year) => year.fmt(f),
        }
    }
}

/// Canonical key of a calendar bucket: `YYYY-MM-DD` for days, `YYYY-MM` for months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BucketKey {
    Day(NaiveDate),
    Month(MonthPeriod),
}

impl BucketKey {
    pub fn for_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => BucketKey::Day(date),
            Granularity::Month => BucketKey::Month(MonthPeriod::containing(date)),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            BucketKey::Day(_) => Granularity::Day,
            BucketKey::Month(_) => Granularity::Month,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        match self {
            BucketKey::Day(date) => *date,
            BucketKey::Month(month) => month.first_day(),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            BucketKey::Month(month) => month.fmt(f),
        }
    }
}

impl From<BucketKey> for String {
    fn from(value: BucketKey) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for BucketKey {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.len() {
            10 => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                .map(BucketKey::Day)
                .map_err(|_| PeriodError::Unparseable(value)),
            _ => value.parse().map(BucketKey::Month),
        }
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 31,
    }
}
