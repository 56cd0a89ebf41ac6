pub mod report_service;

pub use report_service::{MonthlyReport, PeriodReport, ReportOptions, ReportService, YearlyReport};
