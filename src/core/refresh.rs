//! Last-request-wins guard for view refreshes.
//!
//! Every fetch is started with [`ReportRefresh::begin`], which hands out a
//! ticket. Only the newest ticket may replace the shown report; results of
//! older tickets are discarded whatever order they complete in. A failed
//! fetch never clears the report that is already shown.

use crate::{domain::Period, errors::IncomeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
    period: Period,
}

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn period(&self) -> Period {
        self.period
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The result replaced the shown report.
    Applied,
    /// A newer request was issued; the result was dropped.
    Stale,
    /// The newest request failed; the previous report stays in place.
    FailedKeptPrevious,
}

/// Holds the report a view currently shows plus the request bookkeeping.
#[derive(Debug)]
pub struct ReportRefresh<T> {
    issued: u64,
    shown: Option<(Period, T)>,
    last_error: Option<IncomeError>,
}

impl<T> Default for ReportRefresh<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            shown: None,
            last_error: None,
        }
    }
}

impl<T> ReportRefresh<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request, superseding every earlier one.
    pub fn begin(&mut self, period: Period) -> RequestTicket {
        self.issued += 1;
        tracing::debug!(request = self.issued, %period, "refresh requested");
        RequestTicket {
            id: self.issued,
            period,
        }
    }

    pub fn is_latest(&self, ticket: &RequestTicket) -> bool {
        ticket.id == self.issued
    }

    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<T, IncomeError>,
    ) -> RefreshOutcome {
        if !self.is_latest(&ticket) {
            tracing::debug!(
                request = ticket.id,
                latest = self.issued,
                "discarding stale refresh result"
            );
            return RefreshOutcome::Stale;
        }
        match result {
            Ok(report) => {
                self.shown = Some((ticket.period, report));
                self.last_error = None;
                RefreshOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(
                    request = ticket.id,
                    error = %err,
                    "refresh failed, keeping previous report"
                );
                self.last_error = Some(err);
                RefreshOutcome::FailedKeptPrevious
            }
        }
    }

    /// Runs a fetch-and-build step for `period` and completes it immediately.
    pub fn refresh_with(
        &mut self,
        period: Period,
        build: impl FnOnce(Period) -> Result<T, IncomeError>,
    ) -> RefreshOutcome {
        let ticket = self.begin(period);
        let result = build(period);
        self.complete(ticket, result)
    }

    pub fn current(&self) -> Option<&T> {
        self.shown.as_ref().map(|(_, report)| report)
    }

    pub fn current_period(&self) -> Option<Period> {
        self.shown.as_ref().map(|(period, _)| *period)
    }

    pub fn last_error(&self) -> Option<&IncomeError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::MonthPeriod, storage::StoreError};

    fn month(m: u32) -> Period {
        Period::Month(MonthPeriod::new(2024, m).unwrap())
    }

    #[test]
    fn newer_request_wins_regardless_of_completion_order() {
        let mut refresh = ReportRefresh::new();
        let march = refresh.begin(month(3));
        let april = refresh.begin(month(4));

        assert_eq!(refresh.complete(april, Ok("april")), RefreshOutcome::Applied);
        assert_eq!(refresh.complete(march, Ok("march")), RefreshOutcome::Stale);
        assert_eq!(refresh.current(), Some(&"april"));
        assert_eq!(refresh.current_period(), Some(month(4)));
    }

    #[test]
    fn failure_keeps_previous_report() {
        let mut refresh = ReportRefresh::new();
        assert_eq!(
            refresh.refresh_with(month(3), |_| Ok("march")),
            RefreshOutcome::Applied
        );
        let outcome = refresh.refresh_with(month(4), |_| {
            Err(IncomeError::from(StoreError::Unavailable("offline".into())))
        });
        assert_eq!(outcome, RefreshOutcome::FailedKeptPrevious);
        assert_eq!(refresh.current(), Some(&"march"));
        assert!(matches!(
            refresh.last_error(),
            Some(IncomeError::FetchFailed(_))
        ));
    }

    #[test]
    fn stale_failure_does_not_record_error() {
        let mut refresh: ReportRefresh<&str> = ReportRefresh::new();
        let old = refresh.begin(month(1));
        let new = refresh.begin(month(2));
        let stale = refresh.complete(
            old,
            Err(IncomeError::from(StoreError::Unavailable("timeout".into()))),
        );
        assert_eq!(stale, RefreshOutcome::Stale);
        assert!(refresh.last_error().is_none());
        assert_eq!(refresh.complete(new, Ok("feb")), RefreshOutcome::Applied);
    }
}
