//! Per-year running totals shared by the accumulation stages.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, Regime};

/// Running totals for one calendar year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearTotals {
    /// Actual days, uncapped until the cap stage runs.
    pub actual_days: u32,
    /// Theoretical days.
    pub theoretical_days: u32,
    /// Theoretical months, uncapped until the cap stage runs.
    pub theoretical_months: u32,
}

impl YearTotals {
    /// Adds actual days, saturating at `u32::MAX`.
    ///
    /// A saturated total is always above the annual ceiling, so the cap
    /// stage brings it back to the same value exact arithmetic would give.
    pub fn add_actual_days(&mut self, days: u32) {
        self.actual_days = self.actual_days.saturating_add(days);
    }

    /// Adds theoretical days and months.
    ///
    /// Fails with `CalculationError` when either total no longer fits.
    pub fn add_theoretical(&mut self, year: i32, days: u32, months: u32) -> EngineResult<()> {
        self.theoretical_days = self
            .theoretical_days
            .checked_add(days)
            .ok_or_else(|| out_of_range(year, "theoretical days"))?;
        self.theoretical_months = self
            .theoretical_months
            .checked_add(months)
            .ok_or_else(|| out_of_range(year, "theoretical months"))?;
        Ok(())
    }
}

/// The error raised when a yearly total overflows.
pub(crate) fn out_of_range(year: i32, what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} for {} exceed the supported range", what, year),
    }
}

/// State threaded through the accumulation stages.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    pub years: BTreeMap<i32, YearTotals>,
    pub last_regime: Option<Regime>,
    pub trace: AuditTrace,
}

impl Accumulator {
    /// Returns the totals of a year, creating an empty row if needed.
    pub fn year_mut(&mut self, year: i32) -> &mut YearTotals {
        self.years.entry(year).or_default()
    }
}

/// The portion of a period that falls inside one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan {
    /// Calendar year.
    pub year: i32,
    /// First covered month.
    pub from_month: u32,
    /// Last covered month.
    pub to_month: u32,
}

/// Splits an inclusive date range into per-year month spans.
///
/// Intermediate years are covered January through December.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use inps_contributions::calculation::split_by_year;
///
/// let spans = split_by_year(
///     NaiveDate::from_ymd_opt(1997, 10, 1).unwrap(),
///     NaiveDate::from_ymd_opt(1999, 2, 28).unwrap(),
/// );
/// assert_eq!(spans.len(), 3);
/// assert_eq!((spans[1].from_month, spans[1].to_month), (1, 12));
/// ```
pub fn split_by_year(start: NaiveDate, end: NaiveDate) -> Vec<YearSpan> {
    if start.year() == end.year() {
        return vec![YearSpan {
            year: start.year(),
            from_month: start.month(),
            to_month: end.month(),
        }];
    }

    let mut spans = Vec::with_capacity((end.year() - start.year() + 1).max(0) as usize);
    spans.push(YearSpan {
        year: start.year(),
        from_month: start.month(),
        to_month: 12,
    });
    for year in start.year() + 1..end.year() {
        spans.push(YearSpan {
            year,
            from_month: 1,
            to_month: 12,
        });
    }
    spans.push(YearSpan {
        year: end.year(),
        from_month: 1,
        to_month: end.month(),
    });
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_year_span() {
        let spans = split_by_year(date(1987, 9, 1), date(1987, 12, 31));
        assert_eq!(
            spans,
            vec![YearSpan {
                year: 1987,
                from_month: 9,
                to_month: 12
            }]
        );
    }

    #[test]
    fn test_two_year_span() {
        let spans = split_by_year(date(1997, 1, 1), date(1998, 6, 30));
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].year, spans[0].from_month, spans[0].to_month), (1997, 1, 12));
        assert_eq!((spans[1].year, spans[1].from_month, spans[1].to_month), (1998, 1, 6));
    }

    #[test]
    fn test_intermediate_years_are_full() {
        let spans = split_by_year(date(2001, 11, 1), date(2004, 3, 15));
        let years: Vec<i32> = spans.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2001, 2002, 2003, 2004]);
        assert_eq!((spans[0].from_month, spans[0].to_month), (11, 12));
        assert_eq!((spans[1].from_month, spans[1].to_month), (1, 12));
        assert_eq!((spans[2].from_month, spans[2].to_month), (1, 12));
        assert_eq!((spans[3].from_month, spans[3].to_month), (1, 3));
    }

    #[test]
    fn test_year_mut_creates_rows() {
        let mut acc = Accumulator::default();
        acc.year_mut(1990).actual_days += 10;
        acc.year_mut(1990).actual_days += 5;
        assert_eq!(acc.years[&1990].actual_days, 15);
        assert_eq!(acc.years.len(), 1);
    }
}
